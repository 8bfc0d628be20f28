//! ZIP archive walking
//!
//! Single forward pass over the central directory: PDF members are read fully
//! into memory and handed to the extractor one at a time. Non-PDF members and
//! directories are skipped silently.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Member name suffix accepted by the walker (matched case-insensitively)
pub const PDF_SUFFIX: &str = ".pdf";

/// One named entry read out of the archive.
///
/// Lives only for the duration of a single walker step; the aggregator drops
/// it once the extractor has produced (or failed to produce) a record.
#[derive(Debug)]
pub struct ArchiveMember {
    /// Archive-relative path of the member
    pub name: String,
    /// Full member content
    pub data: Vec<u8>,
}

/// Forward-only walker over the PDF members of an in-memory ZIP archive
#[derive(Debug)]
pub struct ArchiveWalker {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    index: usize,
}

impl ArchiveWalker {
    /// Open an archive from its raw bytes.
    ///
    /// Bytes that are not a valid ZIP container fail with `ArchiveFormat`,
    /// which is fatal to the whole batch.
    pub fn open(archive_bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(archive_bytes))
            .map_err(|e| Error::archive_format(e.to_string()))?;
        Ok(Self { archive, index: 0 })
    }

    /// Total number of members in the archive, PDF or not
    pub fn member_count(&self) -> usize {
        self.archive.len()
    }

    /// Read the next PDF member fully into memory.
    ///
    /// Preserves central-directory order. Returns `Ok(None)` once exhausted;
    /// the walk is not restartable. A member that cannot be read is treated
    /// as archive-level corruption.
    pub fn next_pdf(&mut self) -> Result<Option<ArchiveMember>> {
        while self.index < self.archive.len() {
            let i = self.index;
            self.index += 1;

            let mut file = self
                .archive
                .by_index(i)
                .map_err(|e| Error::archive_format(e.to_string()))?;

            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            if !name.to_lowercase().ends_with(PDF_SUFFIX) {
                continue;
            }

            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::archive_format(format!("failed to read '{}': {}", name, e)))?;

            tracing::debug!("Read archive member '{}' ({} bytes)", name, data.len());
            return Ok(Some(ArchiveMember { name, data }));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::testutil::zip_archive;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn drain(mut walker: ArchiveWalker) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(member) = walker.next_pdf().unwrap() {
            names.push(member.name);
        }
        names
    }

    #[test]
    fn test_invalid_bytes_fail_with_archive_format() {
        let err = ArchiveWalker::open(b"definitely not a zip".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_filters_to_pdf_members() {
        let bytes = zip_archive(&[
            ("a.pdf", b"one".as_slice()),
            ("readme.txt", b"skip me".as_slice()),
            ("B.PDF", b"two".as_slice()),
        ]);
        let names = drain(ArchiveWalker::open(bytes).unwrap());
        assert_eq!(names, vec!["a.pdf", "B.PDF"]);
    }

    #[test]
    fn test_preserves_directory_order() {
        let bytes = zip_archive(&[
            ("z_last_name_first_entry.pdf", b"1".as_slice()),
            ("a_first_name_second_entry.pdf", b"2".as_slice()),
        ]);
        let names = drain(ArchiveWalker::open(bytes).unwrap());
        // Archive order, not sorted order
        assert_eq!(
            names,
            vec!["z_last_name_first_entry.pdf", "a_first_name_second_entry.pdf"]
        );
    }

    #[test]
    fn test_skips_directory_entries() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.add_directory("docs/", options).unwrap();
        writer.start_file("docs/inner.pdf", options).unwrap();
        writer.write_all(b"data").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let names = drain(ArchiveWalker::open(bytes).unwrap());
        assert_eq!(names, vec!["docs/inner.pdf"]);
    }

    #[test]
    fn test_member_bytes_read_fully() {
        let payload = vec![0x42u8; 4096];
        let bytes = zip_archive(&[("big.pdf", payload.as_slice())]);
        let mut walker = ArchiveWalker::open(bytes).unwrap();
        let member = walker.next_pdf().unwrap().unwrap();
        assert_eq!(member.data, payload);
        assert!(walker.next_pdf().unwrap().is_none());
    }
}
