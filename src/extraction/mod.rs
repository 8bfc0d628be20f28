//! Document extraction: archive walking, per-PDF text extraction, classification

pub mod archive;
pub mod classifier;
pub mod pdf;

pub use archive::{ArchiveMember, ArchiveWalker, PDF_SUFFIX};
pub use classifier::{Classification, Classifier, NoopClassifier};
pub use pdf::{DocumentExtractor, END_OF_FILE_MARKER, NEXT_PAGE_MARKER};
