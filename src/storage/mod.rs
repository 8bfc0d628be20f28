//! Persistent storage for batch runs

pub mod database;

pub use database::BatchDb;
