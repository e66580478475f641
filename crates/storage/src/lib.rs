#![forbid(unsafe_code)]

pub mod file;
pub mod questions;
pub mod repository;
pub mod sqlite;

pub use repository::{HistoryRepository, InMemoryRepository, Storage, StorageError};
