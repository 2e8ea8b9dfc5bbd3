pub mod backend;
pub mod json_file;
pub mod memory;

pub use backend::{Result, ReviewStore, StoreError};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
