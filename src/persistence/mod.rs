pub mod backend;
pub mod codec;
pub mod files;

pub use backend::{FileStorage, MemoryStorage, StorageBackend, TASKS_KEY};
pub use files::{atomic_write, ensure_data_dir, get_data_dir, read_file};
