pub mod cache;
pub mod disk_ids;
pub mod loader;
pub mod records;
