pub mod config_service;
pub mod memory_archive;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::memory_archive::InMemorySessionArchive;
pub use crate::paths::DocchatPaths;
