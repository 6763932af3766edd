pub mod config_service;
pub mod dto;
pub mod file_session_store;
pub mod memory_store;
pub mod paths;
pub mod recent_topics_repository;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_session_store::FileSessionStore;
pub use crate::memory_store::{MemoryRecentTopicsRepository, MemorySessionStore};
pub use crate::paths::InquiryPaths;
pub use crate::recent_topics_repository::FileRecentTopicsRepository;
pub use crate::secret_service::FileSecretService;
