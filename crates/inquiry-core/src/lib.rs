pub mod collaborator;
pub mod config;
pub mod error;
pub mod recent;
pub mod report;
pub mod secret;
pub mod session;
pub mod workflow;

// Re-export common error type
pub use error::{InquiryError, Result};
