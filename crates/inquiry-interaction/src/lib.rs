//! Collaborator adapters for the research backend.

pub mod http_backend;
mod wire;

pub use http_backend::HttpResearchBackend;
