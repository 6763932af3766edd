//! Research session domain.

pub mod analysis;
pub mod file;
pub mod id;
pub mod message;
pub mod model;
pub mod notes;
pub mod repository;

pub use analysis::{AnalysisData, AnalysisField, Approach, KeyTerm, Priority, Recommendation};
pub use file::{FileStatus, UploadedFile};
pub use id::ResearchId;
pub use message::{ChatMessage, ChatRole};
pub use model::{CandidateTopic, ResearchSession};
pub use notes::{GENERAL_CATEGORY, NotesCategories, NotesCategory};
pub use repository::SessionStore;
