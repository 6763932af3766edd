//! Report composition engine.
//!
//! Two strategies produce the document shown to the user:
//! - [`compose`] builds it locally from session fields.
//! - [`filter_sections`] reduces an already generated markdown document to
//!   the sections selected in [`ReportSettings`].

mod compose;
mod filter;
mod request;
mod section;
mod settings;

pub use compose::compose;
pub use filter::{filter_sections, remove_sections};
pub use request::ReportRequest;
pub use section::SectionKind;
pub use settings::{Language, ReportFormat, ReportSettings, ReportStyle};
