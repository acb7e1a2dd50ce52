// Output rendering for persisted artifacts

pub mod dot;
pub mod html;

pub use dot::DotGenerator;
pub use html::{SiteReport, Viewer};
