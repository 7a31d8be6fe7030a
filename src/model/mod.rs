//! Document and editor-area model

mod document;
mod editor_area;
mod page;

pub use document::{Document, EditMode};
pub use editor_area::EditorArea;
pub use page::DocumentPage;
