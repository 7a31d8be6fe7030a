//! csdedit - editing core for Csound documents
//!
//! This crate provides the document model, source inspector and widget
//! panel splicing behind a Csound editing environment: multi-document
//! state, a heuristic outline scanner for orchestra and Python text, the
//! `<bsbPanel>`/`<bsbPresets>` splicer, and engine orchestration seams.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod engine;
pub mod inspector;
pub mod model;
pub mod recent_files;
pub mod tracing;
pub mod util;
pub mod widgets;

// Re-export commonly used types
pub use config::Settings;
pub use inspector::{Inspector, Outline, OutlineNode, ScanMode, ScanOutcome};
pub use model::{Document, DocumentPage, EditMode, EditorArea};
pub use widgets::WidgetHost;
