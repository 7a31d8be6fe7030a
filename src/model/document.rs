//! Document model - represents the text buffer and file state

use ropey::Rope;
use std::path::{Path, PathBuf};

use crate::inspector::{ScanMode, ScanOutcome};

/// Editing mode, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Csound,
    Python,
    Xml,
    Orc,
    Sco,
    Inc,
    Html,
    Generic,
}

impl EditMode {
    /// Detect the mode from a file path. Unsaved documents are Csound.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return EditMode::Generic;
        };
        if ext.eq_ignore_ascii_case("csd") {
            EditMode::Csound
        } else if ext.eq_ignore_ascii_case("py") {
            EditMode::Python
        } else if ext.eq_ignore_ascii_case("xml") {
            EditMode::Xml
        } else if ext.eq_ignore_ascii_case("orc") || ext.eq_ignore_ascii_case("udo") {
            EditMode::Orc
        } else if ext.eq_ignore_ascii_case("sco") {
            EditMode::Sco
        } else if ext.eq_ignore_ascii_case("inc") {
            EditMode::Inc
        } else if ext.eq_ignore_ascii_case("html") {
            EditMode::Html
        } else {
            EditMode::Generic
        }
    }

    /// Which scanner applies to this mode, if any
    ///
    /// Orc and include files use the Csound scanner; without container tags
    /// they produce an empty outline, which is fine.
    pub fn scan_mode(self) -> Option<ScanMode> {
        match self {
            EditMode::Csound | EditMode::Orc | EditMode::Inc => Some(ScanMode::Csound),
            EditMode::Python => Some(ScanMode::Python),
            _ => None,
        }
    }
}

/// Document state - the text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for new/unsaved files)
    pub file_path: Option<PathBuf>,
    /// Display name for untitled documents (e.g., "Untitled", "Untitled-2")
    pub untitled_name: Option<String>,
    /// Whether the buffer has unsaved changes
    pub is_modified: bool,
    /// Editing mode derived from the file name
    pub mode: EditMode,
    /// Paired .orc/.sco file run together with this one
    pub companion_file: Option<PathBuf>,
    /// Document revision counter (incremented on each edit)
    pub revision: u64,
    /// Most recent inspector outcome for this document
    pub scan: Option<ScanOutcome>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            buffer: Rope::from(""),
            file_path: None,
            untitled_name: None,
            is_modified: false,
            mode: EditMode::Csound,
            companion_file: None,
            revision: 0,
            scan: None,
        }
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            ..Self::new()
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        let mode = EditMode::from_path(&path);
        Ok(Self {
            buffer: Rope::from(content),
            file_path: Some(path),
            mode,
            ..Self::new()
        })
    }

    /// Get the display name for this document.
    /// Returns the filename if saved, the untitled name if set, or "Untitled" as fallback.
    pub fn display_name(&self) -> String {
        if let Some(path) = &self.file_path {
            if let Some(name) = path.file_name() {
                return name.to_string_lossy().to_string();
            }
        }
        if let Some(name) = &self.untitled_name {
            return name.clone();
        }
        "Untitled".to_string()
    }

    /// Rename the document and re-derive its editing mode
    pub fn set_file_name(&mut self, path: PathBuf) {
        self.mode = if path.as_os_str().is_empty() {
            EditMode::Csound
        } else {
            EditMode::from_path(&path)
        };
        self.file_path = Some(path);
    }

    /// Whether this document saves widget sections along with its text:
    /// true for `.csd` files and unsaved documents.
    pub fn is_csd(&self) -> bool {
        match &self.file_path {
            Some(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csd")),
            None => true,
        }
    }

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Full buffer contents as a String
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Replace the buffer contents, bumping the revision
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.revision += 1;
        self.is_modified = true;
    }

    /// Replace the buffer from a freshly loaded file (not an edit)
    pub fn load_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.revision += 1;
        self.is_modified = false;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_detection_by_extension() {
        assert_eq!(EditMode::from_path(Path::new("a.csd")), EditMode::Csound);
        assert_eq!(EditMode::from_path(Path::new("a.CSD")), EditMode::Csound);
        assert_eq!(EditMode::from_path(Path::new("a.py")), EditMode::Python);
        assert_eq!(EditMode::from_path(Path::new("a.xml")), EditMode::Xml);
        assert_eq!(EditMode::from_path(Path::new("a.orc")), EditMode::Orc);
        assert_eq!(EditMode::from_path(Path::new("a.udo")), EditMode::Orc);
        assert_eq!(EditMode::from_path(Path::new("a.sco")), EditMode::Sco);
        assert_eq!(EditMode::from_path(Path::new("a.inc")), EditMode::Inc);
        assert_eq!(EditMode::from_path(Path::new("a.html")), EditMode::Html);
        assert_eq!(EditMode::from_path(Path::new("a.txt")), EditMode::Generic);
        assert_eq!(EditMode::from_path(Path::new("noext")), EditMode::Generic);
    }

    #[test]
    fn scan_mode_per_edit_mode() {
        assert_eq!(EditMode::Csound.scan_mode(), Some(ScanMode::Csound));
        assert_eq!(EditMode::Orc.scan_mode(), Some(ScanMode::Csound));
        assert_eq!(EditMode::Python.scan_mode(), Some(ScanMode::Python));
        assert_eq!(EditMode::Sco.scan_mode(), None);
        assert_eq!(EditMode::Generic.scan_mode(), None);
    }

    #[test]
    fn new_document_is_untitled_csd() {
        let doc = Document::new();
        assert_eq!(doc.display_name(), "Untitled");
        assert!(doc.is_csd());
        assert!(!doc.is_modified);
        assert_eq!(doc.mode, EditMode::Csound);
    }

    #[test]
    fn set_file_name_rederives_mode() {
        let mut doc = Document::new();
        doc.set_file_name(PathBuf::from("song.py"));
        assert_eq!(doc.mode, EditMode::Python);
        assert!(!doc.is_csd());
        assert_eq!(doc.display_name(), "song.py");

        doc.set_file_name(PathBuf::from("song.csd"));
        assert_eq!(doc.mode, EditMode::Csound);
        assert!(doc.is_csd());
    }

    #[test]
    fn set_text_bumps_revision_and_modifies() {
        let mut doc = Document::with_text("one");
        assert_eq!(doc.revision, 0);
        doc.set_text("two");
        assert_eq!(doc.revision, 1);
        assert!(doc.is_modified);
        assert_eq!(doc.text(), "two");
    }

    #[test]
    fn load_text_is_not_an_edit() {
        let mut doc = Document::new();
        doc.load_text("loaded");
        assert!(!doc.is_modified);
        assert_eq!(doc.text(), "loaded");
    }
}
