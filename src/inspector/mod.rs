//! Source inspector
//!
//! Builds a navigable outline from Csound orchestra text (or Python source)
//! using line-oriented heuristic scanning. Used by the inspector panel to
//! show opcodes, macros, instruments, f-tables and the score section.
//!
//! The scan is coarse and cheap: one pass over the lines, no AST, no error
//! recovery. It runs on a timer against the current document only.

mod classify;
mod scan;
mod schedule;

pub use classify::{classify_line, LineClass};
pub use scan::{scan_csound, scan_python};
pub use schedule::{ScanScheduler, SchedulerState};

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Scan mode selector, derived from the document's edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Csound,
    Python,
}

/// Fixed top-level outline categories
///
/// Csound mode uses the first five, Python mode the last three. Categories
/// always exist after a parse, even when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Opcodes,
    Macros,
    Instruments,
    Ftables,
    Score,
    Imports,
    Classes,
    Functions,
}

impl Category {
    /// Display title for the category header row
    pub fn title(self) -> &'static str {
        match self {
            Category::Opcodes => "Opcodes",
            Category::Macros => "Macros",
            Category::Instruments => "Instruments",
            Category::Ftables => "F-tables",
            Category::Score => "Score",
            Category::Imports => "Imports",
            Category::Classes => "Classes",
            Category::Functions => "Functions",
        }
    }

    /// Default expansion policy when no previous state exists
    pub fn default_expanded(self) -> bool {
        match self {
            Category::Opcodes | Category::Instruments => true,
            Category::Macros | Category::Ftables | Category::Score => false,
            Category::Imports | Category::Classes | Category::Functions => true,
        }
    }

    /// The category set for a scan mode, in display order
    pub fn for_mode(mode: ScanMode) -> &'static [Category] {
        match mode {
            ScanMode::Csound => &[
                Category::Opcodes,
                Category::Macros,
                Category::Instruments,
                Category::Ftables,
                Category::Score,
            ],
            ScanMode::Python => &[Category::Imports, Category::Classes, Category::Functions],
        }
    }
}

/// A single navigable entry in the outline
///
/// `line` is the 1-based source line, or `None` for entries with no single
/// matching line (unpopulated category headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub label: String,
    pub line: Option<usize>,
    pub expanded: bool,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            label: label.into(),
            line,
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One fixed category with its entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTree {
    pub category: Category,
    pub line: Option<usize>,
    pub expanded: bool,
    pub entries: Vec<OutlineNode>,
}

impl CategoryTree {
    fn empty(category: Category) -> Self {
        Self {
            category,
            line: None,
            expanded: category.default_expanded(),
            entries: Vec::new(),
        }
    }
}

/// Complete outline for one document
///
/// Rebuilt from scratch on every scan; entries are not identity-stable
/// across parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub mode: ScanMode,
    pub categories: Vec<CategoryTree>,
}

impl Outline {
    /// Create an empty outline with all categories for `mode` present
    pub fn empty(mode: ScanMode) -> Self {
        Self {
            mode,
            categories: Category::for_mode(mode)
                .iter()
                .map(|&c| CategoryTree::empty(c))
                .collect(),
        }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryTree> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn category_mut(&mut self, category: Category) -> Option<&mut CategoryTree> {
        self.categories.iter_mut().find(|c| c.category == category)
    }

    /// Check if the outline has any entries at all
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.entries.is_empty())
    }
}

/// A user-defined opcode signature captured during the scan
///
/// `in_args`/`out_args` hold the whitespace-simplified argument lists from
/// the first `xin`/`xout` line of the body; empty until those are seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpcodeRecord {
    pub name: String,
    pub in_args: String,
    pub out_args: String,
}

impl OpcodeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_args: String::new(),
            out_args: String::new(),
        }
    }
}

/// Name-keyed table of user-defined opcodes, rebuilt fully on every scan.
/// The last definition of a given name wins.
pub type OpcodeTable = HashMap<String, OpcodeRecord>;

/// The value produced by one scan call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub outline: Outline,
    pub opcodes: OpcodeTable,
}

impl ScanOutcome {
    pub fn empty(mode: ScanMode) -> Self {
        Self {
            outline: Outline::empty(mode),
            opcodes: OpcodeTable::new(),
        }
    }
}

/// Expansion flags carried across tree rebuilds
///
/// Entries are not identity-stable across parses, so expansion is preserved
/// by label lookup in a side table captured from the previous tree: one flag
/// per category, one per instrument label. Missing entries fall back to the
/// category default (instruments default collapsed).
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    categories: HashMap<Category, bool>,
    instruments: HashMap<String, bool>,
}

impl ExpansionState {
    /// Snapshot the expansion flags of an existing outline
    pub fn capture(outline: &Outline) -> Self {
        let mut state = Self::default();
        for tree in &outline.categories {
            state.categories.insert(tree.category, tree.expanded);
            if tree.category == Category::Instruments {
                for entry in &tree.entries {
                    state.instruments.insert(entry.label.clone(), entry.expanded);
                }
            }
        }
        state
    }

    pub fn category_expanded(&self, category: Category) -> bool {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_expanded())
    }

    /// Expansion flag for an instrument leaf, if one with this exact label
    /// existed in the previous tree
    pub fn instrument_expanded(&self, label: &str) -> Option<bool> {
        self.instruments.get(label).copied()
    }

    /// Apply captured flags to a freshly built outline
    pub fn restore(&self, outline: &mut Outline) {
        for tree in &mut outline.categories {
            tree.expanded = self.category_expanded(tree.category);
            if tree.category == Category::Instruments {
                for entry in &mut tree.entries {
                    if let Some(expanded) = self.instrument_expanded(&entry.label) {
                        entry.expanded = expanded;
                    }
                }
            }
        }
    }
}

/// Serialized access to the scanner plus the latest outcome
///
/// The scanner is not reentrant: it rebuilds category trees and the opcode
/// table as it goes. All of that happens under one mutex held for the full
/// parse, including expansion-state restoration, so readers never observe a
/// half-built outcome.
#[derive(Debug)]
pub struct Inspector {
    inner: Mutex<ScanOutcome>,
}

impl Inspector {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            inner: Mutex::new(ScanOutcome::empty(mode)),
        }
    }

    /// Re-parse `text`, replacing the previous outcome
    ///
    /// Expansion flags from the previous outline are preserved by label.
    /// Returns a clone of the new outcome.
    pub fn refresh(&self, text: &str, mode: ScanMode) -> ScanOutcome {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let started = Instant::now();
        let expansion = ExpansionState::capture(&guard.outline);
        let mut outcome = match mode {
            ScanMode::Csound => scan_csound(text),
            ScanMode::Python => scan_python(text),
        };
        expansion.restore(&mut outcome.outline);
        *guard = outcome.clone();
        tracing::debug!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "inspector parse"
        );
        outcome
    }

    /// Clone of the most recent outcome
    pub fn outcome(&self) -> ScanOutcome {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
