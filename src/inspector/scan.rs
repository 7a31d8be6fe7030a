//! Line-oriented outline scanners
//!
//! `scan_csound` walks the `<CsInstruments>` body of a `.csd` document and
//! fills the five fixed categories; `scan_python` is the simpler classifier
//! for Python documents. Both build a fresh tree every call.
//!
//! Block comments are handled at line granularity: a `/*` with no `*/` on
//! the same physical line suppresses every following line until one contains
//! `*/`. An unterminated `/*` therefore suppresses the rest of the section;
//! this mirrors the long-standing behavior of the scan and is not corrected
//! here.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::{classify_line, LineClass};
use super::{Category, OpcodeRecord, OpcodeTable, Outline, OutlineNode, ScanMode, ScanOutcome};
use crate::util::text::simplified;

static ORC_START_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<CsInstruments>").expect("orchestra start pattern"));

static XIN_RX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bxin\b").expect("xin pattern"));

static XOUT_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bxout\s+\b").expect("xout pattern"));

/// Indented method definition inside a class body
static INDENTED_DEF_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s]+def ").expect("indented def pattern"));

static IMPORT_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimport\b").expect("import pattern"));

/// Where new leaves are inserted during the walk
enum Scope {
    /// `instr 0` scope; labels land under the Instruments category itself
    Top,
    /// Inside `instr ... endin`; index into the Instruments entries
    Instrument(usize),
    /// Inside `opcode ... endop`; index into the Opcodes entries plus the
    /// signature record being accumulated
    Opcode { entry: usize, record: OpcodeRecord },
}

fn push_child(outline: &mut Outline, category: Category, entry: usize, node: OutlineNode) {
    if let Some(tree) = outline.category_mut(category) {
        if let Some(parent) = tree.entries.get_mut(entry) {
            parent.children.push(node);
        }
    }
}

/// Add a leaf under a category, setting the category's line to the first
/// entry's line when it had none (Instruments keeps its tag line)
fn push_category_entry(outline: &mut Outline, category: Category, node: OutlineNode) -> usize {
    let tree = outline
        .category_mut(category)
        .expect("category exists for mode");
    if tree.line.is_none() {
        tree.line = node.line;
    }
    tree.entries.push(node);
    tree.entries.len() - 1
}

/// Insert a `;; ` user label under the current container
fn push_label(outline: &mut Outline, scope: &Scope, node: OutlineNode) {
    match scope {
        Scope::Top => {
            if let Some(tree) = outline.category_mut(Category::Instruments) {
                tree.entries.push(node);
            }
        }
        Scope::Instrument(entry) => push_child(outline, Category::Instruments, *entry, node),
        Scope::Opcode { entry, .. } => push_child(outline, Category::Opcodes, *entry, node),
    }
}

/// Advance the walk state for one classified line, returning the next scope
fn step(
    scope: Scope,
    class: LineClass<'_>,
    line: &str,
    line_no: usize,
    outline: &mut Outline,
    opcodes: &mut OpcodeTable,
) -> Scope {
    match scope {
        Scope::Top => match class {
            LineClass::InstrStart(label) => {
                let entry = push_category_entry(
                    outline,
                    Category::Instruments,
                    OutlineNode::new(label, Some(line_no)),
                );
                Scope::Instrument(entry)
            }
            LineClass::OpcodeStart { name, signature } => {
                let entry = push_category_entry(
                    outline,
                    Category::Opcodes,
                    OutlineNode::new(signature, Some(line_no)),
                );
                let record = OpcodeRecord::new(name);
                // Insert immediately so a forward reference sees at least
                // the bare name before the body has been walked.
                opcodes.insert(record.name.clone(), record.clone());
                Scope::Opcode { entry, record }
            }
            LineClass::MacroDefine(rest) => {
                push_category_entry(
                    outline,
                    Category::Macros,
                    OutlineNode::new(rest, Some(line_no)),
                );
                Scope::Top
            }
            LineClass::FtableDefine => {
                push_category_entry(
                    outline,
                    Category::Ftables,
                    OutlineNode::new(line, Some(line_no)),
                );
                Scope::Top
            }
            _ => Scope::Top,
        },
        Scope::Opcode { entry, mut record } => match class {
            LineClass::OpcodeEnd => {
                // The finished record replaces the bare one; last write wins
                // on duplicate names.
                opcodes.insert(record.name.clone(), record);
                Scope::Top
            }
            _ => {
                // First xin/xout occurrence wins; later call sites in the
                // same body are not recorded.
                if record.in_args.is_empty() {
                    if let Some(m) = XIN_RX.find(line) {
                        record.in_args = simplified(&line[..m.start()]);
                        let label = format!("{} xin", record.in_args);
                        push_child(
                            outline,
                            Category::Opcodes,
                            entry,
                            OutlineNode::new(label, Some(line_no)),
                        );
                    }
                } else if record.out_args.is_empty() {
                    if let Some(m) = XOUT_RX.find(line) {
                        record.out_args = simplified(&line[m.end()..]);
                        let label = format!("xout {}", record.out_args);
                        push_child(
                            outline,
                            Category::Opcodes,
                            entry,
                            OutlineNode::new(label, Some(line_no)),
                        );
                    }
                }
                Scope::Opcode { entry, record }
            }
        },
        Scope::Instrument(entry) => match class {
            LineClass::InstrEnd => Scope::Top,
            _ => Scope::Instrument(entry),
        },
    }
}

/// Scan Csound orchestra text into an outline and opcode table
///
/// If no `<CsInstruments>` tag exists, no body lines are scanned at all and
/// the five categories come back empty. Malformed input degrades to partial
/// categories; this function does not fail.
pub fn scan_csound(text: &str) -> ScanOutcome {
    let mut outline = Outline::empty(ScanMode::Csound);
    let mut opcodes = OpcodeTable::new();

    let lines: Vec<&str> = text.split('\n').collect();
    let mut i = 0;

    // Find the orchestra section; its tag line becomes the Instruments line.
    while i < lines.len() {
        if ORC_START_RX.is_match(lines[i]) {
            i += 1;
            if let Some(tree) = outline.category_mut(Category::Instruments) {
                tree.line = Some(i);
            }
            break;
        }
        i += 1;
    }

    let mut scope = Scope::Top;
    let mut part_of_comment = false;

    while i < lines.len() {
        let raw = lines[i];

        if part_of_comment {
            if raw.contains("*/") {
                part_of_comment = false;
            }
        } else if let Some(start) = raw.find("/*") {
            // Line-level check only: an opening marker with no close on the
            // same physical line swallows everything until a line has one.
            part_of_comment = !raw[start..].contains("*/");
        } else {
            let line = raw.trim();
            match classify_line(line) {
                LineClass::Blank | LineClass::Comment => {}
                LineClass::OrchestraEnd => break,
                LineClass::ScoreStart | LineClass::Tag(_) => {
                    tracing::debug!(line = i + 1, tag = line, "malformed orchestra tag");
                }
                LineClass::Label(text) => {
                    push_label(&mut outline, &scope, OutlineNode::new(text, Some(i + 1)));
                }
                class => {
                    scope = step(scope, class, line, i + 1, &mut outline, &mut opcodes);
                }
            }
        }
        i += 1;
    }

    // Shallow score handling: only the section boundary is recorded.
    while i < lines.len() {
        if lines[i].trim().starts_with("<CsScore>") {
            if let Some(tree) = outline.category_mut(Category::Score) {
                tree.line = Some(i + 1);
            }
            break;
        }
        i += 1;
    }

    ScanOutcome { outline, opcodes }
}

/// Scan Python source into an Imports/Classes/Functions outline
///
/// One level of nesting only: `def` lines indented under the most recent
/// `class` line become its children; there is no indentation tracking.
pub fn scan_python(text: &str) -> ScanOutcome {
    let mut outline = Outline::empty(ScanMode::Python);
    let mut current_class: Option<usize> = None;

    for (i, raw) in text.split(['\n', '\r']).enumerate() {
        let trimmed = raw.trim();
        if trimmed.starts_with("class ") {
            let mut node = OutlineNode::new(simplified(raw), Some(i + 1));
            node.expanded = true;
            if let Some(tree) = outline.category_mut(Category::Classes) {
                tree.entries.push(node);
                current_class = Some(tree.entries.len() - 1);
            }
        } else if INDENTED_DEF_RX.is_match(raw) {
            if let Some(entry) = current_class {
                push_child(
                    &mut outline,
                    Category::Classes,
                    entry,
                    OutlineNode::new(simplified(raw), Some(i + 1)),
                );
            }
        } else if IMPORT_RX.is_match(trimmed) {
            if let Some(tree) = outline.category_mut(Category::Imports) {
                tree.entries.push(OutlineNode::new(simplified(raw), Some(i + 1)));
            }
        } else if trimmed.starts_with("def ") {
            if let Some(tree) = outline.category_mut(Category::Functions) {
                tree.entries.push(OutlineNode::new(simplified(raw), Some(i + 1)));
            }
        } else if raw.contains("##") {
            // Pseudo-outline convention: ## comment lines show under Functions
            if let Some(tree) = outline.category_mut(Category::Functions) {
                tree.entries.push(OutlineNode::new(simplified(raw), Some(i + 1)));
            }
        }
    }

    for tree in &mut outline.categories {
        tree.expanded = true;
    }

    ScanOutcome {
        outline,
        opcodes: OpcodeTable::new(),
    }
}
