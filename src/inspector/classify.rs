//! Line classification for the orchestra scanner
//!
//! One trimmed source line maps to exactly one `LineClass`. The stateful
//! walk in `scan` decides what to do with each class depending on whether
//! it is inside an instrument or opcode body; classification itself is
//! stateless and testable on its own.

use std::sync::LazyLock;

use regex::Regex;

/// User-defined opcode header: `opcode name, outtypes, intypes`
static OPCODE_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bopcode\s+(\w+),").expect("opcode pattern"));

/// F-table definition: an optional result name followed by `ftgen`
static FTABLE_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w]*[\s]*ftgen").expect("ftable pattern"));

/// Classification of one trimmed orchestra line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    Blank,
    /// `;; ` user-inserted outline label; payload is the trimmed remainder
    Label(&'a str),
    /// Full-line `;` or `//` comment
    Comment,
    /// `</CsInstruments>`, the end of the orchestra section
    OrchestraEnd,
    /// `<CsScore>`, the start of the score section
    ScoreStart,
    /// Any other line starting with `<` (unexpected tag inside the orchestra)
    Tag(&'a str),
    /// `instr ` header; payload is the trimmed text after the keyword
    InstrStart(&'a str),
    InstrEnd,
    /// `opcode` header; `signature` is the raw text after the 7-char prefix
    OpcodeStart { name: &'a str, signature: &'a str },
    OpcodeEnd,
    /// `#define` line; payload is the text after the 8-char prefix
    MacroDefine(&'a str),
    FtableDefine,
    Plain,
}

/// Classify one line of orchestra text. `line` must already be trimmed.
pub fn classify_line(line: &str) -> LineClass<'_> {
    if line.is_empty() {
        return LineClass::Blank;
    }
    if let Some(rest) = line.strip_prefix(";; ") {
        return LineClass::Label(rest.trim());
    }
    if line.starts_with(';') || line.starts_with("//") {
        return LineClass::Comment;
    }
    if line.starts_with('<') {
        if line.starts_with("</CsInstruments>") {
            return LineClass::OrchestraEnd;
        }
        if line.starts_with("<CsScore>") {
            return LineClass::ScoreStart;
        }
        return LineClass::Tag(line);
    }
    if line.starts_with("endin") {
        return LineClass::InstrEnd;
    }
    if line.starts_with("endop") {
        return LineClass::OpcodeEnd;
    }
    if let Some(rest) = line.strip_prefix("instr ") {
        return LineClass::InstrStart(rest.trim());
    }
    if let Some(captures) = OPCODE_RX.captures(line) {
        let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        // Label text is everything after the "opcode " prefix, untrimmed
        let signature = line.get(7..).unwrap_or("");
        return LineClass::OpcodeStart { name, signature };
    }
    if line.starts_with("#define") {
        let rest = line.get(8..).unwrap_or("");
        return LineClass::MacroDefine(rest);
    }
    if FTABLE_RX.is_match(line) {
        return LineClass::FtableDefine;
    }
    LineClass::Plain
}
