//! Command-line argument parsing
//!
//! Supports:
//! - Dumping a document's outline and opcode table
//! - Stripping widget sections from a document
//! - Generating the "run in terminal" script
//! - Summarizing a document's structure

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Editing core tools for Csound documents
#[derive(Parser, Debug)]
#[command(name = "csdedit", version, about = "Editing core tools for Csound documents")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the outline tree and opcode table for a document
    Outline {
        /// Document to scan (.csd, .orc, .py, ...)
        file: PathBuf,

        /// Use the Python scanner regardless of the file extension
        #[arg(long)]
        python: bool,
    },

    /// Print the document with widget sections removed
    Strip {
        file: PathBuf,

        /// Also print the extracted panel markup to stderr
        #[arg(long)]
        show_panel: bool,
    },

    /// Print the shell script a terminal run would use
    Script {
        file: PathBuf,

        /// Use realtime flags instead of offline-render flags
        #[arg(long)]
        realtime: bool,

        /// Companion .orc/.sco file to run together with the document
        #[arg(long)]
        companion: Option<PathBuf>,
    },

    /// Summarize a document: entries per outline category
    Check { file: PathBuf },
}
