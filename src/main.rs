//! csdedit CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use csdedit::cli::{CliArgs, Command};
use csdedit::engine::{script, NullEngine};
use csdedit::inspector::{CategoryTree, OpcodeTable, Outline};
use csdedit::model::{DocumentPage, EditMode};
use csdedit::recent_files::RecentFiles;
use csdedit::widgets::CollectingHost;
use csdedit::Settings;

fn main() -> Result<()> {
    csdedit::tracing::init();
    let args = CliArgs::parse();

    match args.command {
        Command::Outline { file, python } => outline(&file, python),
        Command::Strip { file, show_panel } => strip(&file, show_panel),
        Command::Script {
            file,
            realtime,
            companion,
        } => print_script(&file, realtime, companion.as_deref()),
        Command::Check { file } => check(&file),
    }
}

/// Open a document into a fresh page with stub collaborators
fn open_page(path: &Path) -> Result<DocumentPage> {
    let mut page = DocumentPage::new(
        Box::<CollectingHost>::default(),
        Box::<NullEngine>::default(),
    );
    page.load_file(path.to_path_buf())
        .with_context(|| format!("could not open {}", path.display()))?;

    let mut recent = RecentFiles::load();
    recent.add(path.to_path_buf());
    if let Err(e) = recent.save() {
        tracing::debug!("could not update recent files: {}", e);
    }

    Ok(page)
}

fn outline(path: &Path, force_python: bool) -> Result<()> {
    let mut page = open_page(path)?;
    if force_python {
        page.document.mode = EditMode::Python;
    }

    let Some(outcome) = page.refresh_outline() else {
        println!("{}: no outline for this file type", path.display());
        return Ok(());
    };

    print_outline(&outcome.outline);
    if !outcome.opcodes.is_empty() {
        println!();
        print_opcode_table(&outcome.opcodes);
    }
    Ok(())
}

fn strip(path: &Path, show_panel: bool) -> Result<()> {
    let page = open_page(path)?;
    if show_panel {
        eprintln!("{}", page.widgets().widgets_xml());
    }
    print!("{}", page.basic_text());
    Ok(())
}

fn print_script(path: &Path, realtime: bool, companion: Option<&Path>) -> Result<()> {
    let settings = Settings::load();
    let executable = match EditMode::from_path(path) {
        EditMode::Python => Some(settings.python_executable.clone()),
        _ => None,
    };
    let script = script::generate_script(
        &settings,
        realtime,
        path,
        companion,
        executable.as_deref(),
    );
    print!("{}", script);
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let mut page = open_page(path)?;
    println!("{} ({} lines)", page.document.display_name(), page.document.line_count());

    let Some(outcome) = page.refresh_outline() else {
        println!("  no scanner for this file type");
        return Ok(());
    };
    for tree in &outcome.outline.categories {
        println!("  {:12} {}", tree.category.title(), tree.entries.len());
    }
    if !outcome.opcodes.is_empty() {
        println!("  {:12} {}", "UDO table", outcome.opcodes.len());
    }
    Ok(())
}

fn line_display(line: Option<usize>) -> String {
    match line {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    }
}

fn print_outline(outline: &Outline) {
    for tree in &outline.categories {
        print_category(tree);
    }
}

fn print_category(tree: &CategoryTree) {
    println!("{} [{}]", tree.category.title(), line_display(tree.line));
    for entry in &tree.entries {
        println!("  {} [{}]", entry.label, line_display(entry.line));
        for child in &entry.children {
            println!("    {} [{}]", child.label, line_display(child.line));
        }
    }
}

fn print_opcode_table(opcodes: &OpcodeTable) {
    println!("User-defined opcodes:");
    let mut names: Vec<_> = opcodes.keys().collect();
    names.sort();
    for name in names {
        let record = &opcodes[name];
        println!("  {}: in({}) out({})", record.name, record.in_args, record.out_args);
    }
}
