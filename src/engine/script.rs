//! "Run in terminal" script generation
//!
//! Builds a self-deleting `#!/bin/sh` script that runs the current document
//! through the csound (or python) executable from the settings, writes it
//! to a temp file with owner exec permission, and optionally launches the
//! configured terminal emulator on it. OPCODEDIR is exported in the script
//! because it must be present before csound initializes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::Settings;

/// Build the shell script for one terminal run
///
/// `executable` overrides the csound binary (used for Python documents);
/// when overridden, no configured flags are added. With a `companion` file
/// the orc always comes first on the command line.
pub fn generate_script(
    settings: &Settings,
    realtime: bool,
    file: &Path,
    companion: Option<&Path>,
    executable: Option<&str>,
) -> String {
    let mut script = String::from("#!/bin/sh\n");

    if settings.opcodedir_active {
        if let Some(dir) = &settings.opcodedir {
            script.push_str(&format!("export OPCODEDIR={}\n", dir));
        }
    }

    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    script.push_str(&format!("cd {}\n", dir.display()));

    let mut cmd_line = match executable {
        Some(exe) => format!("{} ", exe),
        None => {
            let mut cmd = format!("{} ", settings.csound_executable);
            if let Some(flags) = settings.command_line_flags(realtime) {
                cmd.push_str(flags);
                cmd.push(' ');
            }
            cmd
        }
    };

    match companion {
        Some(companion) => {
            let orc_first = file
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("orc"));
            if orc_first {
                cmd_line.push_str(&format!("\"{}\" \"{}\" ", file.display(), companion.display()));
            } else {
                cmd_line.push_str(&format!("\"{}\" \"{}\" ", companion.display(), file.display()));
            }
        }
        None => {
            cmd_line.push_str(&format!("\"{}\" ", file.display()));
        }
    }

    script.push_str(&format!("echo \"{}\"\n", cmd_line));
    script.push_str(&cmd_line);
    script.push('\n');

    script.push_str("echo \"\nPress return to continue\"\n");
    script.push_str("dummy_var=\"\"\n");
    script.push_str("read dummy_var\n");
    script.push_str("rm $0\n");

    script
}

/// Write a run script to a unique temp file with owner exec permission
pub fn write_script(script: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("csdedit_run_script-")
        .suffix(".sh")
        .tempfile()
        .context("creating run script file")?;
    file.write_all(script.as_bytes())
        .context("writing run script")?;
    let (_, path) = file.keep().context("persisting run script")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o700))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }

    Ok(path)
}

/// Terminal program and arguments used to open a script
pub fn terminal_invocation(terminal: &str, script: &Path) -> (String, Vec<String>) {
    #[cfg(target_os = "macos")]
    {
        (
            "open".to_string(),
            vec![
                "-a".to_string(),
                terminal.to_string(),
                script.display().to_string(),
            ],
        )
    }

    #[cfg(not(target_os = "macos"))]
    {
        (
            terminal.to_string(),
            vec!["-e".to_string(), script.display().to_string()],
        )
    }
}

/// Generate, persist and launch a run script in the configured terminal.
/// Returns the script path; the script removes itself when the run ends.
pub fn run_in_terminal(
    settings: &Settings,
    realtime: bool,
    file: &Path,
    companion: Option<&Path>,
    executable: Option<&str>,
) -> Result<PathBuf> {
    let script = generate_script(settings, realtime, file, companion, executable);
    let path = write_script(&script)?;
    let (program, args) = terminal_invocation(&settings.terminal, &path);
    Command::new(&program)
        .args(&args)
        .spawn()
        .with_context(|| format!("could not run terminal program '{}'", program))?;
    tracing::info!("launched terminal run: {} {:?}", program, args);
    Ok(path)
}
