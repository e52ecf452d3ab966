//! Hand-off to the desktop shell: reveal a file or open it elsewhere.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use super::StoreError;

/// Reveal `path` in the system file manager.
///
/// # Errors
///
/// Returns [`StoreError::Shell`] if the file manager cannot be launched.
pub fn show_in_folder(path: &Path) -> Result<(), StoreError> {
    let (program, result) = reveal_command(path);
    result.map_err(|source| StoreError::Shell {
        program,
        path: path.to_path_buf(),
        source,
    })
}

/// Open `path` with the application registered for its type.
///
/// # Errors
///
/// Returns [`StoreError::Shell`] if the opener cannot be launched.
pub fn open_externally(path: &Path) -> Result<(), StoreError> {
    let (program, result) = open_command(path);
    result.map_err(|source| StoreError::Shell {
        program,
        path: path.to_path_buf(),
        source,
    })
}

/// Launch `command` without waiting for it. A short-lived thread reaps the
/// child so it does not linger as a zombie.
fn spawn_detached(command: &mut Command) -> io::Result<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    thread::Builder::new()
        .name("shell-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!(%status, "shell opener exited"),
            Ok(_) => {}
            Err(err) => warn!(%err, "failed to wait for shell opener"),
        })?;
    Ok(())
}

fn reveal_command(path: &Path) -> (&'static str, io::Result<()>) {
    #[cfg(target_os = "macos")]
    {
        ("open", spawn_detached(Command::new("open").arg("-R").arg(path)))
    }
    #[cfg(target_os = "windows")]
    {
        let mut select = std::ffi::OsString::from("/select,");
        select.push(path);
        ("explorer", spawn_detached(Command::new("explorer").arg(select)))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        // xdg-open has no "select" mode; open the containing folder.
        let folder = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        ("xdg-open", spawn_detached(Command::new("xdg-open").arg(folder)))
    }
}

fn open_command(path: &Path) -> (&'static str, io::Result<()>) {
    #[cfg(target_os = "macos")]
    {
        ("open", spawn_detached(Command::new("open").arg(path)))
    }
    #[cfg(target_os = "windows")]
    {
        (
            "cmd",
            spawn_detached(Command::new("cmd").args(["/C", "start", ""]).arg(path)),
        )
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        ("xdg-open", spawn_detached(Command::new("xdg-open").arg(path)))
    }
}
