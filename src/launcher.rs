use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no clipboard tool found (tried {tried})")]
    NoClipboard { tried: String },

    #[error("could not open {url}: {source}")]
    Open { url: String, source: std::io::Error },
}

/// Side effects that leave the terminal: clipboard and external pages.
pub trait Launcher {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), LaunchError>;
    fn open_url(&self, url: &str) -> Result<(), LaunchError>;
}

/// Shells out to the usual desktop tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    // stdin is dropped before waiting so the tool sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("{} exited with {}", program, status)))
    }
}

/// Start `command` without blocking; a background thread reaps it.
fn spawn_detached(command: &mut Command) -> std::io::Result<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!(error = %e, "detached child not reaped");
        }
    });
    Ok(())
}

impl Launcher for SystemLauncher {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), LaunchError> {
        for (program, args) in CLIPBOARD_TOOLS {
            match pipe_into(program, args, text) {
                Ok(()) => {
                    tracing::debug!(program, "copied to clipboard");
                    return Ok(());
                }
                Err(e) => tracing::trace!(program, error = %e, "clipboard tool unavailable"),
            }
        }
        Err(LaunchError::NoClipboard {
            tried: CLIPBOARD_TOOLS
                .iter()
                .map(|(p, _)| *p)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        spawn_detached(Command::new(opener).arg(url))
            .map(|_| tracing::info!(url, "opened external page"))
            .map_err(|source| LaunchError::Open {
                url: url.to_string(),
                source,
            })
    }
}
