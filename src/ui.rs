// UI layer: terminal output for the binary. Listings go to stdout,
// spinners to stderr (indicatif hides them when stderr is not a terminal).

use crate::api::{Device, RemoteFile};
use anyhow::Result;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Numbered scanner listing; the numbers are what `--device` expects.
pub fn format_devices(devices: &[Device]) -> String {
    if devices.is_empty() {
        return "No scanners found\n".to_string();
    }
    let mut out = String::from("Available scanners:\n");
    for (i, device) in devices.iter().enumerate() {
        out.push_str(&format!("{}. ID: {}\n   Name: {}\n\n", i + 1, device.id, device.name));
    }
    out
}

pub fn format_files(files: &[RemoteFile]) -> String {
    if files.is_empty() {
        return "No files on server\n".to_string();
    }
    let mut out = String::from("Files on server:\n");
    for file in files {
        let line = match &file.size_string {
            Some(size) => format!("- {} ({})\n", file.name, size),
            None => format!("- {}\n", file.name),
        };
        out.push_str(&line);
    }
    out
}

/// Spinner shown while a blocking request runs.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Keyboard-driven scanner choice. Returns the 1-based index.
pub fn pick_device(devices: &[Device], default_index: usize) -> Result<usize> {
    let items: Vec<String> = devices
        .iter()
        .map(|d| format!("{} ({})", d.name, d.id))
        .collect();
    let default = default_index.saturating_sub(1).min(items.len().saturating_sub(1));
    let selection = Select::new()
        .with_prompt("Select scanner")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(selection + 1)
}
