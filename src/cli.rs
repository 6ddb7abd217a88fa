// Command line surface of the `scanserv` binary.

use crate::api::ScannerClient;
use crate::config::Config;
use crate::scan::{ColorMode, Quality, ScanOptions, ScanParams};
use crate::ui;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "scanserv", version, about = "Scanner command line interface for scanservjs")]
pub struct Cli {
    /// Scanner server URL (default from config, http://scan.home)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Scanner number as shown by --list (default from config)
    #[arg(long, value_name = "N")]
    pub device: Option<usize>,

    /// Choose the scanner interactively
    #[arg(long)]
    pub pick: bool,

    /// List available scanners and files on the server
    #[arg(long)]
    pub list: bool,

    /// Scan an A4 document
    #[arg(long)]
    pub scan: bool,

    /// Color mode
    #[arg(long, value_enum)]
    pub mode: Option<ColorMode>,

    /// Scan resolution in DPI
    #[arg(long, value_name = "DPI", allow_negative_numbers = true)]
    pub resolution: Option<i64>,

    /// Image quality
    #[arg(long, value_enum)]
    pub quality: Option<Quality>,

    /// Keep the scanned file on the server only
    #[arg(long)]
    pub no_download: bool,

    /// Download a specific file from the server
    #[arg(long, value_name = "FILENAME")]
    pub download: Option<String>,

    /// Download all scanned files from the server
    #[arg(long)]
    pub download_all: bool,

    /// Output directory for downloaded files (default from config)
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the per-user one
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    fn has_action(&self) -> bool {
        self.scan || self.download_all || self.download.is_some()
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            resolution: self.resolution,
            mode: self.mode,
            quality: self.quality,
        }
    }
}

/// Run one invocation: optional listing, then scan, download-all and
/// download, in that order. The first surfaced error stops the run.
pub fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let mut client = ScannerClient::from_config(&config, cli.server.as_deref())
        .context("Failed to create scanner client")?;
    let output_dir = cli.output_dir.clone().unwrap_or_else(|| config.files.output_dir.clone());

    if cli.list || !cli.has_action() {
        list(&mut client)?;
    }

    if cli.scan {
        let device = cli.device.unwrap_or(config.device);
        scan(&mut client, cli, &config, device, &output_dir)?;
    }

    if cli.download_all {
        download_all(&mut client, &output_dir)?;
    }

    if let Some(name) = &cli.download {
        let spinner = ui::spinner(format!("Downloading {}...", name));
        let result = client.download(name, &output_dir);
        spinner.finish_and_clear();
        let path = result.with_context(|| format!("Failed to download {}", name))?;
        println!("Downloaded {} to {}", name, path.display());
    }

    Ok(())
}

fn list(client: &mut ScannerClient) -> Result<()> {
    let devices = client.list_scanners().context("Failed to list scanners")?;
    print!("{}", ui::format_devices(&devices));
    let files = client.list_files().context("Failed to list files")?;
    print!("{}", ui::format_files(&files));
    Ok(())
}

fn scan(
    client: &mut ScannerClient,
    cli: &Cli,
    config: &Config,
    device: usize,
    output_dir: &Path,
) -> Result<()> {
    let options = cli.scan_options();
    // reject bad parameters before contacting the service at all
    ScanParams::resolve(&options, &config.scan)?;

    let index = if cli.pick {
        let devices = client.list_scanners().context("Failed to list scanners")?;
        if devices.is_empty() {
            bail!("No scanners found");
        }
        ui::pick_device(&devices, device)?
    } else {
        device
    };
    let selected = client.select_scanner(index)?;
    println!("Selected scanner: {}", selected.name);

    let spinner = ui::spinner("Scanning...");
    let result = client.scan_a4(&options);
    spinner.finish_and_clear();
    let filename = result.context("Scan failed")?;
    println!("Scan successful!");
    println!("File on server: {}", filename);

    if cli.no_download {
        return Ok(());
    }
    let spinner = ui::spinner(format!("Downloading {}...", filename));
    let result = client.download(&filename, output_dir);
    spinner.finish_and_clear();
    let path = result.with_context(|| format!("Failed to download {}", filename))?;
    println!("Saved to: {}", path.display());
    Ok(())
}

fn download_all(client: &mut ScannerClient, output_dir: &Path) -> Result<()> {
    let spinner = ui::spinner("Listing files...");
    let result = client.download_all_with(output_dir, |n, total, file| {
        spinner.set_message(format!("Downloading {} ({}/{})...", file.name, n, total));
    });
    spinner.finish_and_clear();
    let report = result.context("Failed to list files")?;

    if report.total() == 0 {
        println!("No files found on server");
        return Ok(());
    }
    for path in &report.downloaded {
        println!("Saved to: {}", path.display());
    }
    for failed in &report.failed {
        eprintln!("Failed to download {}: {}", failed.name, failed.error);
    }
    if !report.is_complete() {
        bail!(
            "{} of {} downloads failed",
            report.failed.len(),
            report.total()
        );
    }
    println!("Downloaded {} file(s)", report.total());
    Ok(())
}
