// API client module: a small blocking HTTP client that talks to a
// scanservjs instance. Each call is a single request/response exchange;
// the only state kept between calls is the last device listing, the
// selected device and the last file listing.

use crate::config::{Config, HttpConfig, ScanDefaults};
use crate::error::{Error, Result};
use crate::scan::{ScanOptions, ScanParams, ScanRequest};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A scanner known to the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: String,
}

/// One entry of `/api/v1/files`. Only `name` is required; the rest is
/// informational. `last_modified` is kept as a `serde_json::Value` because
/// scanservjs versions disagree on whether it is a string or a timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub size_string: Option<String>,
    #[serde(default)]
    pub last_modified: Option<serde_json::Value>,
}

/// `GET /api/v1/context`. The service sends a lot more than the device
/// list; everything else is ignored.
#[derive(Deserialize, Debug)]
struct ContextResponse {
    #[serde(default)]
    devices: Vec<Device>,
}

#[derive(Deserialize, Debug)]
struct ScanResponse {
    file: Option<ScannedFile>,
}

#[derive(Deserialize, Debug)]
struct ScannedFile {
    name: String,
}

#[derive(Debug)]
pub struct FailedDownload {
    pub name: String,
    pub error: Error,
}

/// Outcome of [`ScannerClient::download_all`]. Entries appear in listing
/// order.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<FailedDownload>,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Client for one scanservjs server. Holds the reqwest blocking client, the
/// base URL, the scan defaults and the session fields listed above.
pub struct ScannerClient {
    client: Client,
    base_url: Url,
    scan_defaults: ScanDefaults,
    devices: Option<Vec<Device>>,
    selected: Option<Device>,
    files: Option<Vec<RemoteFile>>,
}

impl ScannerClient {
    /// Create a client for `server` with the given timeouts and the built-in
    /// scan defaults.
    pub fn new(server: &str, http: &HttpConfig) -> Result<Self> {
        let base_url = Url::parse(server)
            .map_err(|e| Error::Validation(format!("invalid server URL '{}': {}", server, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Validation(format!(
                "invalid server URL '{}': not an http(s) base URL",
                server
            )));
        }
        http.validate()?;
        let client = Client::builder()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()
            .map_err(|e| Error::Connection(format!("failed to build HTTP client: {}", e)))?;
        Ok(ScannerClient {
            client,
            base_url,
            scan_defaults: ScanDefaults::default(),
            devices: None,
            selected: None,
            files: None,
        })
    }

    /// Client configured from `config`, optionally talking to `server`
    /// instead of the configured one.
    pub fn from_config(config: &Config, server: Option<&str>) -> Result<Self> {
        let server = server.unwrap_or(&config.server);
        Ok(Self::new(server, &config.http)?.with_scan_defaults(config.scan.clone()))
    }

    pub fn with_scan_defaults(mut self, defaults: ScanDefaults) -> Self {
        self.scan_defaults = defaults;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Devices from the most recent `list_scanners` call.
    pub fn devices(&self) -> Option<&[Device]> {
        self.devices.as_deref()
    }

    pub fn selected(&self) -> Option<&Device> {
        self.selected.as_ref()
    }

    /// Files from the most recent `list_files` call.
    pub fn files(&self) -> Option<&[RemoteFile]> {
        self.files.as_deref()
    }

    /// `<base>/api/v1/<segments...>`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> Result<Response> {
        log::debug!("GET {}", url);
        let res = self.client.get(url.clone()).send()?;
        log::debug!("GET {} -> {}", url, res.status());
        Ok(res)
    }

    /// Fetch the device list and remember it for `select_scanner`.
    pub fn list_scanners(&mut self) -> Result<Vec<Device>> {
        let url = self.endpoint(&["context"]);
        let res = expect_success(self.get(url.clone())?, &url)?;
        let context: ContextResponse = res.json()?;
        log::info!("service reports {} scanner(s)", context.devices.len());
        self.devices = Some(context.devices.clone());
        Ok(context.devices)
    }

    /// Select the scanner at 1-based `index` in the last listing, fetching a
    /// listing first if there is none.
    pub fn select_scanner(&mut self, index: usize) -> Result<Device> {
        if self.devices.is_none() {
            self.list_scanners()?;
        }
        let devices = self.devices.as_deref().unwrap_or(&[]);
        if devices.is_empty() {
            return Err(Error::Validation(format!(
                "cannot select scanner {}: no scanners found",
                index
            )));
        }
        if index == 0 || index > devices.len() {
            return Err(Error::Validation(format!(
                "invalid scanner number {}, choose between 1 and {}",
                index,
                devices.len()
            )));
        }
        let device = devices[index - 1].clone();
        log::info!("selected scanner {} ({})", device.name, device.id);
        self.selected = Some(device.clone());
        Ok(device)
    }

    /// Scan a full A4 page on the selected scanner and return the name of the
    /// file the service stored. Parameters are validated before any request
    /// is sent. The call blocks until the service answers or the configured
    /// timeout expires.
    pub fn scan_a4(&self, options: &ScanOptions) -> Result<String> {
        let params = ScanParams::resolve(options, &self.scan_defaults)?;
        let device = self.selected.as_ref().ok_or_else(|| {
            Error::Validation("no scanner selected, select one before scanning".into())
        })?;
        let body = ScanRequest::a4(&device.id, &params);
        let url = self.endpoint(&["scan"]);

        log::info!(
            "scanning on {} at {} dpi, mode {}, quality {}",
            device.id,
            params.resolution,
            params.mode,
            params.quality
        );
        let res = self.client.post(url.clone()).json(&body).send()?;
        let status = res.status();
        log::debug!("POST {} -> {}", url, status);
        if !status.is_success() {
            let txt = res.text().unwrap_or_else(|_| "".into());
            return Err(Error::Scan(format!("{} - {}", status, txt.trim())));
        }

        let reply: ScanResponse = res.json()?;
        let file = reply.file.ok_or_else(|| {
            Error::Protocol("scan completed but no file information returned".into())
        })?;
        log::info!("scan stored on server as {}", file.name);
        Ok(file.name)
    }

    /// List the files currently held by the service.
    pub fn list_files(&mut self) -> Result<Vec<RemoteFile>> {
        let url = self.endpoint(&["files"]);
        let res = expect_success(self.get(url.clone())?, &url)?;
        let files: Vec<RemoteFile> = res.json()?;
        log::info!("service holds {} file(s)", files.len());
        self.files = Some(files.clone());
        Ok(files)
    }

    /// Download `filename` into `output_dir`, creating the directory when
    /// needed. Nothing is written unless the whole body was received.
    pub fn download(&self, filename: &str, output_dir: &Path) -> Result<PathBuf> {
        validate_filename(filename)?;
        let url = self.endpoint(&["files", filename]);
        let res = self.get(url.clone())?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(filename.to_string()));
        }
        let res = expect_success(res, &url)?;
        let bytes = res.bytes()?;

        fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
        let path = output_dir.join(filename);
        fs::write(&path, &bytes).map_err(|e| Error::io(&path, e))?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Download every file the service lists, one after another. A failure
    /// on one file is recorded in the report and the rest are still tried.
    pub fn download_all(&mut self, output_dir: &Path) -> Result<DownloadReport> {
        self.download_all_with(output_dir, |_, _, _| {})
    }

    /// Like [`download_all`](Self::download_all), calling `on_file` with the
    /// 1-based position, the total and the entry before each download.
    pub fn download_all_with<F>(&mut self, output_dir: &Path, mut on_file: F) -> Result<DownloadReport>
    where
        F: FnMut(usize, usize, &RemoteFile),
    {
        let files = self.list_files()?;
        let total = files.len();
        let mut report = DownloadReport::default();
        for (i, file) in files.into_iter().enumerate() {
            on_file(i + 1, total, &file);
            match self.download(&file.name, output_dir) {
                Ok(path) => report.downloaded.push(path),
                Err(error) => {
                    log::warn!("failed to download {}: {}", file.name, error);
                    report.failed.push(FailedDownload {
                        name: file.name,
                        error,
                    });
                }
            }
        }
        Ok(report)
    }
}

fn expect_success(res: Response, url: &Url) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let txt = res.text().unwrap_or_else(|_| "".into());
    Err(Error::Protocol(format!(
        "{} returned {} - {}",
        url.path(),
        status,
        txt.trim()
    )))
}

/// Remote names are joined onto the output directory, so anything that is
/// not a plain file name is refused.
fn validate_filename(filename: &str) -> Result<()> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid file name '{}'", filename)))
    }
}
