// Library root
// -----------
// This crate exposes the scanservjs client as a library. The binary
// (`main.rs`) wires it to a command line.
//
// Module responsibilities:
// - `api`: HTTP interactions with the scanservjs service (devices, scan,
//   file listing, downloads) and the client-side selection state.
// - `scan`: scan parameters, their validation and the request body.
// - `config`: the per-user TOML configuration and its defaults.
// - `error`: the error kinds every client operation can surface.
// - `cli` / `ui`: argument parsing and terminal output for the binary.
// - `logging`: env_logger setup for the binary.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod scan;
pub mod ui;

pub use api::{Device, DownloadReport, RemoteFile, ScannerClient};
pub use config::Config;
pub use error::{Error, Result};
pub use scan::{ColorMode, Quality, ScanOptions, ScanParams};
