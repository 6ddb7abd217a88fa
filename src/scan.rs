// Scan parameters: color mode, quality, resolution and the request body
// posted to `/api/v1/scan`.

use crate::config::ScanDefaults;
use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A4 paper size in millimetres.
pub const A4_WIDTH_MM: u32 = 210;
pub const A4_HEIGHT_MM: u32 = 297;

/// Color mode understood by the SANE backends behind scanservjs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ColorMode {
    #[value(name = "Color")]
    Color,
    #[value(name = "Gray")]
    Gray,
    #[value(name = "Lineart")]
    Lineart,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Color => "Color",
            ColorMode::Gray => "Gray",
            ColorMode::Lineart => "Lineart",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Color" => Ok(ColorMode::Color),
            "Gray" => Ok(ColorMode::Gray),
            "Lineart" => Ok(ColorMode::Lineart),
            other => Err(Error::Validation(format!(
                "unknown mode '{}', expected one of Color, Gray, Lineart",
                other
            ))),
        }
    }
}

/// Output quality, mapped onto one of the service's JPG pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }

    /// Pipeline name as configured in scanservjs.
    pub fn pipeline(&self) -> String {
        format!("JPG | @:pipeline.{}-quality", self.as_str())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            "low" => Ok(Quality::Low),
            other => Err(Error::Validation(format!(
                "unknown quality '{}', expected one of high, medium, low",
                other
            ))),
        }
    }
}

/// Per-call overrides. Anything left `None` falls back to the configured
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub resolution: Option<i64>,
    pub mode: Option<ColorMode>,
    pub quality: Option<Quality>,
}

/// Fully resolved and validated scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    pub resolution: u32,
    pub mode: ColorMode,
    pub quality: Quality,
}

impl ScanParams {
    /// Merge explicit options over the configured defaults and validate the
    /// result. Fails with [`Error::Validation`] for a non-positive resolution
    /// or a mode/quality string the service does not know.
    pub fn resolve(options: &ScanOptions, defaults: &ScanDefaults) -> Result<Self> {
        let resolution = validate_resolution(options.resolution.unwrap_or(defaults.resolution))?;
        let mode = match options.mode {
            Some(mode) => mode,
            None => defaults.mode.parse()?,
        };
        let quality = match options.quality {
            Some(quality) => quality,
            None => defaults.quality.parse()?,
        };
        Ok(ScanParams {
            resolution,
            mode,
            quality,
        })
    }
}

fn validate_resolution(dpi: i64) -> Result<u32> {
    if dpi <= 0 {
        return Err(Error::Validation(format!(
            "resolution must be a positive DPI value, got {}",
            dpi
        )));
    }
    u32::try_from(dpi).map_err(|_| Error::Validation(format!("resolution {} is too large", dpi)))
}

/// Body of `POST /api/v1/scan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanRequest {
    pub params: ScanRequestParams,
    pub pipeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequestParams {
    pub device_id: String,
    pub resolution: u32,
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub page_width: u32,
    pub page_height: u32,
    pub top: u32,
    pub left: u32,
}

impl ScanRequest {
    /// Full-page A4 scan on `device_id`.
    pub fn a4(device_id: &str, params: &ScanParams) -> Self {
        ScanRequest {
            params: ScanRequestParams {
                device_id: device_id.to_string(),
                resolution: params.resolution,
                mode: params.mode,
                width: A4_WIDTH_MM,
                height: A4_HEIGHT_MM,
                page_width: A4_WIDTH_MM,
                page_height: A4_HEIGHT_MM,
                top: 0,
                left: 0,
            },
            pipeline: params.quality.pipeline(),
        }
    }
}
