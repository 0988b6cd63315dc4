use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use crate::signup::theme::Theme;

/// Which append-only store receives signups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SinkBackend {
    /// Google spreadsheet, looked up by title.
    #[serde(rename = "sheet", alias = "cloudsheet", alias = "google")]
    CloudSheet,
    /// Delimited file on local disk.
    #[serde(rename = "file", alias = "localfile", alias = "csv")]
    LocalFile,
}

impl FromStr for SinkBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheet" | "cloudsheet" | "google" => Ok(Self::CloudSheet),
            "file" | "localfile" | "csv" => Ok(Self::LocalFile),
            other => anyhow::bail!("unknown signup backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub sheet_name: String,
    pub service_account_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: SinkBackend,
    pub sheet: SheetConfig,
    pub csv_path: PathBuf,
    pub theme: Theme,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = std::env::var("SIGNUP_BACKEND")
            .unwrap_or_else(|_| "sheet".into())
            .parse::<SinkBackend>()?;
        let sheet = SheetConfig {
            sheet_name: std::env::var("SHEET_NAME").unwrap_or_else(|_| "O-Day".into()),
            service_account_file: std::env::var("GCP_SERVICE_ACCOUNT_FILE")
                .ok()
                .map(PathBuf::from),
        };
        if backend == SinkBackend::CloudSheet && sheet.service_account_file.is_none() {
            tracing::warn!("GCP_SERVICE_ACCOUNT_FILE not set; every sheet write will fail");
        }
        let csv_path = std::env::var("SIGNUP_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("signups.csv"));
        let theme = std::env::var("SIGNUP_THEME")
            .unwrap_or_else(|_| "navy".into())
            .parse::<Theme>()
            .context("SIGNUP_THEME")?;
        Ok(Self {
            backend,
            sheet,
            csv_path,
            theme,
        })
    }
}
