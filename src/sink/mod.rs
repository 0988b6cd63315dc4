use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{AppConfig, SinkBackend};
use crate::signup::record::SignupRecord;

pub mod csv_file;
pub mod sheets;

pub use csv_file::LocalFileSink;
pub use sheets::GoogleSheetsSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkErrorKind {
    Credential,
    NotFound,
    Io,
    Unknown,
}

/// Why a row could not be appended.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("credential error: {0}")]
    Credential(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("i/o error: {0}")]
    Io(String),
    #[error("{0}")]
    Unknown(String),
}

impl SinkError {
    pub fn kind(&self) -> SinkErrorKind {
        match self {
            SinkError::Credential(_) => SinkErrorKind::Credential,
            SinkError::NotFound(_) => SinkErrorKind::NotFound,
            SinkError::Io(_) => SinkErrorKind::Io,
            SinkError::Unknown(_) => SinkErrorKind::Unknown,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => SinkError::NotFound(e.to_string()),
            _ => SinkError::Io(e.to_string()),
        }
    }
}

/// Durable append-only destination for validated signups.
///
/// `append` writes exactly one row or nothing at all.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&self, record: &SignupRecord) -> Result<(), SinkError>;

    /// Prefix for the informational detail shown next to a failure.
    fn label(&self) -> &'static str;
}

pub fn build_sink(config: &AppConfig) -> anyhow::Result<Arc<dyn RecordSink>> {
    let sink: Arc<dyn RecordSink> = match config.backend {
        SinkBackend::CloudSheet => Arc::new(GoogleSheetsSink::new(
            &config.sheet.sheet_name,
            config.sheet.service_account_file.clone(),
        )?),
        SinkBackend::LocalFile => Arc::new(LocalFileSink::new(config.csv_path.clone())),
    };
    tracing::info!(backend = ?config.backend, "record sink ready");
    Ok(sink)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory sink for handler tests; can be told to fail.
    #[derive(Default)]
    pub struct RecordingSink {
        pub rows: Mutex<Vec<Vec<String>>>,
        pub fail_with: Option<SinkErrorKind>,
    }

    impl RecordingSink {
        pub fn failing(kind: SinkErrorKind) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_with: Some(kind),
            }
        }

        pub fn rows(&self) -> Vec<Vec<String>> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordSink for RecordingSink {
        async fn append(&self, record: &SignupRecord) -> Result<(), SinkError> {
            match self.fail_with {
                Some(SinkErrorKind::Credential) => Err(SinkError::Credential("bad key".into())),
                Some(SinkErrorKind::NotFound) => Err(SinkError::NotFound("no sheet".into())),
                Some(SinkErrorKind::Io) => Err(SinkError::Io("connection reset".into())),
                Some(SinkErrorKind::Unknown) => Err(SinkError::Unknown("boom".into())),
                None => {
                    let row = record.to_row().iter().map(|s| s.to_string()).collect();
                    self.rows.lock().unwrap().push(row);
                    Ok(())
                }
            }
        }

        fn label(&self) -> &'static str {
            "Test sink error"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let e: SinkError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(e.kind(), SinkErrorKind::NotFound);
        let e: SinkError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(e.kind(), SinkErrorKind::Io);
    }
}
