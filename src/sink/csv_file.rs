use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::{RecordSink, SinkError};
use crate::signup::record::{SignupRecord, ROW_HEADER};

/// Appends rows to a comma-separated file, writing the header on first use.
#[derive(Debug, Clone)]
pub struct LocalFileSink {
    path: PathBuf,
    // held across the empty-file check and the write
    write_lock: Arc<Mutex<()>>,
}

impl LocalFileSink {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

#[async_trait]
impl RecordSink for LocalFileSink {
    async fn append(&self, record: &SignupRecord) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let is_new = file.metadata().await?.len() == 0;
        let mut buf = String::new();
        if is_new {
            buf.push_str(&encode_line(&ROW_HEADER));
        }
        buf.push_str(&encode_line(&record.to_row()));

        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        debug!(path = %self.path.display(), header = is_new, "row appended");
        Ok(())
    }

    fn label(&self) -> &'static str {
        "Signup file error"
    }
}

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::signup::{dto::SignupForm, services::validate};
    use crate::sink::SinkErrorKind;
    use time::macros::datetime;

    fn record(name: &str) -> SignupRecord {
        let form = SignupForm {
            full_name: name.into(),
            student_number: "12345678".into(),
            social_handle: "handle".into(),
            degree_choice: "Geology".into(),
            other_degree_text: String::new(),
        };
        validate(&form, datetime!(2025-02-24 12:00:00 UTC)).unwrap()
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[tokio::test]
    async fn header_written_once_then_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signups.csv");
        let sink = LocalFileSink::new(path.clone());

        for name in ["Ann", "Ben", "Cat"] {
            sink.append(&record(name)).await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Name,Student Number,Facebook,Degree,Timestamp");
        assert_eq!(lines[1], "Ann,12345678,handle,Geology,2025-02-24 12:00:00");
        assert!(lines[2].starts_with("Ben,"));
        assert!(lines[3].starts_with("Cat,"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn simultaneous_first_writes_share_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signups.csv");
        let sink = Arc::new(LocalFileSink::new(path.clone()));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let sink = sink.clone();
                tokio::spawn(async move { sink.append(&record(&format!("N{i}"))).await })
            })
            .collect();
        for t in tasks {
            t.await.unwrap().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Name,Student Number").count(), 1);
        assert!(contents.starts_with("Name,Student Number"));
        assert_eq!(contents.lines().count(), 17);
    }

    #[tokio::test]
    async fn existing_file_is_not_given_a_second_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signups.csv");
        std::fs::write(&path, "Name,Student Number,Facebook,Degree,Timestamp\n").unwrap();

        LocalFileSink::new(path.clone())
            .append(&record("Ann"))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Name,Student Number").count(), 1);
        assert_eq!(contents.lines().count(), 2);
    }

    #[tokio::test]
    async fn missing_directory_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("signups.csv");
        let err = LocalFileSink::new(path.clone())
            .append(&record("Ann"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), SinkErrorKind::NotFound);
        assert!(!path.exists());
    }
}
