use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{RecordSink, SinkError};
use crate::signup::record::SignupRecord;

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// The subset of a Google service-account key file we need.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Appends rows to the first worksheet of a spreadsheet found by title.
///
/// Authorizes with a service-account key on every append; nothing is kept
/// between submissions.
#[derive(Clone)]
pub struct GoogleSheetsSink {
    client: Client,
    sheet_name: String,
    key_file: Option<PathBuf>,
    drive_base: String,
    sheets_base: String,
}

impl GoogleSheetsSink {
    pub fn new(sheet_name: &str, key_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            sheet_name: sheet_name.to_string(),
            key_file,
            drive_base: "https://www.googleapis.com".into(),
            sheets_base: "https://sheets.googleapis.com".into(),
        })
    }

    #[cfg(test)]
    fn with_endpoints(mut self, drive_base: &str, sheets_base: &str) -> Self {
        self.drive_base = drive_base.trim_end_matches('/').to_string();
        self.sheets_base = sheets_base.trim_end_matches('/').to_string();
        self
    }

    async fn load_key(&self) -> Result<ServiceAccountKey, SinkError> {
        let path = self
            .key_file
            .as_ref()
            .ok_or_else(|| SinkError::Credential("no service account key configured".into()))?;
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            SinkError::Credential(format!("read key {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| SinkError::Credential(format!("parse key {}: {}", path.display(), e)))
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String, SinkError> {
        let iat = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: SCOPES,
            aud: &key.token_uri,
            iat,
            exp: iat + 3600,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SinkError::Credential(format!("private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| SinkError::Credential(format!("sign assertion: {}", e)))?;

        let resp = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Credential(format!(
                "token exchange rejected ({}): {}",
                status, body
            )));
        }
        let token: TokenResponse = resp.json().await.map_err(transport)?;
        debug!(client_email = %key.client_email, "service account authorized");
        Ok(token.access_token)
    }

    async fn find_spreadsheet(&self, token: &str) -> Result<String, SinkError> {
        let q = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            self.sheet_name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let resp = self
            .client
            .get(format!("{}/drive/v3/files", self.drive_base))
            .bearer_auth(token)
            .query(&[("q", q.as_str()), ("fields", "files(id,name)")])
            .send()
            .await
            .map_err(transport)?;
        let list: FileList = check(resp, "list spreadsheets")
            .await?
            .json()
            .await
            .map_err(transport)?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SinkError::NotFound(format!("spreadsheet '{}'", self.sheet_name)))
    }

    async fn first_sheet_title(&self, token: &str, spreadsheet_id: &str) -> Result<String, SinkError> {
        let url = self.sheets_url(&[spreadsheet_id])?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await
            .map_err(transport)?;
        let doc: Spreadsheet = check(resp, "read spreadsheet")
            .await?
            .json()
            .await
            .map_err(transport)?;
        doc.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| {
                SinkError::NotFound(format!("spreadsheet '{}' has no sheets", self.sheet_name))
            })
    }

    fn sheets_url(&self, tail: &[&str]) -> Result<Url, SinkError> {
        let mut url = Url::parse(&self.sheets_base)
            .map_err(|e| SinkError::Unknown(format!("sheets endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SinkError::Unknown("sheets endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets"])
            .extend(tail);
        Ok(url)
    }
}

fn transport(e: reqwest::Error) -> SinkError {
    if e.is_decode() {
        SinkError::Unknown(e.to_string())
    } else {
        SinkError::Io(e.to_string())
    }
}

async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, SinkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = format!("{} ({}): {}", what, status, body);
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SinkError::Credential(detail),
        StatusCode::NOT_FOUND => SinkError::NotFound(detail),
        _ => SinkError::Unknown(detail),
    })
}

#[async_trait]
impl RecordSink for GoogleSheetsSink {
    #[instrument(skip(self, record), fields(sheet = %self.sheet_name))]
    async fn append(&self, record: &SignupRecord) -> Result<(), SinkError> {
        let key = self.load_key().await?;
        let token = self.access_token(&key).await?;
        let spreadsheet_id = self.find_spreadsheet(&token).await?;
        let worksheet = self.first_sheet_title(&token, &spreadsheet_id).await?;

        let range = format!("'{}'", worksheet.replace('\'', "''"));
        let url = self.sheets_url(&[&spreadsheet_id, "values", &format!("{}:append", range)])?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(&token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [record.to_row()] }))
            .send()
            .await
            .map_err(transport)?;
        check(resp, "append row").await?;
        debug!(%spreadsheet_id, %worksheet, "row appended");
        Ok(())
    }

    fn label(&self) -> &'static str {
        "Google Sheets Error"
    }
}
