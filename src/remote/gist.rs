//! GitHub gist backend. The snapshot lives in a single file of a private gist.

use super::RemoteStore;
use crate::core::snapshot::parse_snapshot;
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::Snapshot;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

pub const API_BASE: &str = "https://api.github.com";
pub const GIST_FILE_NAME: &str = "wirys-data.json";
const GIST_DESCRIPTION: &str = "wirys app data (JSON snapshot)";

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

pub struct GistStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GistStore {
    pub fn new(token: Option<String>) -> AppResult<Self> {
        Self::with_base_url(API_BASE, token)
    }

    /// Point the client at another API root (GitHub Enterprise, test servers).
    pub fn with_base_url(base_url: &str, token: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("rhousekeep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn request(&self, builder: RequestBuilder) -> AppResult<GistResponse> {
        let mut builder = builder.header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("token {}", token));
        }

        let res = builder.send()?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().unwrap_or_default();
            return Err(AppError::Remote(format!(
                "GitHub API error {}: {}",
                status.as_u16(),
                text
            )));
        }
        Ok(res.json::<GistResponse>()?)
    }

    fn files_body(snapshot: &Snapshot) -> AppResult<serde_json::Value> {
        let content = serde_json::to_string_pretty(snapshot)?;
        Ok(json!({ GIST_FILE_NAME: { "content": content } }))
    }
}

impl RemoteStore for GistStore {
    fn fetch(&mut self, id: &str) -> AppResult<Snapshot> {
        let url = format!("{}/gists/{}", self.base_url, id);
        let gist = self.request(self.client.get(&url))?;

        let file = gist.files.get(GIST_FILE_NAME).ok_or_else(|| {
            AppError::Remote(format!("Gist {} has no {} file", gist.id, GIST_FILE_NAME))
        })?;

        // large files come back truncated and must be read from raw_url
        let content = match (&file.content, file.truncated, &file.raw_url) {
            (Some(c), false, _) => c.clone(),
            (_, _, Some(raw)) => {
                let mut req = self.client.get(raw);
                if let Some(token) = &self.token {
                    req = req.header(AUTHORIZATION, format!("token {}", token));
                }
                req.send()?.error_for_status()?.text()?
            }
            _ => {
                return Err(AppError::Remote(format!(
                    "Gist {} file {} has no content",
                    gist.id, GIST_FILE_NAME
                )));
            }
        };

        parse_snapshot(&content)
    }

    fn create(&mut self, snapshot: &Snapshot) -> AppResult<String> {
        let body = json!({
            "description": GIST_DESCRIPTION,
            "public": false,
            "files": Self::files_body(snapshot)?,
        });
        let url = format!("{}/gists", self.base_url);
        let gist = self.request(self.client.post(&url).json(&body))?;
        Ok(gist.id)
    }

    fn update(&mut self, id: &str, snapshot: &Snapshot) -> AppResult<()> {
        let body = json!({ "files": Self::files_body(snapshot)? });
        let url = format!("{}/gists/{}", self.base_url, id);
        self.request(self.client.patch(&url).json(&body))?;
        Ok(())
    }
}
