use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

use crate::error::{Error, Result};

/// A subfolder entry in a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// A file entry in a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedrFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub file_id: Option<u64>,
    /// Id used by the file endpoint.
    #[serde(default)]
    pub folder_file_id: Option<u64>,
    #[serde(default)]
    pub play_video: bool,
    /// Direct playback link, when the listing already carries one.
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// Contents of one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderContents {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<SeedrFile>,
}

/// Bearer-token client for the Seedr REST API.
#[derive(Clone)]
pub struct SeedrClient {
    client: reqwest::Client,
    api_base: String,
    token: Secret<String>,
}

impl SeedrClient {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>, token: Secret<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_base,
            token,
        }
    }

    /// Build a client from config, failing when no token is configured.
    pub fn from_config(
        client: reqwest::Client,
        config: &seedstream_config::SeedrConfig,
    ) -> Result<Self> {
        let token = config.token().cloned().ok_or(Error::MissingToken)?;
        Ok(Self::new(client, config.api_base.clone(), token))
    }

    /// List the root folder (`None`) or a subfolder.
    pub async fn list_folder(&self, folder_id: Option<u64>) -> Result<FolderContents> {
        let url = match folder_id {
            Some(id) => format!("{}/folder/{id}", self.api_base),
            None => format!("{}/folder", self.api_base),
        };
        debug!(url = %url, "listing seedr folder");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "seedr folder listing failed");
            return Err(Error::Status { status, body });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Playback URL for `file`: its own `stream_url`, else the token-authenticated
    /// file endpoint. `None` when the listing gave no usable id.
    pub fn stream_url(&self, file: &SeedrFile) -> Option<String> {
        if let Some(url) = file.stream_url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }

        let id = file.folder_file_id.or(file.id).or(file.file_id)?;
        let mut url = match url::Url::parse(&format!("{}/file/{id}", self.api_base)) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, api_base = %self.api_base, "cannot build file url");
                return None;
            },
        };
        url.query_pairs_mut()
            .append_pair("token", self.token.expose_secret());
        Some(url.into())
    }
}

impl std::fmt::Debug for SeedrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedrClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
