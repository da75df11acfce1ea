use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use rearch::CapsuleHandle;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    api::{ErrorBody, ResolveResponse, ShortenRequest, ShortenResponse},
    config::{base_url_capsule, http_client_capsule},
};

pub fn shortener_api_capsule(
    CapsuleHandle { mut get, .. }: CapsuleHandle,
) -> Arc<dyn ShortenerApi> {
    let base_url = get.as_ref(base_url_capsule).clone();
    let client = get.as_ref(http_client_capsule).clone();
    Arc::new(HttpShortenerApi::new(client, base_url))
}

/// The two JSON endpoints of the shortening service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ShortenerApi: Send + Sync {
    async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResponse, ApiError>;
    async fn resolve(&self, code: &str) -> Result<ResolveResponse, ApiError>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered, but not with a success status.
    #[error("service rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// No usable answer: the request never completed or the success body was unreadable.
    #[error("request did not complete: {0}")]
    Transport(anyhow::Error), // NOTE: no #[from] so we have to be explicit
}

impl ApiError {
    /// The text a user sees for this failure. `fallback` stands in when the
    /// service did not explain itself.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Rejected { message: None, .. } => fallback.to_owned(),
            Self::Transport(_) => "Network error".to_owned(),
        }
    }
}

pub struct HttpShortenerApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpShortenerApi {
    /// `base_url` must be absolute and end in `/`; see [`crate::config::parse_base_url`].
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to build endpoint URL for {path}"))
            .map_err(ApiError::Transport)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ShortenerApi for HttpShortenerApi {
    #[instrument(skip(self))]
    async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint("shorten")?)
            .json(request)
            .send()
            .await
            .context("POST /shorten failed")
            .map_err(ApiError::Transport)?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn resolve(&self, code: &str) -> Result<ResolveResponse, ApiError> {
        let endpoint = self.endpoint(&format!("resolve/{}", urlencoding::encode(code)))?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .context("GET /resolve failed")
            .map_err(ApiError::Transport)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        debug!(%status, "Service accepted request");
        return response
            .json::<T>()
            .await
            .context("Failed to decode success body")
            .map_err(ApiError::Transport);
    }

    let body = response.json::<ErrorBody>().await.unwrap_or_else(|err| {
        warn!(%status, ?err, "Error body was not JSON; treating it as empty");
        ErrorBody::default()
    });
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: body.error.filter(|message| !message.is_empty()),
    })
}
