use hub_core::{ChatStatus, ChatSummary, RequestError, SaveAck, SaveRequest, SearchQuery, SearchResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::settings::ApiSettings;
use hub_logging::{hub_debug, hub_warn};

/// Backend operations the capture side and the popup consume.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<String>, RequestError>;

    async fn list_chats(&self, collection: &str) -> Result<Vec<ChatSummary>, RequestError>;

    async fn save_chat(&self, request: &SaveRequest) -> Result<SaveAck, RequestError>;

    async fn ai_search(&self, query: &SearchQuery) -> Result<SearchResult, RequestError>;

    /// Looks up whether a conversation URL is already stored.
    async fn chat_status(&self, url: &str) -> Result<ChatStatus, RequestError>;
}

#[derive(Debug, Error)]
pub enum ApiSetupError {
    #[error("invalid backend base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiSetupError> {
        let base_url =
            Url::parse(&settings.base_url).map_err(|source| ApiSetupError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                source,
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|err| RequestError::network(format!("bad endpoint {path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RequestError> {
        hub_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        hub_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn list_collections(&self) -> Result<Vec<String>, RequestError> {
        let url = self.endpoint("api/collections")?;
        self.get_json(url).await
    }

    async fn list_chats(&self, collection: &str) -> Result<Vec<ChatSummary>, RequestError> {
        let mut url = self.endpoint("api/chats")?;
        url.query_pairs_mut().append_pair("collection", collection);
        self.get_json(url).await
    }

    async fn save_chat(&self, request: &SaveRequest) -> Result<SaveAck, RequestError> {
        let url = self.endpoint("api/save_chat")?;
        self.post_json(url, request).await
    }

    async fn ai_search(&self, query: &SearchQuery) -> Result<SearchResult, RequestError> {
        let url = self.endpoint("api/ai_search")?;
        self.post_json(url, query).await
    }

    async fn chat_status(&self, chat_url: &str) -> Result<ChatStatus, RequestError> {
        let mut url = self.endpoint("api/chat_status")?;
        url.query_pairs_mut().append_pair("url", chat_url);
        self.get_json(url).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestError> {
    let status = response.status();
    if !status.is_success() {
        hub_warn!("{} responded {}", response.url(), status);
        return Err(RequestError::status(status.as_u16()));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| RequestError::malformed(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_decode() {
        return RequestError::malformed(err.to_string());
    }
    RequestError::network(err.to_string())
}
