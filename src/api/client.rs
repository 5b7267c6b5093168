use super::wire::{
    AuthBody, AuthResponse, CreateStoryBody, Credentials, NewStory, StoriesResponse, StoryRecord,
    StoryResponse, TokenBody, UserRecord, UserResponse,
};
use crate::error::{ApiError, Result};
use futures_util::StreamExt;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

// 5 MB cap
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

impl FavoriteAction {
    fn method(self) -> Method {
        match self {
            FavoriteAction::Add => Method::POST,
            FavoriteAction::Remove => Method::DELETE,
        }
    }
}

/// HTTP client bound to one stories backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("snooze-cli/0.1")
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url).map_err(ApiError::InvalidBaseUrl)?,
        })
    }

    pub async fn get_stories(&self) -> Result<Vec<StoryRecord>> {
        let req = self.client.get(self.endpoint(&["stories"]));
        let body: StoriesResponse = self.send(req).await?;
        Ok(body.stories)
    }

    pub async fn create_story(&self, token: &str, story: &NewStory) -> Result<StoryRecord> {
        let req = self
            .client
            .post(self.endpoint(&["stories"]))
            .json(&CreateStoryBody { token, story });
        let body: StoryResponse = self.send(req).await?;
        Ok(body.story)
    }

    pub async fn delete_story(&self, token: &str, story_id: &str) -> Result<()> {
        let req = self
            .client
            .delete(self.endpoint(&["stories", story_id]))
            .json(&TokenBody { token });
        self.send_ack(req).await
    }

    pub async fn signup(&self, username: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let body = AuthBody {
            user: Credentials { username, password, name: Some(name) },
        };
        let req = self.client.post(self.endpoint(&["signup"])).json(&body);
        self.send(req).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let body = AuthBody {
            user: Credentials { username, password, name: None },
        };
        let req = self.client.post(self.endpoint(&["login"])).json(&body);
        self.send(req).await
    }

    pub async fn get_user(&self, token: &str, username: &str) -> Result<UserRecord> {
        let req = self
            .client
            .get(self.endpoint(&["users", username]))
            .query(&[("token", token)]);
        let body: UserResponse = self.send(req).await?;
        Ok(body.user)
    }

    pub async fn favorite(
        &self,
        action: FavoriteAction,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> Result<()> {
        let req = self
            .client
            .request(action.method(), self.endpoint(&["users", username, "favorites", story_id]))
            .json(&TokenBody { token });
        self.send_ack(req).await
    }

    /// Base url with path segments appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let bytes = self.execute(req).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_ack(&self, req: RequestBuilder) -> Result<()> {
        self.execute(req).await.map(|_| ())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Vec<u8>> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!(url = %resp.url(), %status, "backend response");

        // Stream with a max size limit
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(ApiError::BodyTooLarge(MAX_BODY_BYTES));
            }
            buf.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let body = String::from_utf8_lossy(&buf).chars().take(500).collect();
            return Err(ApiError::Status { status, body });
        }
        Ok(buf)
    }
}
