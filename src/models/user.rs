use super::story::Story;
use crate::api::{ApiClient, AuthResponse, FavoriteAction, UserRecord};
use crate::error::Result;
use time::OffsetDateTime;
use tracing::{debug, error};

/// The logged-in user, with the token every authenticated call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub favorites: Vec<Story>,
    pub own_stories: Vec<Story>,
    pub login_token: String,
}

impl User {
    pub fn from_record(record: UserRecord, token: String) -> Self {
        Self {
            username: record.username,
            name: record.name,
            created_at: record.created_at,
            favorites: record.favorites.into_iter().map(Story::from).collect(),
            own_stories: record.stories.into_iter().map(Story::from).collect(),
            login_token: token,
        }
    }

    fn from_auth(resp: AuthResponse) -> Self {
        Self::from_record(resp.user, resp.token)
    }

    /// Registers a new account. Failures propagate.
    pub async fn signup(client: &ApiClient, username: &str, password: &str, name: &str) -> Result<User> {
        let resp = client.signup(username, password, name).await?;
        Ok(Self::from_auth(resp))
    }

    /// Logs in with a username and password. Any failure is logged and yields `None`.
    pub async fn login(client: &ApiClient, username: &str, password: &str) -> Option<User> {
        match client.login(username, password).await {
            Ok(resp) => Some(Self::from_auth(resp)),
            Err(err) => {
                error!(username, error = %err, "username and password do not match any on file");
                None
            }
        }
    }

    /// Rebuilds a session from a remembered token. Any failure is logged and yields `None`.
    pub async fn login_via_stored_credentials(client: &ApiClient, token: &str, username: &str) -> Option<User> {
        match client.get_user(token, username).await {
            Ok(record) => Some(Self::from_record(record, token.to_string())),
            Err(err) => {
                error!(username, error = %err, "login via stored credentials failed");
                None
            }
        }
    }

    /// Marks a story as favorite locally, then on the backend.
    /// The local change is kept even if the backend call fails.
    pub async fn add_to_favorites(&mut self, client: &ApiClient, story: &Story) -> Result<()> {
        if !self.is_favorite(story) {
            self.favorites.push(story.clone());
        }
        self.toggle_favorite(client, FavoriteAction::Add, story).await
    }

    /// Unmarks a story locally, then on the backend.
    pub async fn remove_favorite(&mut self, client: &ApiClient, story: &Story) -> Result<()> {
        self.favorites.retain(|s| s.story_id != story.story_id);
        self.toggle_favorite(client, FavoriteAction::Remove, story).await
    }

    pub async fn toggle_favorite(&self, client: &ApiClient, action: FavoriteAction, story: &Story) -> Result<()> {
        debug!(?action, story_id = %story.story_id, "toggle favorite");
        client
            .favorite(action, &self.login_token, &self.username, &story.story_id)
            .await
    }

    pub fn is_favorite(&self, story: &Story) -> bool {
        self.favorites.iter().any(|s| s.story_id == story.story_id)
    }

    pub fn owns(&self, story: &Story) -> bool {
        self.own_stories.iter().any(|s| s.story_id == story.story_id)
    }
}
