use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A story as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A user as the backend returns it. `stories` are the ones the user submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub favorites: Vec<StoryRecord>,
    #[serde(default)]
    pub stories: Vec<StoryRecord>,
}

/// Fields a user fills in to submit a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserRecord,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StoriesResponse {
    pub stories: Vec<StoryRecord>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StoryResponse {
    pub story: StoryRecord,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserResponse {
    pub user: UserRecord,
}

#[derive(Debug, Serialize)]
pub(super) struct TokenBody<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateStoryBody<'a> {
    pub token: &'a str,
    pub story: &'a NewStory,
}

#[derive(Debug, Serialize)]
pub(super) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthBody<'a> {
    pub user: Credentials<'a>,
}
