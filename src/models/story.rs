use super::user::User;
use crate::api::{ApiClient, NewStory, StoryRecord};
use crate::error::{ApiError, Result};
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

/// A single submitted link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    pub created_at: OffsetDateTime,
}

impl From<StoryRecord> for Story {
    fn from(r: StoryRecord) -> Self {
        Self {
            story_id: r.story_id,
            title: r.title,
            author: r.author,
            url: r.url,
            username: r.username,
            created_at: r.created_at,
        }
    }
}

impl Story {
    /// Host of the story url, with the port when one is given explicitly.
    pub fn host_name(&self) -> Result<String> {
        let parsed = Url::parse(&self.url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ApiError::MissingHost(self.url.clone()))?;
        Ok(match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// Every story known to the client, newest submissions first.
#[derive(Debug, Clone, Default)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

impl StoryList {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    /// Fetches the public story list. No authentication needed.
    pub async fn get_stories(client: &ApiClient) -> Result<StoryList> {
        let records = client.get_stories().await?;
        debug!(count = records.len(), "fetched stories");
        Ok(StoryList::new(records.into_iter().map(Story::from).collect()))
    }

    /// Submits a story as `user` and puts it at the front of this list and of
    /// the user's own stories.
    pub async fn add_story(&mut self, client: &ApiClient, user: &mut User, new: &NewStory) -> Result<Story> {
        let record = client.create_story(&user.login_token, new).await?;
        let story = Story::from(record);
        self.stories.insert(0, story.clone());
        user.own_stories.insert(0, story.clone());
        Ok(story)
    }

    /// Deletes a story on the backend, then drops it from this list and from
    /// the user's own stories and favorites.
    pub async fn delete_story(&mut self, client: &ApiClient, user: &mut User, story_id: &str) -> Result<()> {
        client.delete_story(&user.login_token, story_id).await?;

        self.stories.retain(|s| s.story_id != story_id);
        user.own_stories.retain(|s| s.story_id != story_id);
        user.favorites.retain(|s| s.story_id != story_id);
        Ok(())
    }

    pub fn find(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == story_id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
