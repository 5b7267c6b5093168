use crate::api::{ApiClient, NewStory};
use crate::models::{Story, StoryList, User};
use crate::page::{Page, Section};
use crate::render;
use crate::session::{SessionStore, StoredCredentials};
use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

/// Client state: the shared story list, the logged-in user and the page that
/// reflects them.
pub struct App {
    client: ApiClient,
    store: SessionStore,
    pub story_list: StoryList,
    pub current_user: Option<User>,
    pub page: Page,
}

impl App {
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Self {
            client,
            store,
            story_list: StoryList::default(),
            current_user: None,
            page: Page::new(),
        }
    }

    /// Restores a remembered user, loads the public stories, then switches
    /// the navbar to the logged-in state if a session came back.
    pub async fn start(&mut self) -> Result<()> {
        debug!("start");
        self.check_for_remembered_user().await;
        self.get_and_show_stories_on_start().await?;
        if self.current_user.is_some() {
            self.update_ui_on_user_login();
        }
        Ok(())
    }

    pub async fn check_for_remembered_user(&mut self) -> bool {
        debug!("check_for_remembered_user");
        let Some(creds) = self.store.load() else {
            return false;
        };
        self.current_user =
            User::login_via_stored_credentials(&self.client, &creds.token, &creds.username).await;
        self.current_user.is_some()
    }

    pub async fn get_and_show_stories_on_start(&mut self) -> Result<()> {
        self.story_list = StoryList::get_stories(&self.client)
            .await
            .context("failed to load stories")?;
        self.page.stories_loading = false;
        self.put_stories_on_page();
        Ok(())
    }

    /// Fetches the list again and shows it.
    pub async fn refresh_stories(&mut self) -> Result<()> {
        debug!("refresh_stories");
        let list = StoryList::get_stories(&self.client)
            .await
            .context("failed to load stories")?;
        self.story_list = list;
        self.page.hide_page_components();
        self.put_stories_on_page();
        Ok(())
    }

    pub(crate) fn put_stories_on_page(&mut self) {
        debug!("put_stories_on_page");
        render::put_stories_on_page(
            &mut self.page.all_stories,
            &self.story_list,
            self.current_user.as_ref(),
        );
        self.page.show(Section::AllStories);
    }

    pub fn update_ui_on_user_login(&mut self) {
        debug!("update_ui_on_user_login");
        self.page.hide_page_components();
        self.put_stories_on_page();
        self.update_nav_on_login();
    }

    /// Returns false when the backend rejects the credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        debug!("login");
        let Some(user) = User::login(&self.client, username, password).await else {
            return Ok(false);
        };
        self.begin_session(user);
        Ok(true)
    }

    pub async fn signup(&mut self, username: &str, password: &str, name: &str) -> Result<()> {
        debug!("signup");
        let user = User::signup(&self.client, username, password, name).await?;
        self.begin_session(user);
        Ok(())
    }

    fn begin_session(&mut self, user: User) {
        info!(username = %user.username, "logged in");
        let creds = StoredCredentials {
            token: user.login_token.clone(),
            username: user.username.clone(),
        };
        self.current_user = Some(user);
        self.update_ui_on_user_login();
        if let Err(err) = self.store.save(&creds) {
            warn!(error = %err, "failed to remember login");
        }
    }

    /// Forgets the session and shows the public list again.
    pub fn logout(&mut self) -> Result<()> {
        debug!("logout");
        self.current_user = None;
        self.update_nav_on_logout();
        self.page.hide_page_components();
        self.put_stories_on_page();
        self.store.clear().context("failed to forget login")?;
        Ok(())
    }

    /// Submits a story, puts it on top of the shared list and shows that list.
    pub async fn submit_story(&mut self, new: NewStory) -> Result<Story> {
        debug!("submit_story");
        let user = self.current_user.as_mut().ok_or_else(|| anyhow!("log in to submit a story"))?;
        let story = self.story_list.add_story(&self.client, user, &new).await?;

        let markup = render::story_markup(&story, self.current_user.as_ref(), false);
        self.page.all_stories.prepend(markup);
        self.page.hide(Section::SubmitForm);
        self.page.show(Section::AllStories);
        Ok(story)
    }

    pub async fn delete_story(&mut self, story_id: &str) -> Result<()> {
        debug!(story_id, "delete_story");
        let user = self.current_user.as_mut().ok_or_else(|| anyhow!("log in to delete a story"))?;
        self.story_list.delete_story(&self.client, user, story_id).await?;
        self.rerender_lists();
        Ok(())
    }

    /// Flips the favorite state of a story. Returns true if it is now a favorite.
    pub async fn toggle_favorite(&mut self, story_id: &str) -> Result<bool> {
        debug!(story_id, "toggle_favorite");
        let story = self
            .find_story(story_id)
            .cloned()
            .ok_or_else(|| anyhow!("no story with id {story_id}"))?;
        let user = self.current_user.as_mut().ok_or_else(|| anyhow!("log in to favorite a story"))?;

        let now_favorite = if user.is_favorite(&story) {
            user.remove_favorite(&self.client, &story).await?;
            false
        } else {
            user.add_to_favorites(&self.client, &story).await?;
            true
        };
        self.rerender_lists();
        Ok(now_favorite)
    }

    /// Looks a story up in the shared list, then in the user's own lists.
    pub fn find_story(&self, story_id: &str) -> Option<&Story> {
        self.story_list.find(story_id).or_else(|| {
            let user = self.current_user.as_ref()?;
            user.favorites
                .iter()
                .chain(user.own_stories.iter())
                .find(|s| s.story_id == story_id)
        })
    }

    /// Re-renders every list container, keeping section visibility.
    fn rerender_lists(&mut self) {
        let user = self.current_user.as_ref();
        render::put_stories_on_page(&mut self.page.all_stories, &self.story_list, user);
        match user {
            Some(user) => {
                render::put_favorites_on_page(&mut self.page.favorites, user);
                render::put_user_stories_on_page(&mut self.page.user_stories, user);
            }
            None => warn!("list re-render without a logged-in user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{story_json, user_json};
    use serde_json::json;
    use std::path::Path;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer, session: &Path) -> App {
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        App::new(client, SessionStore::new(Some(session.to_path_buf())))
    }

    async fn mount_stories(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [
                    story_json("s1", "bob", "https://one.example.com/a"),
                    story_json("s2", "carol", "https://two.example.com/b"),
                ]
            })))
            .mount(server)
            .await;
    }

    async fn mount_remembered_alice(server: &MockServer, favorites: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .and(query_param("token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": user_json("alice", favorites, vec![])
            })))
            .mount(server)
            .await;
    }

    fn remember_alice(session: &Path) {
        SessionStore::new(Some(session.to_path_buf()))
            .save(&StoredCredentials {
                token: "tok".into(),
                username: "alice".into(),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn anonymous_start_renders_stories_without_controls() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(&server, &dir.path().join("session.json"));

        app.start().await.unwrap();

        assert!(app.current_user.is_none());
        assert!(!app.page.stories_loading);
        assert_eq!(app.page.visible_sections(), vec![Section::AllStories]);
        let items = app.page.all_stories.items();
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("id=\"s1\""));
        assert!(items[1].contains("id=\"s2\""));
        assert!(items.iter().all(|m| !m.contains("fav-btn") && !m.contains("delete-button")));
        assert!(app.page.nav.login_visible);
        assert!(!app.page.nav.links_visible);
    }

    #[tokio::test]
    async fn start_restores_remembered_user() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        mount_remembered_alice(&server, vec![]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        remember_alice(&session);
        let mut app = app_for(&server, &session);

        app.start().await.unwrap();

        assert_eq!(app.current_user.as_ref().unwrap().username, "alice");
        assert!(app.page.nav.links_visible);
        assert!(!app.page.nav.login_visible);
        assert!(app.page.nav.logout_visible);
        assert_eq!(app.page.nav.profile_label.as_deref(), Some("alice"));
        assert!(app.page.all_stories.items().iter().all(|m| m.contains("far fa-heart")));
    }

    #[tokio::test]
    async fn stale_remembered_token_starts_anonymous() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        remember_alice(&session);
        let mut app = app_for(&server, &session);

        app.start().await.unwrap();
        assert!(app.current_user.is_none());
        assert!(app.page.nav.login_visible);
    }

    #[tokio::test]
    async fn login_saves_credentials_and_logout_clears_them() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"user": {"username": "alice", "password": "pw"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": user_json("alice", vec![], vec![]),
                "token": "tok"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        let mut app = app_for(&server, &session);
        app.start().await.unwrap();

        assert!(!app.login("alice", "wrong").await.unwrap());
        assert!(app.current_user.is_none());

        assert!(app.login("alice", "pw").await.unwrap());
        let store = SessionStore::new(Some(session.clone()));
        assert_eq!(store.load().unwrap().token, "tok");
        assert!(app.page.nav.logout_visible);

        app.logout().unwrap();
        assert!(app.current_user.is_none());
        assert!(store.load().is_none());
        assert!(app.page.nav.login_visible);
        assert!(app.page.all_stories.items().iter().all(|m| !m.contains("fav-btn")));
    }

    #[tokio::test]
    async fn submitted_story_tops_shared_list_and_own_stories() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        mount_remembered_alice(&server, vec![]).await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .and(body_json(json!({
                "token": "tok",
                "story": {"title": "T", "author": "A", "url": "https://example.com/x"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "story": {
                    "storyId": "new",
                    "title": "T",
                    "author": "A",
                    "url": "https://example.com/x",
                    "username": "alice",
                    "createdAt": "2024-05-01T12:00:00.000Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        remember_alice(&session);
        let mut app = app_for(&server, &session);
        app.start().await.unwrap();
        app.nav_submit_form();

        let new = NewStory {
            title: "T".into(),
            author: "A".into(),
            url: "https://example.com/x".into(),
        };
        app.submit_story(new).await.unwrap();

        assert_eq!(app.story_list.stories[0].story_id, "new");
        assert!(app.page.all_stories.items()[0].contains("id=\"new\""));
        assert_eq!(app.page.visible_sections(), vec![Section::AllStories]);

        app.nav_my_stories();
        assert_eq!(app.page.visible_sections(), vec![Section::UserStories]);
        let own = app.page.user_stories.items();
        assert!(own[0].contains("id=\"new\""));
        assert!(own[0].contains("delete-button"));
    }

    #[tokio::test]
    async fn submit_requires_login() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(&server, &dir.path().join("session.json"));
        let new = NewStory {
            title: "T".into(),
            author: "A".into(),
            url: "https://example.com/x".into(),
        };
        assert!(app.submit_story(new).await.is_err());
    }

    #[tokio::test]
    async fn unfavoriting_flips_control_from_solid_to_outline() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        mount_remembered_alice(&server, vec![story_json("s1", "bob", "https://one.example.com/a")]).await;
        Mock::given(method("DELETE"))
            .and(path("/users/alice/favorites/s1"))
            .and(body_json(json!({"token": "tok"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "removed"})))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        remember_alice(&session);
        let mut app = app_for(&server, &session);
        app.start().await.unwrap();
        assert!(app.page.all_stories.items()[0].contains("fas fa-heart"));

        let now_favorite = app.toggle_favorite("s1").await.unwrap();

        assert!(!now_favorite);
        assert!(app.page.all_stories.items()[0].contains("far fa-heart"));
        assert!(app.current_user.as_ref().unwrap().favorites.is_empty());
        app.nav_favorites();
        assert_eq!(app.page.favorites.items(), [format!("<h4>{}</h4>", render::NO_FAVORITES)]);
    }

    #[tokio::test]
    async fn deleting_own_story_keeps_other_users_stories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [
                    story_json("mine", "alice", "https://example.com/mine"),
                    story_json("s1", "bob", "https://one.example.com/a"),
                ]
            })))
            .mount(&server)
            .await;
        let mine = story_json("mine", "alice", "https://example.com/mine");
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": user_json("alice", vec![mine.clone()], vec![mine])
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/stories/mine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        remember_alice(&session);
        let mut app = app_for(&server, &session);
        app.start().await.unwrap();
        app.nav_my_stories();

        app.delete_story("mine").await.unwrap();

        let alice = app.current_user.as_ref().unwrap();
        assert!(alice.own_stories.is_empty());
        assert!(alice.favorites.is_empty());
        assert_eq!(app.story_list.len(), 1);
        assert!(app.find_story("s1").is_some());
        assert!(app.find_story("mine").is_none());
        assert!(app.page.is_visible(Section::UserStories));
        assert_eq!(
            app.page.user_stories.items(),
            [format!("<h4>{}</h4>", render::NO_OWN_STORIES)]
        );
    }

    #[tokio::test]
    async fn login_survives_unwritable_session_file() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": user_json("alice", vec![], vec![]),
                "token": "tok"
            })))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut app = app_for(&server, &blocker.join("session.json"));
        app.start().await.unwrap();

        assert!(app.login("alice", "pw").await.unwrap());
        assert_eq!(app.current_user.as_ref().unwrap().username, "alice");
        assert!(app.page.nav.logout_visible);
        assert_eq!(app.page.nav.profile_label.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn signup_saves_credentials_and_switches_navbar() {
        let server = MockServer::start().await;
        mount_stories(&server).await;
        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(body_json(json!({"user": {"username": "alice", "password": "pw", "name": "Alice"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "user": user_json("alice", vec![], vec![]),
                "token": "new-token"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("session.json");
        let mut app = app_for(&server, &session);
        app.start().await.unwrap();

        app.signup("alice", "pw", "Alice").await.unwrap();

        assert_eq!(app.current_user.as_ref().unwrap().login_token, "new-token");
        let saved = SessionStore::new(Some(session)).load().unwrap();
        assert_eq!(saved.token, "new-token");
        assert_eq!(saved.username, "alice");
        assert!(app.page.nav.links_visible);
        assert!(!app.page.nav.login_visible);
        assert!(app.page.nav.logout_visible);
        assert!(app.page.is_visible(Section::AllStories));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_list_visible() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [story_json("s1", "bob", "https://one.example.com/a")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(&server, &dir.path().join("session.json"));
        app.start().await.unwrap();

        assert!(app.refresh_stories().await.is_err());
        assert_eq!(app.story_list.len(), 1);
        assert!(app.page.is_visible(Section::AllStories));
        assert!(app.page.all_stories.items()[0].contains("id=\"s1\""));
    }
}
