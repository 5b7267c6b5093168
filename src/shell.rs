use crate::api::NewStory;
use crate::app::App;
use crate::config::RuntimeConfig;
use crate::error::ApiError;
use crate::models::Story;
use crate::nav::NavItem;
use crate::open_url::{open_document, open_url};
use crate::render;
use crate::ui::{MenuChoice, Screen, prompt_field, prompt_index, prompt_password, show_text};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::Result;
use time::macros::format_description;
use tracing::error;
use url::Url;

enum Flow {
    Continue(Option<String>),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    All,
    Favorites,
    Mine,
}

/// Main loop: the navbar as a menu, until the user quits.
pub async fn run(cfg: &RuntimeConfig, app: &mut App) -> Result<()> {
    let mut status: Option<String> = None;
    loop {
        let items = app.nav_items();
        let mut labels: Vec<String> = items.iter().map(NavItem::label).collect();
        labels.push("Reload stories".to_string());
        labels.push("Open page in browser".to_string());
        labels.push("Quit".to_string());

        let screen = Screen {
            header: cfg.header.as_deref(),
            status: status.as_deref(),
        };
        let choice = prompt_index(&screen, "Hack or Snooze", &labels)?;

        let outcome = match choice {
            MenuChoice::Back | MenuChoice::Quit => break,
            MenuChoice::Index(i) if i < items.len() => follow(cfg, app, &items[i]).await,
            MenuChoice::Index(i) if i == items.len() => app
                .refresh_stories()
                .await
                .map(|_| Flow::Continue(Some(format!("{} stories loaded", app.story_list.len())))),
            MenuChoice::Index(i) if i == items.len() + 1 => open_page(cfg, app),
            MenuChoice::Index(_) => break,
        };
        match outcome {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue(message)) => status = message,
            Err(err) => {
                error!(error = %err, "action failed");
                status = Some(format!("Error: {err:#}"));
            }
        }
    }
    Ok(())
}

async fn follow(cfg: &RuntimeConfig, app: &mut App, item: &NavItem) -> Result<Flow> {
    match item {
        NavItem::AllStories => {
            app.nav_all_stories();
            story_view(cfg, app, View::All).await
        }
        NavItem::Favorites => {
            app.nav_favorites();
            story_view(cfg, app, View::Favorites).await
        }
        NavItem::MyStories => {
            app.nav_my_stories();
            story_view(cfg, app, View::Mine).await
        }
        NavItem::Submit => {
            app.nav_submit_form();
            submit_form(app).await
        }
        NavItem::Login => {
            app.nav_login();
            login_forms(cfg, app).await
        }
        NavItem::UserProfile(_) => {
            app.nav_user_profile();
            user_profile(cfg, app)
        }
        NavItem::Logout => {
            app.logout()?;
            Ok(Flow::Continue(Some("Logged out".to_string())))
        }
    }
}

fn stories_for(app: &App, view: View) -> Vec<Story> {
    match (view, app.current_user.as_ref()) {
        (View::All, _) => app.story_list.stories.clone(),
        (View::Favorites, Some(user)) => user.favorites.clone(),
        (View::Mine, Some(user)) => user.own_stories.clone(),
        (_, None) => Vec::new(),
    }
}

async fn story_view(cfg: &RuntimeConfig, app: &mut App, view: View) -> Result<Flow> {
    let mut status: Option<String> = None;
    loop {
        let stories = stories_for(app, view);
        let labels: Vec<String> = stories
            .iter()
            .map(|s| render::story_label(s, app.current_user.as_ref()))
            .collect();
        let prompt = match view {
            View::All if app.story_list.is_empty() => "No stories yet".to_string(),
            View::All => "All stories".to_string(),
            View::Favorites if stories.is_empty() => render::NO_FAVORITES.to_string(),
            View::Favorites => "Favorite stories".to_string(),
            View::Mine if stories.is_empty() => render::NO_OWN_STORIES.to_string(),
            View::Mine => "My stories".to_string(),
        };
        let screen = Screen {
            header: cfg.header.as_deref(),
            status: status.as_deref(),
        };

        let story = match prompt_index(&screen, &prompt, &labels)? {
            MenuChoice::Back => return Ok(Flow::Continue(None)),
            MenuChoice::Quit => return Ok(Flow::Quit),
            MenuChoice::Index(i) => match stories.get(i) {
                Some(s) => s.clone(),
                None => continue,
            },
        };

        status = match story_actions(cfg, app, view, &story).await {
            Ok(Flow::Quit) => return Ok(Flow::Quit),
            Ok(Flow::Continue(message)) => message,
            Err(err) => {
                error!(story_id = %story.story_id, error = %err, "story action failed");
                Some(format!("Error: {err:#}"))
            }
        };
    }
}

#[derive(Clone, Copy)]
enum StoryAction {
    Open,
    ToggleFavorite,
    Delete,
}

async fn story_actions(cfg: &RuntimeConfig, app: &mut App, view: View, story: &Story) -> Result<Flow> {
    let mut actions = vec![(StoryAction::Open, "Open link".to_string())];
    if let Some(user) = &app.current_user {
        let label = if user.is_favorite(story) { "Unfavorite" } else { "Favorite" };
        actions.push((StoryAction::ToggleFavorite, label.to_string()));
        if view == View::Mine && user.owns(story) {
            actions.push((StoryAction::Delete, "Delete".to_string()));
        }
    }
    let labels: Vec<String> = actions.iter().map(|(_, l)| l.clone()).collect();
    let title = sanitize_for_terminal(&story.title);
    let screen = Screen {
        header: cfg.header.as_deref(),
        status: None,
    };

    let action = match prompt_index(&screen, &title, &labels)? {
        MenuChoice::Back => return Ok(Flow::Continue(None)),
        MenuChoice::Quit => return Ok(Flow::Quit),
        MenuChoice::Index(i) => match actions.get(i) {
            Some((a, _)) => *a,
            None => return Ok(Flow::Continue(None)),
        },
    };

    let message = match action {
        StoryAction::Open => {
            open_url(&story.url, cfg.open_command.as_deref())?;
            format!("Opened {}", sanitize_for_terminal(&story.url))
        }
        StoryAction::ToggleFavorite => {
            if app.toggle_favorite(&story.story_id).await? {
                format!("Added \"{title}\" to favorites")
            } else {
                format!("Removed \"{title}\" from favorites")
            }
        }
        StoryAction::Delete => {
            app.delete_story(&story.story_id).await?;
            format!("Deleted \"{title}\"")
        }
    };
    Ok(Flow::Continue(Some(message)))
}

async fn submit_form(app: &mut App) -> Result<Flow> {
    let author = prompt_field("author")?;
    let title = prompt_field("title")?;
    let url = prompt_field("url")?;
    if let Err(err) = Url::parse(&url) {
        return Ok(Flow::Continue(Some(format!("Not a valid url ({err}): {}", sanitize_for_terminal(&url)))));
    }

    let story = app.submit_story(NewStory { title, author, url }).await?;
    Ok(Flow::Continue(Some(format!(
        "Submitted \"{}\"",
        sanitize_for_terminal(&story.title)
    ))))
}

async fn login_forms(cfg: &RuntimeConfig, app: &mut App) -> Result<Flow> {
    let labels = vec!["Log in".to_string(), "Create account".to_string()];
    let screen = Screen {
        header: cfg.header.as_deref(),
        status: None,
    };
    match prompt_index(&screen, "Login / signup", &labels)? {
        MenuChoice::Back => Ok(Flow::Continue(None)),
        MenuChoice::Quit => Ok(Flow::Quit),
        MenuChoice::Index(0) => {
            let username = prompt_field("username")?;
            let password = prompt_password("password")?;
            if app.login(&username, &password).await? {
                Ok(Flow::Continue(Some(format!("Welcome back, {}", sanitize_for_terminal(&username)))))
            } else {
                Ok(Flow::Continue(Some(
                    "Username and password do not match any on file".to_string(),
                )))
            }
        }
        MenuChoice::Index(_) => {
            let name = prompt_field("name")?;
            let username = prompt_field("username")?;
            let password = prompt_password("password")?;
            match app.signup(&username, &password, &name).await {
                Ok(()) => Ok(Flow::Continue(Some(format!(
                    "Account created for {}",
                    sanitize_for_terminal(&username)
                )))),
                Err(err) if err.downcast_ref::<ApiError>().is_some_and(ApiError::is_rejection) => {
                    Ok(Flow::Continue(Some(format!("Signup rejected: {err}"))))
                }
                Err(err) => Err(err),
            }
        }
    }
}

fn user_profile(cfg: &RuntimeConfig, app: &App) -> Result<Flow> {
    let Some(user) = &app.current_user else {
        return Ok(Flow::Continue(None));
    };
    let created = user
        .created_at
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| user.created_at.to_string());
    let lines = vec![
        "User Profile Info".to_string(),
        format!("  Name: {}", sanitize_for_terminal(&user.name)),
        format!("  Username: {}", sanitize_for_terminal(&user.username)),
        format!("  Account Created: {created}"),
        format!("  Stories: {}  Favorites: {}", user.own_stories.len(), user.favorites.len()),
    ];
    let screen = Screen {
        header: cfg.header.as_deref(),
        status: None,
    };
    show_text(&screen, &lines)?;
    Ok(Flow::Continue(None))
}

fn open_page(cfg: &RuntimeConfig, app: &App) -> Result<Flow> {
    let html = render::page_document(&app.page);
    let path = open_document(&html, cfg.open_command.as_deref())?;
    Ok(Flow::Continue(Some(format!("Page written to {}", path.display()))))
}
