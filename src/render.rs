//! Markup for stories and the page sections that list them.
//!
//! Nothing here talks to the backend: every function takes the current
//! story/user state and produces HTML (or a terminal line for the shell).

use crate::models::{Story, StoryList, User};
use crate::page::{Container, NavChrome, Page, Section};
use crate::util::sanitize::sanitize_for_terminal;
use console::style;
use time::macros::format_description;
use tracing::warn;

pub const NO_OWN_STORIES: &str = "You need to submit a story to see them in this section";
pub const NO_FAVORITES: &str = "No Favorites Yet!";

/// One `<li>` for a story. The favorite control only appears for a logged-in
/// user; the delete control only when asked for (own-stories view).
pub fn story_markup(story: &Story, user: Option<&User>, show_delete: bool) -> String {
    let host = match story.host_name() {
        Ok(h) => h,
        Err(err) => {
            warn!(story_id = %story.story_id, error = %err, "story has no usable host");
            "unknown host".to_string()
        }
    };
    let fav = user.map(|u| favorite_button(story, u)).unwrap_or_default();
    let del = if show_delete { delete_button() } else { String::new() };

    format!(
        "<li id=\"{id}\">{fav}<a href=\"{url}\" target=\"a_blank\" class=\"story-link\">{title}</a>\
         <small class=\"story-hostname\">({host})</small>\
         <small class=\"story-author\">by {author}</small>\
         <small class=\"story-user\">posted by {username}</small>{del}</li>",
        id = escape_html(&story.story_id),
        url = escape_html(&story.url),
        title = escape_html(&story.title),
        host = escape_html(&host),
        author = escape_html(&story.author),
        username = escape_html(&story.username),
    )
}

/// Solid heart (`fas`) for a favorite, outline (`far`) otherwise.
pub fn favorite_button(story: &Story, user: &User) -> String {
    let variant = if user.is_favorite(story) { "fas" } else { "far" };
    format!("<span class=\"fav-btn\"><i class=\"{variant} fa-heart\"></i></span>")
}

pub fn delete_button() -> String {
    "<a class=\"delete-button\"><small>Delete</small></a>".to_string()
}

/// Clears the shared list and fills it with every story.
pub fn put_stories_on_page(container: &mut Container, list: &StoryList, user: Option<&User>) {
    container.empty();
    for story in &list.stories {
        container.append(story_markup(story, user, false));
    }
}

pub fn put_user_stories_on_page(container: &mut Container, user: &User) {
    container.empty();
    if user.own_stories.is_empty() {
        container.append(placeholder(NO_OWN_STORIES));
        return;
    }
    for story in &user.own_stories {
        container.append(story_markup(story, Some(user), true));
    }
}

pub fn put_favorites_on_page(container: &mut Container, user: &User) {
    container.empty();
    if user.favorites.is_empty() {
        container.append(placeholder(NO_FAVORITES));
        return;
    }
    for story in &user.favorites {
        container.append(story_markup(story, Some(user), false));
    }
}

pub fn put_user_profile_on_page(container: &mut Container, user: &User) {
    let created = user
        .created_at
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| user.created_at.to_string());
    container.empty();
    container.append(format!(
        "<h4>User Profile Info</h4>\
         <div id=\"profile-name\">Name: {}</div>\
         <div id=\"profile-username\">Username: {}</div>\
         <div id=\"profile-account-date\">Account Created: {}</div>",
        escape_html(&user.name),
        escape_html(&user.username),
        created
    ));
}

fn placeholder(message: &str) -> String {
    format!("<h4>{}</h4>", escape_html(message))
}

/// A single terminal line for a story.
pub fn story_label(story: &Story, user: Option<&User>) -> String {
    let title = sanitize_for_terminal(&story.title);
    let host = story
        .host_name()
        .map(|h| sanitize_for_terminal(&h))
        .unwrap_or_else(|_| "unknown host".to_string());
    let author = sanitize_for_terminal(&story.author);
    let marker = match user {
        Some(u) if u.is_favorite(story) => format!("{} ", style("♥").red()),
        Some(_) => "♡ ".to_string(),
        None => String::new(),
    };
    format!(
        "{marker}{title} {} {}",
        style(format!("({host})")).dim(),
        style(format!("by {author}")).dim()
    )
}

/// The whole page as a standalone document, hidden sections marked `hidden`.
pub fn page_document(page: &Page) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Hack or Snooze</title>\n\
         <link rel=\"stylesheet\" href=\"https://use.fontawesome.com/releases/v5.3.1/css/all.css\">\n\
         </head>\n<body>\n",
    );
    html.push_str(&nav_markup(&page.nav));
    html.push_str("<section class=\"stories-container container\">\n");
    if page.stories_loading {
        html.push_str("<div id=\"stories-loading-msg\">Loading&hellip;</div>\n");
    }
    for section in Section::ALL {
        let hidden = if page.is_visible(section) { "" } else { " hidden" };
        let id = section.element_id();
        match page.container(section) {
            Some(container) if section == Section::UserProfile => {
                html.push_str(&format!("<div id=\"{id}\"{hidden}>{}</div>\n", container.markup()));
            }
            Some(container) => {
                html.push_str(&format!(
                    "<ol id=\"{id}\" class=\"stories-list\"{hidden}>{}</ol>\n",
                    container.markup()
                ));
            }
            None => html.push_str(&form_markup(section, hidden)),
        }
    }
    html.push_str("</section>\n</body>\n</html>\n");
    html
}

fn nav_markup(nav: &NavChrome) -> String {
    let hide = |visible: bool| if visible { "" } else { " hidden" };
    let profile = nav.profile_label.as_deref().map(escape_html).unwrap_or_default();
    format!(
        "<nav id=\"nav-all-container\">\n\
         <a id=\"nav-all\" href=\"#\">Hack or Snooze</a>\n\
         <div class=\"nav-links\"{links}>\
         <a id=\"nav-submit\" href=\"#\">submit</a> | \
         <a id=\"nav-fav\" href=\"#\">favorites</a> | \
         <a id=\"my-stories\" href=\"#\">my stories</a></div>\n\
         <a id=\"nav-login\" href=\"#\"{login}>login/signup</a>\n\
         <a id=\"nav-user-profile\" href=\"#\"{prof}>{profile}</a>\n\
         <a id=\"nav-logout\" href=\"#\"{logout}><small>(logout)</small></a>\n\
         </nav>\n",
        links = hide(nav.links_visible),
        login = hide(nav.login_visible),
        prof = hide(nav.profile_label.is_some()),
        logout = hide(nav.logout_visible),
    )
}

fn form_markup(section: Section, hidden: &str) -> String {
    let id = section.element_id();
    let fields: &[(&str, &str, &str)] = match section {
        Section::LoginForm => &[
            ("login-username", "username", "text"),
            ("login-password", "password", "password"),
        ],
        Section::SignupForm => &[
            ("signup-name", "name", "text"),
            ("signup-username", "username", "text"),
            ("signup-password", "password", "password"),
        ],
        _ => &[
            ("author-creation", "author", "text"),
            ("title-creation", "title", "text"),
            ("url-creation", "url", "url"),
        ],
    };
    let mut html = format!("<form id=\"{id}\"{hidden}>");
    for (field_id, label, kind) in fields {
        html.push_str(&format!(
            "<div><label for=\"{field_id}\">{label}</label><input id=\"{field_id}\" type=\"{kind}\"></div>"
        ));
    }
    html.push_str("<button type=\"submit\">submit</button></form>\n");
    html
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
