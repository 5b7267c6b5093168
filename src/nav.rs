//! Navbar handling: every affordance hides the page, then shows one part.

use crate::app::App;
use crate::page::Section;
use crate::render;
use tracing::debug;

/// A navbar link the user can currently follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    AllStories,
    Submit,
    Favorites,
    MyStories,
    Login,
    UserProfile(String),
    Logout,
}

impl NavItem {
    pub fn label(&self) -> String {
        match self {
            NavItem::AllStories => "All stories".to_string(),
            NavItem::Submit => "Submit a story".to_string(),
            NavItem::Favorites => "Favorites".to_string(),
            NavItem::MyStories => "My stories".to_string(),
            NavItem::Login => "Login / signup".to_string(),
            NavItem::UserProfile(name) => format!("Profile ({name})"),
            NavItem::Logout => "Logout".to_string(),
        }
    }
}

impl App {
    /// Links shown by the navbar right now, in navbar order.
    pub fn nav_items(&self) -> Vec<NavItem> {
        let nav = &self.page.nav;
        let mut items = vec![NavItem::AllStories];
        if nav.links_visible {
            items.extend([NavItem::Submit, NavItem::Favorites, NavItem::MyStories]);
        }
        if nav.login_visible {
            items.push(NavItem::Login);
        }
        if let Some(label) = &nav.profile_label {
            items.push(NavItem::UserProfile(label.clone()));
        }
        if nav.logout_visible {
            items.push(NavItem::Logout);
        }
        items
    }

    pub fn nav_all_stories(&mut self) {
        debug!("nav_all_stories");
        self.page.hide_page_components();
        self.put_stories_on_page();
    }

    pub fn nav_submit_form(&mut self) {
        debug!("nav_submit_form");
        self.page.hide_page_components();
        self.page.show(Section::SubmitForm);
    }

    pub fn nav_login(&mut self) {
        debug!("nav_login");
        self.page.hide_page_components();
        self.page.show(Section::LoginForm);
        self.page.show(Section::SignupForm);
    }

    pub fn nav_favorites(&mut self) {
        debug!("nav_favorites");
        self.page.hide_page_components();
        match &self.current_user {
            Some(user) => {
                render::put_favorites_on_page(&mut self.page.favorites, user);
                self.page.show(Section::Favorites);
            }
            None => self.nav_login(),
        }
    }

    pub fn nav_my_stories(&mut self) {
        debug!("nav_my_stories");
        self.page.hide_page_components();
        match &self.current_user {
            Some(user) => {
                render::put_user_stories_on_page(&mut self.page.user_stories, user);
                self.page.show(Section::UserStories);
            }
            None => self.nav_login(),
        }
    }

    pub fn nav_user_profile(&mut self) {
        debug!("nav_user_profile");
        self.page.hide_page_components();
        match &self.current_user {
            Some(user) => {
                render::put_user_profile_on_page(&mut self.page.user_profile, user);
                self.page.show(Section::UserProfile);
            }
            None => self.nav_login(),
        }
    }

    pub fn update_nav_on_login(&mut self) {
        debug!("update_nav_on_login");
        let nav = &mut self.page.nav;
        nav.links_visible = true;
        nav.login_visible = false;
        nav.logout_visible = true;
        nav.profile_label = self.current_user.as_ref().map(|u| u.username.clone());
    }

    pub fn update_nav_on_logout(&mut self) {
        debug!("update_nav_on_logout");
        self.page.nav = Default::default();
    }
}
