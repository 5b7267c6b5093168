use std::collections::BTreeSet;

/// The independently shown parts of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    AllStories,
    LoginForm,
    SignupForm,
    SubmitForm,
    Favorites,
    UserStories,
    UserProfile,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::AllStories,
        Section::LoginForm,
        Section::SignupForm,
        Section::SubmitForm,
        Section::Favorites,
        Section::UserStories,
        Section::UserProfile,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Section::AllStories => "all-stories-list",
            Section::LoginForm => "login-form",
            Section::SignupForm => "signup-form",
            Section::SubmitForm => "submission-form",
            Section::Favorites => "favorite-stories",
            Section::UserStories => "user-stories",
            Section::UserProfile => "user-profile",
        }
    }
}

/// Child markup of one list section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    items: Vec<String>,
}

impl Container {
    pub fn empty(&mut self) {
        self.items.clear();
    }

    pub fn append(&mut self, markup: String) {
        self.items.push(markup);
    }

    pub fn prepend(&mut self, markup: String) {
        self.items.insert(0, markup);
    }

    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn markup(&self) -> String {
        self.items.concat()
    }
}

/// Navbar state. Logged out: only the login link shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavChrome {
    pub links_visible: bool,
    pub login_visible: bool,
    pub logout_visible: bool,
    pub profile_label: Option<String>,
}

impl Default for NavChrome {
    fn default() -> Self {
        Self {
            links_visible: false,
            login_visible: true,
            logout_visible: false,
            profile_label: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    visible: BTreeSet<Section>,
    pub stories_loading: bool,
    pub all_stories: Container,
    pub favorites: Container,
    pub user_stories: Container,
    pub user_profile: Container,
    pub nav: NavChrome,
}

impl Page {
    pub fn new() -> Self {
        Self {
            stories_loading: true,
            ..Self::default()
        }
    }

    /// Hides every section so a caller can show just what it wants.
    pub fn hide_page_components(&mut self) {
        self.visible.clear();
    }

    pub fn show(&mut self, section: Section) {
        self.visible.insert(section);
    }

    pub fn hide(&mut self, section: Section) {
        self.visible.remove(&section);
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible.contains(&section)
    }

    #[cfg(test)]
    pub fn visible_sections(&self) -> Vec<Section> {
        self.visible.iter().copied().collect()
    }

    pub fn container(&self, section: Section) -> Option<&Container> {
        match section {
            Section::AllStories => Some(&self.all_stories),
            Section::Favorites => Some(&self.favorites),
            Section::UserStories => Some(&self.user_stories),
            Section::UserProfile => Some(&self.user_profile),
            Section::LoginForm | Section::SignupForm | Section::SubmitForm => None,
        }
    }
}
