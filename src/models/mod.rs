mod story;
mod user;

pub use story::{Story, StoryList};
pub use user::User;
