mod client;
mod wire;

pub use client::{ApiClient, FavoriteAction};
pub use wire::{AuthResponse, NewStory, StoryRecord, UserRecord};
