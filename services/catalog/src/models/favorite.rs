//! Favorite relationship model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::film::Film;

/// A user's favorite film
///
/// Both ids are the canonical string form of a resolved identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub user_id: String,
    pub film_id: String,
    pub added_at: DateTime<Utc>,
}

/// What a toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Response for a toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub status: ToggleOutcome,
    pub message: &'static str,
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(status: ToggleOutcome) -> Self {
        let message = match status {
            ToggleOutcome::Added => "Film added to favorites",
            ToggleOutcome::Removed => "Film removed from favorites",
        };
        Self { status, message }
    }
}

/// Response for a favorite check
#[derive(Debug, Serialize)]
pub struct FavoriteCheck {
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

/// One page of a user's favorite films
#[derive(Debug, Serialize)]
pub struct FavoritePage {
    pub films: Vec<Film>,
    pub total: usize,
    pub total_pages: usize,
    pub current_page: usize,
}
