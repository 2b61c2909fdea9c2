//! Models for stored records and request/response payloads

use serde::{Deserialize, Deserializer};

pub mod favorite;
pub mod film;
pub mod user;

/// Request for a profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, rename = "fullName")]
    pub full_name: String,
}

/// Request for a password change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Query parameters of paginated listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based). Missing or unparseable values mean page 1.
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

fn lenient_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|page| page.trim().parse().ok())
        .unwrap_or_else(first_page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};

    fn page_of(uri: &str) -> u32 {
        let uri: Uri = uri.parse().unwrap();
        Query::<PageQuery>::try_from_uri(&uri).unwrap().0.page
    }

    #[test]
    fn test_page_query_falls_back_to_first_page() {
        assert_eq!(page_of("/films/favorites?page=3"), 3);
        assert_eq!(page_of("/films/favorites"), 1);
        assert_eq!(page_of("/films/favorites?page=abc"), 1);
        assert_eq!(page_of("/films/favorites?page=-2"), 1);
    }
}
