//! Film model

use common::Identifier;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Film record, read-only from this service's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_year: Option<i32>,
}

impl Film {
    /// Every identifier this film can be referenced by
    pub fn identifiers(&self) -> impl Iterator<Item = Identifier> {
        std::iter::once(Identifier::Native(self.id)).chain(self.legacy_id.map(Identifier::Legacy))
    }
}
