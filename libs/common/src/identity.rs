//! Identity resolution for users and films
//!
//! Records carry two generations of identifiers: the database-native UUID and
//! a sequential integer assigned to older records by the legacy-id backfill.
//! Callers hand over an opaque string and get back an [`Identifier`] that knows
//! which column it must be looked up by.

use std::fmt;
use std::str::FromStr;

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::IdentityError;

/// Column holding the native identifier
pub const NATIVE_COLUMN: &str = "id";
/// Column holding the legacy sequential identifier
pub const LEGACY_COLUMN: &str = "legacy_id";

/// A resolved record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Database-native identifier
    Native(Uuid),
    /// Sequential integer identifier from the legacy scheme
    Legacy(i64),
}

impl Identifier {
    /// Resolve an opaque identifier.
    ///
    /// The native form is always tried first, so a value that parses as a UUID
    /// is never treated as a legacy integer even when it is all digits.
    pub fn resolve(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();

        if let Ok(id) = Uuid::parse_str(trimmed) {
            return Ok(Identifier::Native(id));
        }

        match trimmed.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Identifier::Legacy(id)),
            _ => Err(IdentityError(raw.to_string())),
        }
    }

    /// Column this identifier is matched against
    pub fn column(&self) -> &'static str {
        match self {
            Identifier::Native(_) => NATIVE_COLUMN,
            Identifier::Legacy(_) => LEGACY_COLUMN,
        }
    }

    /// Append `<column> = $n` with the identifier bound to the builder
    pub fn push_filter(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(self.column()).push(" = ");
        match *self {
            Identifier::Native(id) => builder.push_bind(id),
            Identifier::Legacy(id) => builder.push_bind(id),
        };
    }

    pub fn as_native(&self) -> Option<Uuid> {
        match self {
            Identifier::Native(id) => Some(*id),
            Identifier::Legacy(_) => None,
        }
    }

    pub fn as_legacy(&self) -> Option<i64> {
        match self {
            Identifier::Native(_) => None,
            Identifier::Legacy(id) => Some(*id),
        }
    }
}

impl FromStr for Identifier {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::resolve(s)
    }
}

/// Canonical string form: hyphenated lowercase UUID or decimal integer
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Native(id) => write!(f, "{}", id.hyphenated()),
            Identifier::Legacy(id) => write!(f, "{}", id),
        }
    }
}
