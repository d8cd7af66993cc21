//! Row to entity mappers
//!
//! Ids are stored as `CHAR(26)` text, so every conversion re-parses them and
//! a corrupt row surfaces as a database error instead of a panic.

mod post;
mod reaction;

use chat_core::{DomainError, Id};

fn column_id(column: &'static str, raw: &str) -> Result<Id, DomainError> {
    Id::parse(raw.trim_end())
        .map_err(|e| DomainError::DatabaseError(format!("corrupt {column} {raw:?}: {e}")))
}
