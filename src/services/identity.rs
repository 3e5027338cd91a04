// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maps the messenger platform's user identifier to a stored user.

use crate::db::SqliteDb;
use crate::error::AppError;
use crate::models::User;

#[derive(Clone)]
pub struct IdentityResolver {
    db: SqliteDb,
}

impl IdentityResolver {
    pub fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// Find or create the user for `external_id`.
    ///
    /// Profile fields are only overwritten when supplied. Concurrent first
    /// requests for the same identifier resolve to the same user.
    pub async fn resolve(
        &self,
        external_id: &str,
        first_name: Option<String>,
        photo_url: Option<String>,
    ) -> Result<User, AppError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let first_name = first_name.filter(|n| !n.trim().is_empty());
        let photo_url = photo_url.filter(|p| !p.trim().is_empty());

        let user = self
            .db
            .resolve_user(external_id.to_string(), first_name, photo_url)
            .await?;
        tracing::debug!(user_id = user.id, "Resolved user");
        Ok(user)
    }
}
