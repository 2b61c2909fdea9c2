//! Account Store: profile lookup, profile update and password change

use std::sync::Arc;

use chrono::Utc;
use common::Identifier;
use tracing::info;

use crate::{
    error::{StoreError, StoreResult},
    middleware::AuthUser,
    models::{
        ChangePasswordRequest, UpdateProfileRequest,
        user::{User, UserProfile},
    },
    password,
    repositories::UserRepository,
};

#[derive(Clone)]
pub struct AccountStore {
    users: Arc<dyn UserRepository>,
}

impl AccountStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    async fn find_user(&self, id: &Identifier) -> StoreResult<User> {
        self.users
            .find(id)
            .await?
            .ok_or(StoreError::NotFound("User"))
    }

    /// Profile of the session user, without the password
    pub async fn get_profile(&self, user: &AuthUser) -> StoreResult<UserProfile> {
        let id = Identifier::resolve(&user.id)?;
        let found = self.find_user(&id).await?;
        Ok(UserProfile::from(found))
    }

    /// Update the mutable profile fields.
    ///
    /// An empty full name leaves the stored one untouched; `updated_at` is
    /// stamped either way.
    pub async fn update_profile(
        &self,
        user: &AuthUser,
        request: &UpdateProfileRequest,
    ) -> StoreResult<()> {
        let id = Identifier::resolve(&user.id)?;
        let full_name = Some(request.full_name.trim()).filter(|name| !name.is_empty());

        let matched = self
            .users
            .update_profile(&id, full_name, Utc::now())
            .await?;
        if !matched {
            return Err(StoreError::NotFound("User"));
        }

        info!("Profile updated for user {}", id);
        Ok(())
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        user: &AuthUser,
        request: &ChangePasswordRequest,
    ) -> StoreResult<()> {
        let current = request.current_password.trim();
        let new = request.new_password.trim();
        if current.is_empty() || new.is_empty() {
            return Err(StoreError::InvalidInput("Password must not be empty"));
        }

        let id = Identifier::resolve(&user.id)?;
        let found = self.find_user(&id).await?;

        if !password::verify_password(&found.password, current) {
            return Err(StoreError::InvalidCredentials);
        }

        let hashed =
            password::hash_password(new).map_err(|e| StoreError::Internal(e.to_string()))?;
        let matched = self
            .users
            .update_password(found.id, &hashed, Utc::now())
            .await?;
        if !matched {
            return Err(StoreError::Internal(format!(
                "user {} vanished during password change",
                found.id
            )));
        }

        info!("Password changed for user {}", id);
        Ok(())
    }
}
