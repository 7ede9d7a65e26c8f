//! User service
//!
//! Seeds and looks up identity records. Authentication lives elsewhere.

use tracing::{info, instrument};
use validator::Validate;

use spaces_core::entities::User;
use spaces_core::{DomainError, Snowflake};

use crate::dto::CreateUserRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a user; a taken username is a conflict
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<User> {
        request.validate()?;

        let user = User::new(
            self.ctx.generate_id(),
            request.username,
            request.display_name.unwrap_or_default(),
            self.ctx.now(),
        );

        let mut uow = self.ctx.begin().await?;
        uow.insert_user(&user).await?;
        uow.commit().await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Get user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        let mut uow = self.ctx.begin().await?;
        let user = uow
            .find_user(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(user)
    }
}
