//! Authentication endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::dto::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use super::{ApiClient, ApiError, ApiResult};
use crate::models::{AuthPayload, ProfilePayload, User, UserPatch};
use crate::session::ProfileSource;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthPayload> {
        self.submit(Method::POST, "/auth/login", request).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthPayload> {
        self.submit(Method::POST, "/auth/register", request).await
    }

    /// `GET /auth/profile`
    pub async fn profile(&self) -> ApiResult<User> {
        self.fetch(Method::GET, "/auth/profile").await
    }

    /// `PUT /auth/profile`
    pub async fn update_profile(&self, patch: &UserPatch) -> ApiResult<User> {
        let payload: ProfilePayload = self.submit(Method::PUT, "/auth/profile", patch).await?;
        Ok(payload.user)
    }

    /// `PUT /auth/change-password`
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> ApiResult<Option<String>> {
        self.command_with(Method::PUT, "/auth/change-password", request)
            .await
    }

    /// Log in and record the result in the session
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<User> {
        let payload = self
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.adopt(payload).await
    }

    /// Register and record the new account in the session
    pub async fn sign_up(&self, request: &RegisterRequest) -> ApiResult<User> {
        let payload = self.register(request).await?;
        self.adopt(payload).await
    }

    /// Save a profile change and merge it into the session
    pub async fn save_profile(&self, patch: &UserPatch) -> ApiResult<User> {
        let user = self.update_profile(patch).await?;
        self.session()
            .update_user(&UserPatch::from(user.clone()))
            .await;
        Ok(user)
    }

    async fn adopt(&self, payload: AuthPayload) -> ApiResult<User> {
        let user = payload.user;
        self.session()
            .login(user.clone(), &payload.tokens.token)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProfileSource for ApiClient {
    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.profile().await
    }
}
