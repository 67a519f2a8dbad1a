// Account endpoints: login, registration, and the caller's own profile.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::AuthToken;
use crate::client::LibraryClient;
use crate::error::Error;
use crate::types::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, UpdateProfileRequest,
    UserResponse,
};

impl LibraryClient {
    /// Exchange email + password for a bearer token.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(email, "logging in");
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.post(self.url(&["auth", "login"]), &body, None).await
    }

    /// Create an account. The server does not log the new user in.
    ///
    /// `POST /auth/register`
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        debug!(username, email, "registering account");
        let body = RegisterRequest {
            username,
            email,
            password: password.expose_secret(),
        };
        let _: serde_json::Value = self.post(self.url(&["auth", "register"]), &body, None).await?;
        Ok(())
    }

    /// Fetch the profile the token belongs to. Doubles as token validation.
    ///
    /// `GET /auth/profile`
    pub async fn get_profile(&self, token: &AuthToken) -> Result<UserResponse, Error> {
        let resp: ProfileResponse = self.get(self.url(&["auth", "profile"]), Some(token)).await?;
        Ok(resp.user)
    }

    /// Update username/email and optionally change the password.
    ///
    /// `PUT /auth/profile`
    pub async fn update_profile(
        &self,
        token: &AuthToken,
        body: &UpdateProfileRequest<'_>,
    ) -> Result<UserResponse, Error> {
        debug!(username = body.username, "updating profile");
        let resp: ProfileResponse = self
            .put(self.url(&["auth", "profile"]), body, Some(token))
            .await?;
        Ok(resp.user)
    }
}
