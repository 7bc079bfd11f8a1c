use reqwest::Method;
use tracing::info;

use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Auth ====================

    /// Create an account; a returned token is stored in the session
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthPayload> {
        let payload: AuthPayload = self
            .send_json(Method::POST, "auth/signup", request)
            .await?;
        self.store_token(&payload)?;
        Ok(payload)
    }

    /// Log in; a returned token is stored in the session
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload> {
        let payload: AuthPayload = self
            .send_json(Method::POST, "auth/login", request)
            .await?;
        self.store_token(&payload)?;
        Ok(payload)
    }

    /// Profile of the logged-in user
    pub async fn me(&self) -> Result<User> {
        self.get("auth/me", &[]).await
    }

    pub async fn update_me(&self, request: &UpdateProfile) -> Result<User> {
        self.send_json(Method::PUT, "auth/me", request).await
    }

    /// Forget the stored token; the server is not contacted
    pub fn logout(&self) -> Result<()> {
        self.session().sign_out()?;
        info!("Logged out");
        Ok(())
    }

    fn store_token(&self, payload: &AuthPayload) -> Result<()> {
        if let Some(token) = payload.token.as_deref().filter(|t| !t.is_empty()) {
            self.session().sign_in(token)?;
            info!("Signed in");
        }
        Ok(())
    }
}
