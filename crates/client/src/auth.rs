//! Account operations against the users collection.

use serde_json::json;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::types::{AuthResponse, UserProfile};

const AUTH_PATH: &str = "/api/collections/musers/auth-with-password";
const REGISTER_PATH: &str = "/api/collections/musers/records";

#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Authenticate and persist the resulting session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "identity": email, "password": password });
        let data = self.api.post(AUTH_PATH, &body).await.map_err(|e| match e {
            ClientError::Api { status, message: None } => ClientError::Api {
                status,
                message: Some("login failed".into()),
            },
            other => other,
        })?;

        let auth: AuthResponse = serde_json::from_value(data)?;
        self.api.store().set_token(&auth.token)?;
        self.api.store().set_user(&auth.record)?;
        Ok(auth)
    }

    /// Create an account. Does not establish a session; callers log in
    /// afterwards.
    pub async fn register(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let body = json!({
            "email": email,
            "password": password,
            "passwordConfirm": password,
        });
        let data = self.api.post(REGISTER_PATH, &body).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Local-only: drop the stored session. No network call.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.api.store().clear()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.api.store().user()
    }

    pub fn token(&self) -> Option<String> {
        self.api.store().token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
