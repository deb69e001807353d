//! In-memory authentication state for the lifetime of one process.
//!
//! A read-through copy of the session store with an explicit lifecycle:
//! constructed empty with `loading = true`, populated by [`SessionContext::init`]
//! from disk, then mutated only by login/logout. Front ends read this
//! instead of poking the store directly.

use crate::auth::AuthApi;
use crate::error::ClientError;
use crate::types::UserProfile;

pub struct SessionContext {
    auth: AuthApi,
    user: Option<UserProfile>,
    loading: bool,
}

impl SessionContext {
    pub fn new(auth: AuthApi) -> Self {
        Self {
            auth,
            user: None,
            loading: true,
        }
    }

    /// Initial synchronous read from the session store.
    pub fn init(&mut self) {
        self.user = self.auth.current_user();
        self.loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let auth = self.auth.login(email, password).await?;
        self.user = Some(auth.record);
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        self.auth.register(email, password).await
    }

    /// Local-only teardown; no network round trip.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.auth.logout()?;
        self.user = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
