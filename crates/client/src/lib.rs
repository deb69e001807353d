//! Client library for the remiaq reminder service.
//!
//! The pieces stack bottom-up: [`store::SessionStore`] persists the auth
//! token and cached profile, [`http::ApiClient`] turns logical calls into
//! authenticated JSON requests (and handles session expiry process-wide),
//! and [`auth::AuthApi`] / [`reminders::RemindersApi`] expose one typed
//! operation per server-side action. [`session::SessionContext`] holds the
//! in-memory authentication state a front end reads.

pub mod auth;
pub mod error;
pub mod filter;
pub mod http;
pub mod recurrence;
pub mod reminders;
pub mod session;
pub mod store;
pub mod types;

pub use error::ClientError;
pub use http::{ApiClient, AuthExpiredHook};
pub use session::SessionContext;
pub use store::SessionStore;
