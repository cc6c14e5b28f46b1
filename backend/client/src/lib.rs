//! # Client
//!
//! Typed access to the booking API for frontends and tools.
//!
//! ## Requests
//! - 60 s timeout, the API may be waking up from a cold start
//! - Bearer token from a [`TokenStore`] on every request when present
//! - Network failures and 5xx retried up to 3 times, backoff 2 s doubling to 15 s
//! - 4xx never retried
//!
//! ## Errors
//! | Response | Error |
//! |---|---|
//! | 400 | `Validation` with the server message |
//! | 401 | `Unauthorized`, logged |
//! | 404 | `NotFound`, except profiles where it means `None` |
//! | 5xx after retries | `Server` |
//! | anything else | `Status` |
//!
//! ## Usage
//! ```no_run
//! # async fn run() -> Result<(), client::ClientError> {
//! let api = client::ApiClient::new(client::ClientConfig::from_env())?;
//!
//! for college in api.colleges().await? {
//!     println!("{} ({})", college.name, college.rating);
//! }
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod token;

pub use api::{ApiClient, Health};
pub use auth::{AuthError, AuthSession, AuthUser, IdentityProvider};
pub use config::{ClientConfig, RetryPolicy};
pub use error::ClientError;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
