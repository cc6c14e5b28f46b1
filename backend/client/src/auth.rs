//! # Auth Session
//!
//! Identity is owned by an external provider. This side only keeps the signed
//! in user and its token.
//!
//! - Sign in or sign up: token persisted, user published
//! - Sign out: token cleared, `None` published
//! - Provider failure: nothing changes
//!
//! Subscribers get a `watch` receiver, so late subscribers still see the
//! current user straight away.
use std::{io, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

use crate::token::TokenStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub token: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Provider(String),

    #[error("Token storage failed: {0}")]
    Storage(#[from] io::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_in_with_oauth_popup(&self) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

pub struct AuthSession {
    provider: Arc<dyn IdentityProvider>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<Option<AuthUser>>,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn IdentityProvider>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(None);

        Self {
            provider,
            tokens,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.provider.sign_in(email, password).await?;

        self.establish(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.provider.sign_up(email, password).await?;

        self.establish(user)
    }

    pub async fn sign_in_with_oauth_popup(&self) -> Result<AuthUser, AuthError> {
        let user = self.provider.sign_in_with_oauth_popup().await?;

        self.establish(user)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.tokens.clear()?;

        if let Some(user) = self.state.send_replace(None) {
            info!("Signed out {}", user.email);
        }

        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.provider.send_password_reset(email).await
    }

    fn establish(&self, user: AuthUser) -> Result<AuthUser, AuthError> {
        self.tokens.save(&user.token)?;
        self.state.send_replace(Some(user.clone()));
        info!("Signed in {}", user.email);

        Ok(user)
    }
}
