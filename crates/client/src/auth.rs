use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use thiserror::Error;

/// Errors from the authentication collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no active session")]
    SignedOut,
    #[error("token retrieval failed: {0}")]
    Token(String),
}

pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AuthError>> + Send + 'a>>;

/// Source of short-lived bearer tokens.
///
/// The session/token issuance provider is an external collaborator;
/// implementations adapt it. The gateway fetches a fresh token before every
/// outbound request.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> TokenFuture<'_>;
}

/// Token provider holding a fixed token, gated on the session flag.
///
/// Used by the sync binary (long-lived development token) and the test
/// suites.
pub struct StaticTokenProvider {
    token: String,
    session: Session,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>, session: Session) -> Self {
        Self {
            token: token.into(),
            session,
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> TokenFuture<'_> {
        Box::pin(async move {
            if !self.session.is_signed_in() {
                return Err(AuthError::SignedOut);
            }
            Ok(self.token.clone())
        })
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    signed_in: AtomicBool,
    epoch: AtomicU64,
}

/// Cheap cloneable handle to the sign-in state of the current session.
///
/// The epoch increases on every sign-in. Stores key their fetched-once
/// guards on it and use it for advisory cancellation: a fetch started under
/// an older epoch discards its result instead of updating state.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.signed_in.load(Ordering::Acquire)
    }

    /// Current session identity. Zero until the first sign-in.
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    pub fn sign_in(&self) {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        self.inner.signed_in.store(true, Ordering::Release);
    }

    pub fn sign_out(&self) {
        self.inner.signed_in.store(false, Ordering::Release);
    }
}
