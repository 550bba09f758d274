//! Admission hook: who is this connection?
//!
//! Tetrad does not own accounts. A browser generates a token once, keeps
//! it in local storage, and presents it on every connect. The
//! [`Authenticator`] trait decides what that token means; swap it out to
//! validate signed tokens instead of trusting the raw string.

use tetrad_protocol::PlayerId;

use crate::SessionError;

/// Validates the token presented at connection time and returns the
/// player's identity.
///
/// # Example
///
/// ```rust
/// use tetrad_protocol::PlayerId;
/// use tetrad_session::{Authenticator, SessionError};
///
/// /// Only admits tokens with a known prefix.
/// struct PrefixAuthenticator;
///
/// impl Authenticator for PrefixAuthenticator {
///     async fn authenticate(&self, token: Option<&str>) -> Result<PlayerId, SessionError> {
///         match token {
///             Some(t) if t.starts_with("guest-") => Ok(PlayerId::new(t)),
///             _ => Err(SessionError::InvalidIdentity),
///         }
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Called once per connection, before any event is read.
    ///
    /// `token` is `None` when the client sent nothing at all.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidIdentity`] to refuse admission.
    fn authenticate(
        &self,
        token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<PlayerId, SessionError>> + Send;
}

/// Accepts any non-blank token verbatim as the player's identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenAuthenticator;

impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, token: Option<&str>) -> Result<PlayerId, SessionError> {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Ok(PlayerId::new(token)),
            _ => Err(SessionError::InvalidIdentity),
        }
    }
}
