use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{error::AuthError, types::CredentialPair};

/// Single-slot, in-memory holder of the current [`CredentialPair`].
///
/// The pair lives behind an `Arc` that is swapped whole, so a reader always
/// sees one complete write. Locks are never held across an `.await`.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Arc<CredentialPair>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pair as of the last completed write.
    pub fn snapshot(&self) -> Arc<CredentialPair> {
        Arc::clone(&self.read())
    }

    /// Replaces the whole pair. Used by the authorization code exchange.
    pub fn replace(&self, pair: CredentialPair) {
        *self.write() = Arc::new(pair);
    }

    /// Installs a refreshed access token, keeping the refresh token held.
    ///
    /// `refreshed_with` is the refresh token the new access token was issued
    /// for. The write only happens while that token is still the one held, so
    /// a login that completed in the meantime is never paired with a stale
    /// access token.
    ///
    /// # Errors
    ///
    /// - `NoRefreshToken` when the store holds no refresh token.
    /// - `RefreshFailed` when another login replaced the pair since the
    ///   refresh started; the store is left as that login wrote it.
    pub fn update_access_token(
        &self,
        refreshed_with: &str,
        access_token: String,
        scope: Option<String>,
        expires_in: u64,
    ) -> Result<(), AuthError> {
        let mut slot = self.write();
        if slot.refresh_token.is_empty() {
            return Err(AuthError::NoRefreshToken);
        }
        if slot.refresh_token != refreshed_with {
            return Err(AuthError::RefreshFailed {
                status: None,
                payload: "superseded by a newer login".to_string(),
            });
        }

        let scope = scope
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slot.scope.clone());
        let next = CredentialPair::new(access_token, slot.refresh_token.clone(), scope, expires_in);
        *slot = Arc::new(next);
        Ok(())
    }

    /// The authenticated request gate: the current access token, or
    /// `NotAuthenticated` when none is held. Presence check only.
    pub fn require_access_token(&self) -> Result<String, AuthError> {
        let pair = self.read();
        if pair.access_token.is_empty() {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(pair.access_token.clone())
    }

    pub fn refresh_token(&self) -> Result<String, AuthError> {
        let pair = self.read();
        if pair.refresh_token.is_empty() {
            return Err(AuthError::NoRefreshToken);
        }
        Ok(pair.refresh_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        !self.read().access_token.is_empty()
    }

    // A poisoned lock still holds a whole pair: writers only assign a new Arc.
    fn read(&self) -> RwLockReadGuard<'_, Arc<CredentialPair>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<CredentialPair>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}
