//! OAuth2 client-credentials token cache.
//!
//! Tokens are cached until shortly before the provider's stated expiry.
//! Refreshes are serialised behind an async mutex: callers that arrive while
//! a refresh is in flight wait for it and then reuse its result, so a burst
//! of requests past expiry produces one token request, not one per caller.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::AuthError;

use super::types::TokenResponse;

/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://outpost.mappls.com/api/security/oauth/token";

/// Tokens are treated as expired this long before the provider says they are.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A freshly issued token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: Duration,
}

/// Something that can exchange credentials for a bearer token.
pub trait TokenSource {
    fn fetch_token(&self) -> impl Future<Output = Result<TokenGrant, AuthError>> + Send;
}

/// A cached bearer token.
#[derive(Debug, Clone)]
struct Credential {
    token: String,
    expires_at: Instant,
}

impl Credential {
    fn from_grant(grant: TokenGrant, issued_at: Instant, margin: Duration) -> Self {
        Self {
            token: grant.access_token,
            expires_at: issued_at + grant.expires_in.saturating_sub(margin),
        }
    }

    fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Single-flight cache in front of a [`TokenSource`].
pub struct CredentialCache<S> {
    source: S,
    current: Mutex<Option<Credential>>,
    margin: Duration,
}

impl<S: TokenSource> CredentialCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_margin(source, EXPIRY_MARGIN)
    }

    pub fn with_margin(source: S, margin: Duration) -> Self {
        Self {
            source,
            current: Mutex::new(None),
            margin,
        }
    }

    /// Return a valid bearer token, fetching a new one if needed.
    ///
    /// On failure any previously cached credential is left as it was; an
    /// expired token is never returned.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut current = self.current.lock().await;

        if let Some(credential) = current.as_ref()
            && credential.is_valid_at(Instant::now())
        {
            return Ok(credential.token.clone());
        }

        debug!("requesting new Mappls access token");
        let grant = self.source.fetch_token().await.inspect_err(|e| {
            warn!(error = %e, "Mappls token refresh failed");
        })?;

        let credential = Credential::from_grant(grant, Instant::now(), self.margin);
        let token = credential.token.clone();
        *current = Some(credential);

        Ok(token)
    }

    /// Drop `token` if it is still the cached one, so the next call fetches
    /// a new one. A token already replaced by a newer refresh is left alone.
    pub async fn invalidate(&self, token: &str) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|c| c.token == token) {
            *current = None;
        }
    }
}

/// Client-credentials exchange against the Mappls token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthTokenSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl OAuthTokenSource {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl TokenSource for OAuthTokenSource {
    async fn fetch_token(&self) -> Result<TokenGrant, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::new(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::new(format!("invalid token response: {e}")))?;

        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::new("response has no access_token"))?;

        Ok(TokenGrant {
            access_token,
            expires_in: Duration::from_secs(body.expires_in.unwrap_or(0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Issues `token-N` on the Nth fetch; fails while `failing` is set.
    struct CountingSource {
        fetches: AtomicUsize,
        lifetime: Duration,
        failing: AtomicBool,
        delay: Duration,
    }

    impl CountingSource {
        fn new(lifetime: Duration) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                lifetime,
                failing: AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<TokenGrant, AuthError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing.load(Ordering::SeqCst) {
                return Err(AuthError::new("endpoint unreachable"));
            }
            Ok(TokenGrant {
                access_token: format!("token-{n}"),
                expires_in: self.lifetime,
            })
        }
    }

    impl<T: TokenSource + Send + Sync> TokenSource for Arc<T> {
        async fn fetch_token(&self) -> Result<TokenGrant, AuthError> {
            self.as_ref().fetch_token().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn caches_within_validity_window() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(3600)));
        let cache = CredentialCache::new(source.clone());

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        tokio::time::advance(Duration::from_secs(1000)).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_sixty_seconds_before_expiry() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(3600)));
        let cache = CredentialCache::new(source.clone());

        cache.get_token().await.unwrap();

        // One second inside the margin boundary: still cached.
        tokio::time::advance(Duration::from_secs(3539)).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-1");

        // Exactly at expiry minus margin: refreshed.
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let source =
            Arc::new(CountingSource::new(Duration::from_secs(3600)).with_delay(Duration::from_millis(50)));
        let cache = Arc::new(CredentialCache::new(source.clone()));

        let calls = (0..16).map(|_| {
            let cache = cache.clone();
            async move { cache.get_token().await }
        });
        let tokens = futures::future::join_all(calls).await;

        assert!(tokens.iter().all(|t| t.as_deref() == Ok("token-1")));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_is_reported_and_not_cached() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(120)));
        let cache = CredentialCache::new(source.clone());

        assert_eq!(cache.get_token().await.unwrap(), "token-1");

        tokio::time::advance(Duration::from_secs(60)).await;
        source.set_failing(true);
        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err, AuthError::new("endpoint unreachable"));

        // The expired token is never served, even while refresh keeps failing.
        assert!(cache.get_token().await.is_err());

        source.set_failing(false);
        assert_eq!(cache.get_token().await.unwrap(), "token-4");
    }

    #[tokio::test(start_paused = true)]
    async fn failure_before_first_token() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(3600)));
        source.set_failing(true);
        let cache = CredentialCache::new(source.clone());

        assert!(cache.get_token().await.is_err());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_lived_token_is_refetched_next_call() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(30)));
        let cache = CredentialCache::new(source.clone());

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refresh() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(3600)));
        let cache = CredentialCache::new(source.clone());

        let token = cache.get_token().await.unwrap();
        cache.invalidate(&token).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_rejection_keeps_newer_token() {
        let source = Arc::new(CountingSource::new(Duration::from_secs(3600)));
        let cache = CredentialCache::new(source.clone());

        let first = cache.get_token().await.unwrap();
        cache.invalidate(&first).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");

        // A request that went out with token-1 comes back rejected late.
        cache.invalidate(&first).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(source.fetches(), 2);
    }
}
