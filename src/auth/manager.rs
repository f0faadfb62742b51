//! Client-credentials token cache with a singleflight refresh guard.
//!
//! [`TokenManager`] owns the one access token shared by every request a client issues. Reads go
//! through a synchronous lock that is never held across an `.await`; refreshes serialize on an
//! async guard and re-check the cache once they hold it, so callers that all observe an expired
//! token piggy-back on a single token endpoint round trip instead of stampeding it.

mod metrics;

pub use metrics::TokenMetrics;

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	auth::token::{
		record::{AccessToken, TokenState},
		response::{self, AccessTokenResponse},
		secret::TokenSecret,
	},
	config::Credentials,
	error::ResponseError,
	http::{self, JsonHttpClient, JsonRequest},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Issues and caches access tokens for one set of credentials.
///
/// Clones share the cache, the refresh guard, and the metrics.
pub struct TokenManager<C>
where
	C: ?Sized + JsonHttpClient,
{
	http_client: Arc<C>,
	credentials: Credentials,
	token_endpoint: Url,
	cache: Arc<RwLock<Option<AccessToken>>>,
	refresh_guard: Arc<AsyncMutex<()>>,
	metrics: Arc<TokenMetrics>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// Creates a manager with an empty cache.
	pub fn new(
		credentials: Credentials,
		token_endpoint: Url,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			credentials,
			token_endpoint,
			cache: Default::default(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
			metrics: Default::default(),
		}
	}

	/// Returns a valid access token, refreshing first when the cache is empty or expired.
	///
	/// A token counts as valid only while its expiry lies strictly in the future.
	pub async fn ensure_valid_token(&self) -> Result<TokenSecret> {
		if let Some(secret) = self.valid_secret_at(OffsetDateTime::now_utc()) {
			return Ok(secret);
		}

		let _singleflight = self.refresh_guard.lock().await;

		// Another caller may have refreshed while this one waited on the guard.
		if let Some(secret) = self.valid_secret_at(OffsetDateTime::now_utc()) {
			return Ok(secret);
		}

		self.refresh().await.map(|response| response.access_token)
	}

	/// Unconditionally exchanges the credentials for a fresh token, replacing the cache.
	///
	/// The token endpoint response is returned as received.
	pub async fn get_access_token(&self) -> Result<AccessTokenResponse> {
		let _singleflight = self.refresh_guard.lock().await;

		self.refresh().await
	}

	/// Reports the cache state at `instant`.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		self.cache.read().as_ref().map_or(TokenState::Missing, |token| token.state_at(instant))
	}

	/// Reports the cache state against the current clock.
	pub fn state(&self) -> TokenState {
		self.state_at(OffsetDateTime::now_utc())
	}

	/// Returns a snapshot of the cached token.
	pub fn cached_token(&self) -> Option<AccessToken> {
		self.cache.read().clone()
	}

	/// Seeds the cache with a token issued elsewhere, replacing the current one.
	pub fn prime(&self, token: AccessToken) {
		*self.cache.write() = Some(token);
	}

	/// Refresh and reuse counters.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	/// Credentials this manager exchanges.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	fn valid_secret_at(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		let cache = self.cache.read();
		let token = cache.as_ref().filter(|token| !token.is_expired_at(now))?;

		self.metrics.record_reuse();
		obs::token_reused(token.remaining_at(now));

		Some(token.secret.clone())
	}

	fn token_url(&self) -> Url {
		let mut url = self.token_endpoint.clone();

		url.query_pairs_mut()
			.append_pair("grant_type", "client_credentials")
			.append_pair("client_id", &self.credentials.api_key)
			.append_pair("client_secret", self.credentials.secret_key.expose());

		url
	}

	async fn refresh(&self) -> Result<AccessTokenResponse> {
		const KIND: OperationKind = OperationKind::TokenRefresh;

		let span = OperationSpan::new(KIND, "refresh");
		let started = Instant::now();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async move {
				let request = JsonRequest::new(self.token_url(), &JsonMap::new())?;
				let body = self.http_client.post_json(request).await?;

				if let Some(err) = response::authentication_error(&body) {
					return Err(err);
				}

				let response = http::decode_json::<AccessTokenResponse>("token", body)?;

				if response.expires_in <= 0 {
					return Err(ResponseError::NonPositiveExpiresIn.into());
				}

				let ttl = response.ttl();
				let issued_at = OffsetDateTime::now_utc();
				let expires_at =
					issued_at.checked_add(ttl).ok_or(ResponseError::ExpiresInOutOfRange)?;

				self.prime(AccessToken {
					secret: response.access_token.clone(),
					issued_at,
					expires_at,
				});
				obs::token_refreshed(ttl, expires_at);

				Ok(response)
			})
			.await;

		match &result {
			Ok(_) => self.metrics.record_success(),
			Err(_) => self.metrics.record_failure(),
		}

		obs::record_operation_finished(KIND, &result, started.elapsed());

		result
	}
}
impl<C> Clone for TokenManager<C>
where
	C: ?Sized + JsonHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			credentials: self.credentials.clone(),
			token_endpoint: self.token_endpoint.clone(),
			cache: self.cache.clone(),
			refresh_guard: self.refresh_guard.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + JsonHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("api_key", &self.credentials.api_key)
			.field("token_endpoint", &self.token_endpoint)
			.field("cached", &self.cache.read().as_ref().map(|token| token.expires_at))
			.finish()
	}
}
