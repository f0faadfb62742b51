//! Request router: chat, plugin, and text-to-image calls over one shared access token.

pub mod chat;
pub mod plugin;
pub mod text2image;

pub use chat::*;
pub use plugin::*;
pub use text2image::*;

// std
use std::time::Instant;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{AccessTokenResponse, TokenManager, TokenSecret},
	config::ClientConfig,
	endpoint::Route,
	http::{self, JsonHttpClient, JsonRequest},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestQianfanClient = QianfanClient<ReqwestHttpClient>;

/// Routes content calls to their endpoints, attaching a token from the shared cache.
///
/// Every public operation first makes sure the cached token is valid (refreshing it when it is
/// missing or expired), then posts the body, then inspects the reply for an
/// `error_code`/`error_msg` envelope. Clones share the token cache.
pub struct QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// HTTP client used for content calls (the token manager shares it).
	pub http_client: Arc<C>,
	/// Validated configuration.
	pub config: Arc<ClientConfig>,
	tokens: TokenManager<C>,
}
impl<C> QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let http_client = http_client.into();
		let tokens = TokenManager::new(
			config.credentials.clone(),
			config.token_endpoint.clone(),
			http_client.clone(),
		);

		Self { http_client, config: Arc::new(config), tokens }
	}

	/// Token manager backing this client.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Returns a valid access token, refreshing only when the cache is empty or expired.
	pub async fn ensure_valid_token(&self) -> Result<TokenSecret> {
		self.tokens.ensure_valid_token().await
	}

	/// Forces a token exchange and returns the token endpoint response.
	pub async fn get_access_token(&self) -> Result<AccessTokenResponse> {
		self.tokens.get_access_token().await
	}

	/// Sends `body` to `route` and decodes the reply into `R`.
	///
	/// This is the shared refresh-then-call path behind [`chat`](Self::chat),
	/// [`plugin`](Self::plugin), and [`text2image`](Self::text2image); call it directly to send
	/// a hand-built body or to keep the reply as a raw [`JsonValue`].
	pub async fn request<B, R>(&self, route: Route<'_>, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize + Sync,
		R: DeserializeOwned,
	{
		let kind = OperationKind::from(route.kind());
		let span = OperationSpan::new(kind, "request");
		let started = Instant::now();

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.tokens.ensure_valid_token().await?;
				let url = route.url(&self.config.api_base, token.expose())?;
				let reply = self.http_client.post_json(JsonRequest::new(url, body)?).await?;

				if let Some(err) = request_error(&reply) {
					return Err(err);
				}

				http::decode_json(route.kind().as_str(), reply)
			})
			.await;

		obs::record_operation_finished(kind, &result, started.elapsed());

		result
	}
}
#[cfg(feature = "reqwest")]
impl QianfanClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	///
	/// Use [`QianfanClient::with_http_client`] with a custom [`ReqwestClient`] to configure
	/// timeouts or proxies.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<C> Debug for QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("QianfanClient")
			.field("config", &self.config)
			.field("tokens", &self.tokens)
			.finish()
	}
}

/// Returns the request error carried by a content endpoint body, if any.
///
/// Both `error_code` and `error_msg` must be present for the body to count as an error envelope.
pub(crate) fn request_error(body: &JsonValue) -> Option<Error> {
	let code = body.get("error_code").filter(|value| !value.is_null())?;
	let message = body.get("error_msg").filter(|value| !value.is_null())?;
	let code = match code {
		JsonValue::Number(number) => number.as_i64(),
		JsonValue::String(text) => text.parse().ok(),
		_ => None,
	};
	let message = match message {
		JsonValue::String(text) => text.clone(),
		other => other.to_string(),
	};

	Some(Error::Request { code, message })
}
