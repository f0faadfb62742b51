//! Transport primitives for token and content calls.
//!
//! The client only ever issues `POST` requests carrying a JSON body and expecting a JSON body
//! back, so [`JsonHttpClient`] is the crate's single dependency on an HTTP stack. Callers can
//! plug in their own implementation (to add proxies, timeouts, or a different runtime) while
//! the default reqwest-backed [`ReqwestHttpClient`] ships behind the `reqwest` feature.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	error::{ResponseError, TransportError, redact_query},
};

/// Headers attached to every request.
pub const JSON_HEADERS: [(&str, &str); 2] =
	[("Content-Type", "application/json"), ("Accept", "application/json")];

/// Boxed future returned by [`JsonHttpClient::post_json`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<JsonValue, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of posting JSON and returning the parsed JSON
/// response body.
///
/// Implementations must send every header in [`JsonRequest::headers`], treat non-success HTTP
/// statuses as [`TransportError::Status`], and report bodies that are not JSON as
/// [`TransportError::Decode`]. Application-level error envelopes inside a successful response are
/// returned untouched; the client inspects them itself.
pub trait JsonHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Posts `request` and resolves to the parsed JSON response body.
	fn post_json(&self, request: JsonRequest) -> HttpFuture<'_>;
}

/// Fully assembled outbound request.
#[derive(Clone)]
pub struct JsonRequest {
	/// Target URL including the query string.
	pub url: Url,
	/// Headers to send, always [`JSON_HEADERS`] for requests built by the client.
	pub headers: &'static [(&'static str, &'static str)],
	/// Serialized JSON payload.
	pub body: Vec<u8>,
}
impl JsonRequest {
	/// Serializes `body` and pairs it with the JSON headers.
	pub fn new<B>(url: Url, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(body)
			.map_err(|source| crate::error::ConfigError::RequestBody { source })?;

		Ok(Self { url, headers: &JSON_HEADERS, body })
	}
}
impl Debug for JsonRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JsonRequest")
			.field("url", &redact_query(&self.url))
			.field("headers", &self.headers)
			.field("body_len", &self.body.len())
			.finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Time limits, proxies, and TLS roots belong to the wrapped client; build one with
/// [`ReqwestClient::builder`] and pass it to [`ReqwestHttpClient::with_client`] to tune them.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl JsonHttpClient for ReqwestHttpClient {
	fn post_json(&self, request: JsonRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let JsonRequest { url, headers, body } = request;
			let mut builder = self.0.post(url.clone());

			for (name, value) in headers {
				builder = builder.header(*name, *value);
			}

			// reqwest errors embed the URL, whose query carries credentials.
			let response = builder
				.body(body)
				.send()
				.await
				.map_err(|err| TransportError::network(&url, err.without_url()))?;
			let status = response.status();
			let bytes = response
				.bytes()
				.await
				.map_err(|err| TransportError::network(&url, err.without_url()))?;

			if !status.is_success() {
				return Err(TransportError::status(
					&url,
					status.as_u16(),
					&String::from_utf8_lossy(&bytes),
				));
			}

			serde_json::from_slice(&bytes).map_err(|err| TransportError::decode(&url, err))
		})
	}
}

/// Decodes a JSON body into `T`, recording the failing path on mismatch.
pub(crate) fn decode_json<T>(endpoint: &'static str, body: JsonValue) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(body)
		.map_err(|source| ResponseError::Decode { endpoint, source }.into())
}
