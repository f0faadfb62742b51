//! Client-level error types shared by the token manager, router, and transports.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, HTTP status, non-JSON body).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be interpreted.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// Token endpoint answered with an `error`/`error_description` envelope.
	#[error("{description}")]
	Authentication {
		/// Provider-supplied `error` code (e.g. `invalid_client`).
		error: String,
		/// Provider-supplied `error_description`.
		description: String,
	},
	/// Content endpoint answered with an `error_code`/`error_msg` envelope.
	#[error("{message}")]
	Request {
		/// Provider-supplied numeric `error_code`, when it is an integer.
		code: Option<i64>,
		/// Provider-supplied `error_msg`.
		message: String,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration value was not supplied.
	#[error("Missing required configuration value `{field}`.")]
	Missing {
		/// Name of the missing field.
		field: &'static str,
	},
	/// A credential or service identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint URL cannot carry path segments.
	#[error("The {endpoint} endpoint cannot be used as a URL base: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	RequestBody {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Failures interpreting an otherwise successful JSON response.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Response JSON did not match the expected shape.
	#[error("The {endpoint} endpoint returned an unexpected JSON shape.")]
	Decode {
		/// Endpoint label (`token`, `chat`, `plugin`, `text2image`).
		endpoint: &'static str,
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint returned a non-positive `expires_in`.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Transport-level failures (network, HTTP status, body encoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Request URL with the query string stripped.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Server answered with a non-success HTTP status.
	#[error("Endpoint {url} answered with HTTP {status}: {body_preview}")]
	Status {
		/// Request URL with the query string stripped.
		url: String,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
	/// Server answered with a body that is not JSON.
	#[error("Endpoint {url} returned a body that is not valid JSON.")]
	Decode {
		/// Request URL with the query string stripped.
		url: String,
		/// Underlying JSON parser failure.
		#[source]
		source: serde_json::Error,
	},
}
impl TransportError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: redact_query(url), source: Box::new(src) }
	}

	/// Builds a status failure, truncating the body to a short preview.
	pub fn status(url: &Url, status: u16, body: &str) -> Self {
		Self::Status { url: redact_query(url), status, body_preview: truncate_preview(body) }
	}

	/// Wraps a JSON parse failure of the response body.
	pub fn decode(url: &Url, source: serde_json::Error) -> Self {
		Self::Decode { url: redact_query(url), source }
	}
}

/// Drops the query string, which carries credentials or the access token.
pub(crate) fn redact_query(url: &Url) -> String {
	let mut url = url.clone();

	url.set_query(None);

	url.to_string()
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= TransportError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(TransportError::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn envelope_errors_display_server_message_verbatim() {
		let auth = Error::Authentication {
			error: "invalid_client".into(),
			description: "unknown client id".into(),
		};
		let request =
			Error::Request { code: Some(17), message: "Open api daily request limit reached".into() };

		assert_eq!(auth.to_string(), "unknown client id");
		assert_eq!(request.to_string(), "Open api daily request limit reached");
	}

	#[test]
	fn transport_errors_never_leak_query_credentials() {
		let url = Url::parse(
			"https://aip.baidubce.com/oauth/2.0/token?grant_type=client_credentials&client_secret=s3cr3t",
		)
		.expect("Token URL fixture should parse.");
		let err = TransportError::status(&url, 502, "bad gateway");
		let rendered = err.to_string();

		assert!(!rendered.contains("s3cr3t"));
		assert!(rendered.contains("https://aip.baidubce.com/oauth/2.0/token"));
		assert!(rendered.contains("502"));
	}

	#[test]
	fn status_preview_is_truncated() {
		let url = Url::parse("https://example.com/x").expect("URL fixture should parse.");
		let body = "a".repeat(1_000);

		match TransportError::status(&url, 500, &body) {
			TransportError::Status { body_preview, .. } => {
				assert_eq!(body_preview.chars().count(), TransportError::BODY_PREVIEW_LIMIT + 1);
				assert!(body_preview.ends_with('…'));
			},
			other => panic!("Unexpected transport error: {other:?}."),
		}
	}
}
