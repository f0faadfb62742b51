//! Token endpoint payloads and error-envelope detection.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Successful token endpoint response, returned to callers unmodified.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
	/// Issued bearer token.
	pub access_token: TokenSecret,
	/// Token lifetime in seconds from issuance.
	pub expires_in: i64,
	/// Refresh token, which the client-credentials flow never needs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Space-delimited capability scopes granted to the application.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Remaining provider fields (`session_key`, `session_secret`, ...).
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl AccessTokenResponse {
	/// Server-reported TTL as a [`Duration`].
	pub fn ttl(&self) -> Duration {
		Duration::seconds(self.expires_in)
	}
}
impl Debug for AccessTokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("scope", &self.scope)
			.field("extra_fields", &self.extra.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Returns the authentication error carried by a token endpoint body, if any.
///
/// Both `error` and `error_description` must be present for the body to count as an error
/// envelope.
pub(crate) fn authentication_error(body: &JsonValue) -> Option<Error> {
	let error = body.get("error").filter(|value| !value.is_null())?;
	let description = body.get("error_description").filter(|value| !value.is_null())?;

	Some(Error::Authentication { error: text_of(error), description: text_of(description) })
}

fn text_of(value: &JsonValue) -> String {
	match value {
		JsonValue::String(text) => text.clone(),
		other => other.to_string(),
	}
}
