//! Cached access-token record, lifecycle helpers, and builder.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Lifecycle state of the token cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
	/// No token has been issued yet.
	Missing,
	/// A token is cached and its expiry lies strictly in the future.
	Valid,
	/// A token is cached but its expiry has been reached.
	Expired,
}

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
	/// Issued when `issued_at + expires_in` leaves the representable range.
	#[error("Expiry falls outside the supported date range.")]
	ExpiryOutOfRange,
}

/// Access token issued by the client-credentials exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer secret appended to every content request.
	pub secret: TokenSecret,
	/// Local instant at which the token was received.
	pub issued_at: OffsetDateTime,
	/// `issued_at` plus the server-reported TTL.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for constructing tokens.
	pub fn builder() -> AccessTokenBuilder {
		AccessTokenBuilder::default()
	}

	/// Computes the lifecycle state at a given instant.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		if instant >= self.expires_at { TokenState::Expired } else { TokenState::Valid }
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.state_at(instant), TokenState::Expired)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Remaining lifetime at `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug, Default)]
pub struct AccessTokenBuilder {
	secret: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn secret(mut self, token: impl Into<String>) -> Self {
		self.secret = Some(TokenSecret::new(token));

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let secret = self.secret.ok_or(AccessTokenBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at
				.checked_add(delta)
				.ok_or(AccessTokenBuilderError::ExpiryOutOfRange)?,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken { secret, issued_at, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_boundary_is_exclusive() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::builder()
			.secret("access")
			.issued_at(issued)
			.expires_in(Duration::seconds(100))
			.build()
			.expect("Token builder should succeed for boundary checks.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:01:40 UTC));
		assert_eq!(token.state_at(issued + Duration::seconds(50)), TokenState::Valid);
		assert_eq!(token.state_at(issued + Duration::seconds(99)), TokenState::Valid);
		assert_eq!(token.state_at(issued + Duration::seconds(100)), TokenState::Expired);
		assert_eq!(token.state_at(issued + Duration::seconds(150)), TokenState::Expired);
	}

	#[test]
	fn remaining_lifetime_clamps_at_zero() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::builder()
			.secret("access")
			.issued_at(issued)
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build()
			.expect("Token builder should accept absolute expiry.");

		assert_eq!(token.remaining_at(issued), Duration::hours(1));
		assert_eq!(token.remaining_at(macros::datetime!(2025-01-01 02:00 UTC)), Duration::ZERO);
	}

	#[test]
	fn builder_requires_secret_and_expiry() {
		assert_eq!(
			AccessToken::builder().expires_in(Duration::seconds(1)).build().err(),
			Some(AccessTokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			AccessToken::builder().secret("x").build().err(),
			Some(AccessTokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn builder_rejects_unrepresentable_expiry() {
		let result = AccessToken::builder()
			.secret("x")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::MAX)
			.build();

		assert_eq!(result.err(), Some(AccessTokenBuilderError::ExpiryOutOfRange));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let token = AccessToken::builder()
			.secret("24.very-secret")
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Token builder should succeed for debug checks.");

		assert!(!format!("{token:?}").contains("very-secret"));
	}
}
