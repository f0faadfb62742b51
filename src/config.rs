//! Client configuration: credentials, the plugin service name, and endpoint overrides.
//!
//! [`ClientConfig`] values are validated once, either by [`ClientConfigBuilder::build`] or while
//! deserializing, so a constructed client never has to re-check its endpoints.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, SecretKey, ServiceName},
	error::ConfigError,
};

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://aip.baidubce.com/oauth/2.0/token";
/// Default base URL shared by the chat, plugin, and text-to-image routes.
pub const DEFAULT_API_BASE: &str = "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop";

/// Application credentials exchanged for access tokens.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Credentials {
	/// API key (`client_id`).
	pub api_key: ApiKey,
	/// Secret key (`client_secret`).
	pub secret_key: SecretKey,
}

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// Application credentials.
	pub credentials: Credentials,
	/// Service-name suffix of the deployed plugin application.
	pub plugin_service: ServiceName,
	/// OAuth token endpoint.
	pub token_endpoint: Url,
	/// Base URL for content routes.
	pub api_base: Url,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// Builder for [`ClientConfig`] values.
///
/// Also the serde shape of a configuration file: `api_key`, `secret_key`, and `plugin_service`
/// are required; `token_endpoint` and `api_base` fall back to the public Baidu endpoints.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfigBuilder {
	/// API key (`client_id`).
	pub api_key: Option<String>,
	/// Secret key (`client_secret`).
	pub secret_key: Option<String>,
	/// Service-name suffix of the deployed plugin application.
	pub plugin_service: Option<String>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// API base override.
	pub api_base: Option<Url>,
}
impl ClientConfigBuilder {
	/// Sets the API key.
	pub fn api_key(mut self, value: impl Into<String>) -> Self {
		self.api_key = Some(value.into());

		self
	}

	/// Sets the secret key.
	pub fn secret_key(mut self, value: impl Into<String>) -> Self {
		self.secret_key = Some(value.into());

		self
	}

	/// Sets the plugin service-name suffix shown on the service's console page.
	pub fn plugin_service(mut self, value: impl Into<String>) -> Self {
		self.plugin_service = Some(value.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let api_key = ApiKey::new(self.api_key.ok_or(ConfigError::Missing { field: "api_key" })?)?;
		let secret_key =
			SecretKey::new(self.secret_key.ok_or(ConfigError::Missing { field: "secret_key" })?)?;
		let plugin_service = ServiceName::new(
			self.plugin_service.ok_or(ConfigError::Missing { field: "plugin_service" })?,
		)?;
		let token_endpoint = match self.token_endpoint {
			Some(url) => url,
			None => default_url(DEFAULT_TOKEN_ENDPOINT)?,
		};
		let api_base = match self.api_base {
			Some(url) => url,
			None => default_url(DEFAULT_API_BASE)?,
		};

		validate_endpoint("token", &token_endpoint)?;
		validate_endpoint("api base", &api_base)?;

		Ok(ClientConfig {
			credentials: Credentials { api_key, secret_key },
			plugin_service,
			token_endpoint,
			api_base,
		})
	}
}
impl Debug for ClientConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfigBuilder")
			.field("api_key", &self.api_key)
			.field("secret_key_set", &self.secret_key.is_some())
			.field("plugin_service", &self.plugin_service)
			.field("token_endpoint", &self.token_endpoint)
			.field("api_base", &self.api_base)
			.finish()
	}
}

fn default_url(raw: &'static str) -> Result<Url, ConfigError> {
	Url::parse(raw)
		.map_err(|_| ConfigError::InvalidEndpoint { endpoint: "default", url: raw.into() })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		return Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ConfigError::InvalidEndpoint { endpoint: name, url: url.to_string() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn complete() -> ClientConfigBuilder {
		ClientConfig::builder().api_key("ak").secret_key("sk").plugin_service("kb")
	}

	#[test]
	fn defaults_point_at_public_endpoints() {
		let config = complete().build().expect("Complete builder should succeed.");

		assert_eq!(config.token_endpoint.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
		assert_eq!(config.plugin_service.as_ref(), "kb");
		assert_eq!(config.credentials.api_key.as_ref(), "ak");
		assert_eq!(config.credentials.secret_key.expose(), "sk");
	}

	#[test]
	fn plugin_service_is_required() {
		let err = ClientConfig::builder()
			.api_key("ak")
			.secret_key("sk")
			.build()
			.expect_err("Missing plugin service must be rejected.");

		assert!(matches!(err, ConfigError::Missing { field: "plugin_service" }));
	}

	#[test]
	fn credentials_are_required_and_validated() {
		let err = ClientConfig::builder()
			.secret_key("sk")
			.plugin_service("kb")
			.build()
			.expect_err("Missing API key must be rejected.");

		assert!(matches!(err, ConfigError::Missing { field: "api_key" }));

		let err = complete()
			.secret_key("")
			.build()
			.expect_err("Empty secret key must be rejected.");

		assert!(matches!(err, ConfigError::InvalidIdentifier(_)));
	}

	#[test]
	fn endpoints_must_be_https_bases() {
		let err = complete()
			.token_endpoint(Url::parse("http://example.com/token").expect("URL should parse."))
			.build()
			.expect_err("Plain HTTP token endpoint must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "token", .. }));

		let err = complete()
			.api_base(Url::parse("http://example.com/api").expect("URL should parse."))
			.build()
			.expect_err("Plain HTTP API base must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "api base", .. }));
	}

	#[test]
	fn deserialization_runs_validation() {
		let config: ClientConfig = serde_json::from_str(
			r#"{"api_key":"ak","secret_key":"sk","plugin_service":"kb","api_base":"https://proxy.example.com/wenxin"}"#,
		)
		.expect("Valid configuration should deserialize.");

		assert_eq!(config.api_base.as_str(), "https://proxy.example.com/wenxin");
		assert_eq!(config.token_endpoint.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert!(
			serde_json::from_str::<ClientConfig>(r#"{"api_key":"ak","secret_key":"sk"}"#).is_err()
		);
		assert!(
			serde_json::from_str::<ClientConfig>(
				r#"{"api_key":"ak","secret_key":"sk","plugin_service":"kb","typo":1}"#
			)
			.is_err()
		);
	}

	#[test]
	fn builder_debug_redacts_secret() {
		assert!(!format!("{:?}", complete()).contains("\"sk\""));
	}
}
