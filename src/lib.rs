//! Token-caching client for the Baidu Qianfan (Wenxin Workshop) API family: one cached
//! client-credentials token shared by chat completion, plugin, and text-to-image calls.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{QianfanClient, ReqwestQianfanClient},
		config::ClientConfig,
		http::ReqwestHttpClient,
	};

	/// API key used by the test helpers.
	pub const TEST_API_KEY: &str = "test-api-key";
	/// Secret key used by the test helpers.
	pub const TEST_SECRET_KEY: &str = "test-secret-key";
	/// Plugin service suffix used by the test helpers.
	pub const TEST_PLUGIN_SERVICE: &str = "test-knowledge-base";
	/// Token endpoint path served by the mock server.
	pub const TEST_TOKEN_PATH: &str = "/oauth/2.0/token";
	/// API base path served by the mock server.
	pub const TEST_API_BASE_PATH: &str = "/rpc/2.0/ai_custom/v1/wenxinworkshop";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a client configuration whose endpoints live under `base_url` (typically
	/// `MockServer::base_url()`).
	pub fn test_client_config(base_url: &str) -> ClientConfig {
		let base = base_url.trim_end_matches('/');

		ClientConfig::builder()
			.api_key(TEST_API_KEY)
			.secret_key(TEST_SECRET_KEY)
			.plugin_service(TEST_PLUGIN_SERVICE)
			.token_endpoint(
				Url::parse(&format!("{base}{TEST_TOKEN_PATH}"))
					.expect("Mock token endpoint should parse successfully."),
			)
			.api_base(
				Url::parse(&format!("{base}{TEST_API_BASE_PATH}"))
					.expect("Mock API base should parse successfully."),
			)
			.build()
			.expect("Test client configuration should be valid.")
	}

	/// Constructs a reqwest-backed [`QianfanClient`] pointed at `base_url`.
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestQianfanClient {
		QianfanClient::with_http_client(test_client_config(base_url), test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
