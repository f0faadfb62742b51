//! Plugin application payloads and the [`QianfanClient::plugin`] operation.

// self
use crate::{_prelude::*, client::QianfanClient, endpoint::Route, http::JsonHttpClient};

/// Plugin application request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginRequest {
	/// User query.
	pub query: String,
	/// Plugins to enable, for example `uuid-zhishiku`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub plugins: Option<Vec<String>>,
	/// Requests the plugin's intermediate output in `meta_info`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verbose: Option<bool>,
	/// Requests a server-sent event stream; the client still expects one JSON body.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stream: Option<bool>,
	/// Prior turns, in the chat message shape.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub history: Option<Vec<JsonValue>>,
	/// Large-model parameters forwarded by the plugin application.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub llm: Option<JsonValue>,
	/// Additional parameters.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl PluginRequest {
	/// Creates a request for `query`.
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), ..Default::default() }
	}

	/// Enables the given plugins.
	pub fn with_plugins<I, S>(mut self, plugins: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.plugins = Some(plugins.into_iter().map(Into::into).collect());

		self
	}
}

/// Plugin application response body.
///
/// The plugin service returns fewer guaranteed fields than chat; only `result` is required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
	/// Conversation turn identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Response object type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object: Option<String>,
	/// Unix timestamp of the reply.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created: Option<i64>,
	/// Generated text.
	pub result: String,
	/// Whether the reply was cut off by the length limit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_truncated: Option<bool>,
	/// Whether the caller should drop the conversation history.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub need_clear_history: Option<bool>,
	/// Token accounting, including per-plugin usage.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub usage: Option<JsonValue>,
	/// Plugin intermediate output (present with `verbose`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta_info: Option<JsonValue>,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

impl<C> QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// Sends a query to the configured plugin application.
	pub async fn plugin(&self, body: &PluginRequest) -> Result<PluginResponse> {
		self.request(Route::Plugin(&self.config.plugin_service), body).await
	}
}
