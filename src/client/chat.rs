//! Chat completion payloads and the [`QianfanClient::chat`] operation.

// self
use crate::{
	_prelude::*,
	client::QianfanClient,
	endpoint::{ChatModel, Route},
	http::JsonHttpClient,
};

/// Speaker of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// End user.
	User,
	/// Model reply.
	Assistant,
	/// Result of a function the model asked to call.
	Function,
}

/// Single turn of a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	/// Speaker.
	pub role: Role,
	/// Message text (or the function result, serialized).
	pub content: String,
	/// Function name, required when `role` is [`Role::Function`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Function call the assistant requested in this turn.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_call: Option<FunctionCall>,
}
impl ChatMessage {
	/// Builds a user turn.
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into(), name: None, function_call: None }
	}

	/// Builds an assistant turn.
	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into(), name: None, function_call: None }
	}

	/// Builds a function-result turn.
	pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			role: Role::Function,
			content: content.into(),
			name: Some(name.into()),
			function_call: None,
		}
	}
}

/// Function the model may ask the caller to invoke (ERNIE-Bot family only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
	/// Function name.
	pub name: String,
	/// Natural-language description.
	pub description: String,
	/// JSON Schema of the arguments.
	pub parameters: JsonValue,
	/// JSON Schema of the return value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub responses: Option<JsonValue>,
	/// Example exchanges.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub examples: Option<Vec<Vec<ChatMessage>>>,
}

/// Function invocation requested by the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
	/// Function name.
	pub name: String,
	/// JSON-encoded arguments.
	pub arguments: String,
	/// Model's reasoning for the call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thoughts: Option<String>,
}

/// Chat completion request body.
///
/// Parameters a given model does not understand are ignored by the server; model-specific
/// extras can be added through `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
	/// Conversation so far; must hold an odd number of turns ending with the user.
	pub messages: Vec<ChatMessage>,
	/// Sampling temperature in `(0, 1]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub temperature: Option<f32>,
	/// Nucleus sampling in `[0, 1]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub top_p: Option<f32>,
	/// Repetition penalty in `[1, 2]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub penalty_score: Option<f32>,
	/// Requests a server-sent event stream; the client still expects one JSON body.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stream: Option<bool>,
	/// System persona.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub system: Option<String>,
	/// Stop sequences.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stop: Option<Vec<String>>,
	/// Functions the model may call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub functions: Option<Vec<FunctionDef>>,
	/// End-user identifier for abuse tracking.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Additional model-specific parameters.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl ChatRequest {
	/// Creates a request from a conversation.
	pub fn new(messages: Vec<ChatMessage>) -> Self {
		Self { messages, ..Default::default() }
	}

	/// Sets the sampling temperature.
	pub fn with_temperature(mut self, temperature: f32) -> Self {
		self.temperature = Some(temperature);

		self
	}

	/// Sets the system persona.
	pub fn with_system(mut self, system: impl Into<String>) -> Self {
		self.system = Some(system.into());

		self
	}

	/// Sets the callable functions.
	pub fn with_functions(mut self, functions: Vec<FunctionDef>) -> Self {
		self.functions = Some(functions);

		self
	}
}

/// Token accounting for a completion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
	/// Prompt tokens.
	pub prompt_tokens: u64,
	/// Completion tokens.
	#[serde(default)]
	pub completion_tokens: u64,
	/// Total tokens.
	pub total_tokens: u64,
	/// Remaining provider fields (per-plugin usage and friends).
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Chat completion response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
	/// Conversation turn identifier.
	pub id: String,
	/// Always `chat.completion`.
	pub object: String,
	/// Unix timestamp of the reply.
	pub created: i64,
	/// Chunk index when streaming.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sentence_id: Option<i64>,
	/// Whether this is the last chunk.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_end: Option<bool>,
	/// Whether the reply was cut off by the length limit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_truncated: Option<bool>,
	/// Generated text.
	pub result: String,
	/// Whether the caller should drop the conversation history (unsafe input detected).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub need_clear_history: Option<bool>,
	/// Turn to drop from history when `need_clear_history` is set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ban_round: Option<i64>,
	/// Token accounting.
	pub usage: Usage,
	/// Function call requested by the model.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_call: Option<FunctionCall>,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

impl<C> QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// Sends a chat completion to `model`, or to [`ChatModel::ErnieBot`] when `model` is `None`.
	pub async fn chat(&self, body: &ChatRequest, model: Option<ChatModel>) -> Result<ChatResponse> {
		self.request(Route::Chat(model.unwrap_or_default()), body).await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn request_omits_unset_parameters() {
		let request = ChatRequest::new(vec![ChatMessage::user("你好")]).with_temperature(0.8);
		let mut body = serde_json::to_value(&request).expect("Chat request should serialize.");

		assert_eq!(body, json!({ "messages": [{ "role": "user", "content": "你好" }], "temperature": 0.8 }));

		body["disable_search"] = json!(true);

		let request: ChatRequest =
			serde_json::from_value(body).expect("Chat request should deserialize.");

		assert_eq!(request.extra.get("disable_search"), Some(&json!(true)));
	}

	#[test]
	fn response_round_trips_unmodified() {
		let body = json!({
			"id": "as-bcmt5ct4iy",
			"object": "chat.completion",
			"created": 1_680_167_072,
			"result": "您好，我是文心一言。",
			"is_truncated": false,
			"need_clear_history": false,
			"usage": {
				"prompt_tokens": 4,
				"completion_tokens": 11,
				"total_tokens": 15,
				"plugins": []
			},
			"search_info": { "is_beset": 0 }
		});
		let response: ChatResponse =
			serde_json::from_value(body.clone()).expect("Chat response should decode.");

		assert_eq!(response.usage.total_tokens, 15);
		assert!(response.extra.contains_key("search_info"));
		assert_eq!(serde_json::to_value(&response).expect("Response should serialize."), body);
	}

	#[test]
	fn function_call_replies_decode() {
		let response: ChatResponse = serde_json::from_value(json!({
			"id": "as-fc",
			"object": "chat.completion",
			"created": 1,
			"result": "",
			"usage": { "prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3 },
			"function_call": {
				"name": "get_weather",
				"thoughts": "The user wants the weather.",
				"arguments": "{\"city\":\"北京\"}"
			}
		}))
		.expect("Function call response should decode.");
		let call = response.function_call.expect("Function call should be present.");

		assert_eq!(call.name, "get_weather");
		assert_eq!(call.arguments, "{\"city\":\"北京\"}");
	}
}
