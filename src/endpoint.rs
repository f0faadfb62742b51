//! Endpoint registry: the closed set of chat models and the routes built from them.
//!
//! Every content call lands on `{api_base}/{kind}/{path}?access_token={token}`. The `kind`
//! segment comes from the [`Route`] variant and the `path` segment from the model table, the
//! fixed text-to-image path, or the configured plugin service name.

// self
use crate::{_prelude::*, auth::ServiceName, error::ConfigError};

/// Path segment of the only text-to-image model (Stable Diffusion XL).
pub const TEXT2IMAGE_ENDPOINT: &str = "sd_xl";

/// Error returned when a model name is not part of the registry.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown chat model `{0}`.")]
pub struct UnknownModel(pub String);

/// Chat-capable models served under the `chat` route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChatModel {
	/// `ERNIE-Bot-4`.
	ErnieBot4,
	/// `ERNIE-Bot`, used when no model is specified.
	#[default]
	ErnieBot,
	/// `ERNIE-Bot-turbo`.
	ErnieBotTurbo,
	/// `BLOOMZ-7B`.
	Bloomz7b,
	/// `Qianfan-BLOOMZ-7B-compressed`.
	QianfanBloomz7bCompressed,
	/// `Llama-2-7b-chat`.
	Llama2_7bChat,
	/// `Llama-2-13b-chat`.
	Llama2_13bChat,
	/// `Llama-2-70b-chat`.
	Llama2_70bChat,
	/// `Qianfan-Chinese-Llama-2-7B`.
	QianfanChineseLlama2_7b,
	/// `ChatGLM2-6B-32K`.
	ChatGlm2_6b32k,
	/// `AquilaChat-7B`.
	AquilaChat7b,
}
impl ChatModel {
	/// Every registered model, in registry order.
	pub const ALL: [ChatModel; 11] = [
		ChatModel::ErnieBot4,
		ChatModel::ErnieBot,
		ChatModel::ErnieBotTurbo,
		ChatModel::Bloomz7b,
		ChatModel::QianfanBloomz7bCompressed,
		ChatModel::Llama2_7bChat,
		ChatModel::Llama2_13bChat,
		ChatModel::Llama2_70bChat,
		ChatModel::QianfanChineseLlama2_7b,
		ChatModel::ChatGlm2_6b32k,
		ChatModel::AquilaChat7b,
	];

	/// Returns the public model name.
	pub const fn as_str(self) -> &'static str {
		match self {
			ChatModel::ErnieBot4 => "ERNIE-Bot-4",
			ChatModel::ErnieBot => "ERNIE-Bot",
			ChatModel::ErnieBotTurbo => "ERNIE-Bot-turbo",
			ChatModel::Bloomz7b => "BLOOMZ-7B",
			ChatModel::QianfanBloomz7bCompressed => "Qianfan-BLOOMZ-7B-compressed",
			ChatModel::Llama2_7bChat => "Llama-2-7b-chat",
			ChatModel::Llama2_13bChat => "Llama-2-13b-chat",
			ChatModel::Llama2_70bChat => "Llama-2-70b-chat",
			ChatModel::QianfanChineseLlama2_7b => "Qianfan-Chinese-Llama-2-7B",
			ChatModel::ChatGlm2_6b32k => "ChatGLM2-6B-32K",
			ChatModel::AquilaChat7b => "AquilaChat-7B",
		}
	}

	/// Returns the endpoint path segment serving this model.
	pub const fn endpoint(self) -> &'static str {
		match self {
			ChatModel::ErnieBot4 => "completions_pro",
			ChatModel::ErnieBot => "completions",
			ChatModel::ErnieBotTurbo => "eb-instant",
			ChatModel::Bloomz7b => "bloomz_7b1",
			ChatModel::QianfanBloomz7bCompressed => "qianfan_bloomz_7b_compressed",
			ChatModel::Llama2_7bChat => "llama_2_7b",
			ChatModel::Llama2_13bChat => "llama_2_13b",
			ChatModel::Llama2_70bChat => "llama_2_70b",
			ChatModel::QianfanChineseLlama2_7b => "qianfan_chinese_llama_2_7b",
			ChatModel::ChatGlm2_6b32k => "chatglm2_6b_32k",
			ChatModel::AquilaChat7b => "aquilachat_7b",
		}
	}

	/// Whether the model accepts `functions` and may answer with a `function_call`.
	pub const fn supports_functions(self) -> bool {
		matches!(self, ChatModel::ErnieBot4 | ChatModel::ErnieBot)
	}
}
impl Display for ChatModel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ChatModel {
	type Err = UnknownModel;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ChatModel::ALL
			.into_iter()
			.find(|model| model.as_str() == s)
			.ok_or_else(|| UnknownModel(s.to_owned()))
	}
}
impl Serialize for ChatModel {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for ChatModel {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(serde::de::Error::custom)
	}
}

/// Logical request kinds, each owning one path segment under the API base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
	/// Chat completion.
	Chat,
	/// Plugin application (knowledge base and friends).
	Plugin,
	/// Text-to-image generation.
	Text2Image,
}
impl RouteKind {
	/// Returns the path segment for this kind.
	pub const fn as_str(self) -> &'static str {
		match self {
			RouteKind::Chat => "chat",
			RouteKind::Plugin => "plugin",
			RouteKind::Text2Image => "text2image",
		}
	}
}
impl Display for RouteKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved destination of a content call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route<'a> {
	/// Chat completion against a registered model.
	Chat(ChatModel),
	/// Plugin application identified by its deployed service name.
	Plugin(&'a ServiceName),
	/// Stable Diffusion XL text-to-image.
	Text2Image,
}
impl Route<'_> {
	/// Returns the request kind.
	pub const fn kind(&self) -> RouteKind {
		match self {
			Route::Chat(_) => RouteKind::Chat,
			Route::Plugin(_) => RouteKind::Plugin,
			Route::Text2Image => RouteKind::Text2Image,
		}
	}

	/// Returns the endpoint path segment.
	pub fn path(&self) -> &str {
		match self {
			Route::Chat(model) => model.endpoint(),
			Route::Plugin(service) => service.as_ref(),
			Route::Text2Image => TEXT2IMAGE_ENDPOINT,
		}
	}

	/// Builds `{api_base}/{kind}/{path}?access_token={token}`.
	pub fn url(&self, api_base: &Url, access_token: &str) -> Result<Url, ConfigError> {
		let mut url = api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidEndpoint {
				endpoint: "api base",
				url: api_base.to_string(),
			})?
			.pop_if_empty()
			.push(self.kind().as_str())
			.push(self.path());
		url.set_query(None);
		url.query_pairs_mut().append_pair("access_token", access_token);

		Ok(url)
	}
}
