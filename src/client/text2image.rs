//! Text-to-image payloads and the [`QianfanClient::text2image`] operation.

// self
use crate::{_prelude::*, client::QianfanClient, endpoint::Route, http::JsonHttpClient};

/// Text-to-image request body for the Stable Diffusion XL endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Text2ImageRequest {
	/// Image description.
	pub prompt: String,
	/// Content to keep out of the image.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub negative_prompt: Option<String>,
	/// Output size such as `1024x1024`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<String>,
	/// Number of images, 1 to 4.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub n: Option<u8>,
	/// Diffusion steps, 10 to 50.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub steps: Option<u32>,
	/// Sampler name, for example `Euler a`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sampler_index: Option<String>,
	/// Random seed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seed: Option<u64>,
	/// Prompt adherence, 0 to 30.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cfg_scale: Option<f32>,
	/// Preset style, for example `Base`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<String>,
	/// End-user identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Additional parameters.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl Text2ImageRequest {
	/// Creates a request for `prompt`.
	pub fn new(prompt: impl Into<String>) -> Self {
		Self { prompt: prompt.into(), ..Default::default() }
	}

	/// Sets the output size.
	pub fn with_size(mut self, size: impl Into<String>) -> Self {
		self.size = Some(size.into());

		self
	}

	/// Sets the number of images.
	pub fn with_count(mut self, n: u8) -> Self {
		self.n = Some(n);

		self
	}
}

/// One generated image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
	/// Always `image`.
	pub object: String,
	/// Base64-encoded image bytes.
	pub b64_image: String,
	/// Position within the batch.
	pub index: u32,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Token accounting for an image request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUsage {
	/// Prompt tokens.
	pub prompt_tokens: u64,
	/// Total tokens.
	pub total_tokens: u64,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Text-to-image response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text2ImageResponse {
	/// Request identifier.
	pub id: String,
	/// Always `image`.
	pub object: String,
	/// Unix timestamp of the reply.
	pub created: i64,
	/// Generated images.
	pub data: Vec<ImageData>,
	/// Token accounting.
	pub usage: ImageUsage,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

impl<C> QianfanClient<C>
where
	C: ?Sized + JsonHttpClient,
{
	/// Generates images from a prompt.
	pub async fn text2image(&self, body: &Text2ImageRequest) -> Result<Text2ImageResponse> {
		self.request(Route::Text2Image, body).await
	}
}
