//! Demonstrates a chat completion and a text-to-image call sharing one cached access token,
//! served by a local mock of the Qianfan endpoints.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use qianfan_client::{
	client::{ChatMessage, ChatRequest, QianfanClient, Text2ImageRequest},
	config::ClientConfig,
	endpoint::ChatModel,
	http::ReqwestHttpClient,
	reqwest::Client,
};

const API_BASE_PATH: &str = "/rpc/2.0/ai_custom/v1/wenxinworkshop";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/2.0/token").query_param("client_id", "demo-api-key");
			then.status(200).json_body(json!({ "access_token": "24.demo", "expires_in": 2_592_000 }));
		})
		.await;
	let chat_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(format!("{API_BASE_PATH}/chat/eb-instant"))
				.query_param("access_token", "24.demo");
			then.status(200).json_body(json!({
				"id": "as-demo",
				"object": "chat.completion",
				"created": 1_700_000_000,
				"result": "你好！有什么可以帮你的吗？",
				"usage": { "prompt_tokens": 1, "completion_tokens": 9, "total_tokens": 10 }
			}));
		})
		.await;
	let image_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{API_BASE_PATH}/text2image/sd_xl"));
			then.status(200).json_body(json!({
				"id": "as-demo-image",
				"object": "image",
				"created": 1_700_000_001,
				"data": [{ "object": "image", "b64_image": "iVBORw0KGgo=", "index": 0 }],
				"usage": { "prompt_tokens": 4, "total_tokens": 4 }
			}));
		})
		.await;
	let config = ClientConfig::builder()
		.api_key("demo-api-key")
		.secret_key("demo-secret-key")
		.plugin_service("demo-knowledge-base")
		.token_endpoint(Url::parse(&server.url("/oauth/2.0/token"))?)
		.api_base(Url::parse(&server.url(API_BASE_PATH))?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = <QianfanClient<ReqwestHttpClient>>::with_http_client(config, http_client);
	let reply = client
		.chat(&ChatRequest::new(vec![ChatMessage::user("你好")]), Some(ChatModel::ErnieBotTurbo))
		.await?;

	println!("{}: {}", ChatModel::ErnieBotTurbo, reply.result);

	let images = client.text2image(&Text2ImageRequest::new("一只橘猫").with_size("1024x1024")).await?;

	println!("Generated {} image(s).", images.data.len());

	token_mock.assert_async().await;
	chat_mock.assert_async().await;
	image_mock.assert_async().await;

	Ok(())
}
