// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
use thiserror::Error as ThisError;
use time::{Duration, OffsetDateTime};
// self
use qianfan_client::{
	auth::{AccessToken, TokenState},
	client::{ChatMessage, ChatRequest, PluginRequest, QianfanClient, Text2ImageRequest},
	config::ClientConfig,
	endpoint::{ChatModel, Route},
	error::{Error, TransportError},
	http::{HttpFuture, JSON_HEADERS, JsonHttpClient, JsonRequest},
};

const TOKEN: &str = "24.fake-token";

#[derive(Debug, ThisError)]
#[error("Network unreachable.")]
struct Offline;

/// Answers by path, recording every request it sees.
#[derive(Default)]
struct RoutingTransport {
	requests: Mutex<Vec<JsonRequest>>,
	offline: bool,
}
impl RoutingTransport {
	fn offline() -> Self {
		Self { offline: true, ..Default::default() }
	}

	fn paths(&self) -> Vec<String> {
		self.requests.lock().iter().map(|request| request.url.path().to_owned()).collect()
	}

	fn token_calls(&self) -> usize {
		self.paths().iter().filter(|path| path.ends_with("/oauth/2.0/token")).count()
	}
}
impl JsonHttpClient for RoutingTransport {
	fn post_json(&self, request: JsonRequest) -> HttpFuture<'_> {
		let url = request.url.clone();
		let path = url.path().to_owned();

		self.requests.lock().push(request);

		Box::pin(async move {
			tokio::task::yield_now().await;

			if self.offline {
				return Err(TransportError::network(&url, Offline));
			}

			let reply = if path.ends_with("/oauth/2.0/token") {
				json!({ "access_token": TOKEN, "expires_in": 2_592_000 })
			} else if path.contains("/chat/") {
				json!({
					"id": "as-fake",
					"object": "chat.completion",
					"created": 1,
					"result": path.rsplit('/').next().unwrap_or_default(),
					"usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
				})
			} else if path.contains("/plugin/") {
				json!({ "result": "plugin answer" })
			} else if path.ends_with("/text2image/sd_xl") {
				json!({
					"id": "as-img",
					"object": "image",
					"created": 1,
					"data": [],
					"usage": { "prompt_tokens": 1, "total_tokens": 1 }
				})
			} else {
				return Err(TransportError::status(&url, 404, "no route"));
			};

			Ok(reply)
		})
	}
}

fn config() -> ClientConfig {
	serde_json::from_value(json!({
		"api_key": "ak-it",
		"secret_key": "sk-it",
		"plugin_service": "kb-it",
		"token_endpoint": "https://auth.example.com/oauth/2.0/token",
		"api_base": "https://api.example.com/wenxinworkshop/"
	}))
	.expect("Integration configuration should deserialize.")
}

fn client(transport: &Arc<RoutingTransport>) -> QianfanClient<RoutingTransport> {
	QianfanClient::with_http_client(config(), transport.clone())
}

fn hello() -> ChatRequest {
	ChatRequest::new(vec![ChatMessage::user("hi")])
}

#[tokio::test]
async fn all_routes_share_one_token() {
	let transport = Arc::new(RoutingTransport::default());
	let client = client(&transport);
	let chat = client
		.chat(&hello(), Some(ChatModel::ErnieBot4))
		.await
		.expect("Chat call should succeed.");
	let plugin =
		client.plugin(&PluginRequest::new("q")).await.expect("Plugin call should succeed.");
	let image = client
		.text2image(&Text2ImageRequest::new("p"))
		.await
		.expect("Image call should succeed.");

	assert_eq!(chat.result, "completions_pro");
	assert_eq!(plugin.result, "plugin answer");
	assert!(image.data.is_empty());
	assert_eq!(transport.paths(), [
		"/oauth/2.0/token",
		"/wenxinworkshop/chat/completions_pro",
		"/wenxinworkshop/plugin/kb-it",
		"/wenxinworkshop/text2image/sd_xl",
	]);

	for request in transport.requests.lock().iter().skip(1) {
		let query = request.url.query_pairs().into_owned().collect::<BTreeMap<_, _>>();

		assert_eq!(query.get("access_token").map(String::as_str), Some(TOKEN));
		assert_eq!(query.len(), 1);
		assert_eq!(request.headers, &JSON_HEADERS);
	}
}

#[tokio::test]
async fn concurrent_clones_refresh_once() {
	let transport = Arc::new(RoutingTransport::default());
	let client = client(&transport);
	let other = client.clone();
	let request = hello();
	let plugin_request = PluginRequest::new("q");
	let (a, b, c) = tokio::join!(
		client.chat(&request, None),
		other.chat(&request, Some(ChatModel::ErnieBotTurbo)),
		client.plugin(&plugin_request),
	);

	a.expect("First concurrent call should succeed.");
	b.expect("Second concurrent call should succeed.");
	c.expect("Third concurrent call should succeed.");

	assert_eq!(transport.token_calls(), 1);
	assert_eq!(client.tokens().metrics().attempts(), 1);
}

#[tokio::test]
async fn expired_primed_token_is_replaced_before_the_call() {
	let transport = Arc::new(RoutingTransport::default());
	let client = client(&transport);
	let now = OffsetDateTime::now_utc();
	let stale = AccessToken::builder()
		.secret("24.stale")
		.issued_at(now - Duration::days(31))
		.expires_at(now - Duration::days(1))
		.build()
		.expect("Stale token fixture should build.");

	client.tokens().prime(stale);

	assert_eq!(client.tokens().state(), TokenState::Expired);

	client.chat(&hello(), None).await.expect("Chat call should succeed after refresh.");

	assert_eq!(transport.token_calls(), 1);
	assert_eq!(client.tokens().state(), TokenState::Valid);
	assert_eq!(
		client.tokens().cached_token().map(|token| token.secret.expose().to_owned()),
		Some(TOKEN.to_owned())
	);
}

#[tokio::test]
async fn valid_primed_token_skips_the_token_endpoint() {
	let transport = Arc::new(RoutingTransport::default());
	let client = client(&transport);
	let primed = AccessToken::builder()
		.secret("24.primed")
		.expires_in(Duration::hours(1))
		.build()
		.expect("Primed token fixture should build.");

	client.tokens().prime(primed);

	let raw: Value = client
		.request(Route::Text2Image, &json!({ "prompt": "p" }))
		.await
		.expect("Raw image call should succeed.");

	assert_eq!(raw["object"], "image");
	assert_eq!(transport.token_calls(), 0);

	let query = transport.requests.lock()[0].url.query().map(str::to_owned);

	assert_eq!(query.as_deref(), Some("access_token=24.primed"));
}

#[tokio::test]
async fn network_failures_leave_the_cache_empty() {
	let transport = Arc::new(RoutingTransport::offline());
	let client = client(&transport);
	let err = client.chat(&hello(), None).await.expect_err("Offline transport must fail.");

	match err {
		Error::Transport(TransportError::Network { url, .. }) => {
			assert_eq!(url, "https://auth.example.com/oauth/2.0/token");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(client.tokens().state(), TokenState::Missing);
	assert_eq!(client.tokens().metrics().failures(), 1);
	assert_eq!(transport.paths().len(), 1);
}
