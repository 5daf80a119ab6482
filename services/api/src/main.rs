mod ask;
mod error;
mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use copilot_common::error::{CopilotError, CopilotResult};
use copilot_config::{init_tracing, AppConfig, LlmConfig};
use copilot_llm::providers::{OllamaClient, OpenAiClient};
use copilot_llm::{AskEngine, SampleData};
use tower_http::cors::{AllowOrigin, CorsLayer};

use rate_limit::RateLimiter;

pub type CopilotEngine = AskEngine<OpenAiClient, OllamaClient>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CopilotEngine>,
    pub llm: Arc<LlmConfig>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> CopilotResult<Self> {
        let openai = OpenAiClient::new(&config.llm.openai)
            .map_err(|e| CopilotError::Config(format!("failed to build openai client: {e}")))?;
        let engine = AskEngine::new(openai, OllamaClient::new(), SampleData::fixture());

        Ok(Self {
            engine: Arc::new(engine),
            llm: Arc::new(config.llm.clone()),
        })
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

fn build_router(state: AppState, config: &AppConfig) -> Router {
    let limiter = RateLimiter::per_minute(config.rate_limit_per_minute);

    Router::new()
        .route("/health", get(health))
        .merge(ask::router())
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);

    tracing::info!(
        service = "copilot-api",
        demo_mode = config.llm.demo_mode,
        provider = config.llm.provider.as_str(),
        fallback = ?config.llm.fallback,
        has_key = config.llm.openai.api_key().is_some(),
        "starting"
    );

    let state = AppState::from_config(&config).expect("failed to build app state");
    let app = build_router(state, &config);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
