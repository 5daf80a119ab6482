pub mod env;
pub mod llm;
pub mod tracing_init;

pub use env::AppConfig;
pub use llm::{mask_key, FallbackPolicy, LlmConfig, LlmProvider, OllamaConfig, OpenAiConfig};
pub use tracing_init::init_tracing;
