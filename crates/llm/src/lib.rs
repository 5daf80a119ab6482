pub mod dataset;
pub mod demo;
pub mod engine;
pub mod error_answer;
pub mod normalize;
pub mod prompt;
pub mod providers;
pub mod schema;

pub use dataset::SampleData;
pub use engine::AskEngine;
pub use schema::{AskRequest, AskResponse, Confidence, ErrorCode, Evidence, Source};
