//! recipe-client: the request orchestration side of dishdash.
//!
//! Decides between the text and image input paths, chains label extraction
//! into recipe generation through the recipe-service proxy, and renders the
//! result incrementally.

pub mod api;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod render;
pub mod upload;

pub use api::ProxyClient;
pub use error::{OrchestratorError, Stage};
pub use orchestrator::{InputPolicy, Orchestrator, RecipeResult};
pub use render::{BufferSink, OutputSink, TypewriterRenderer};
pub use upload::{ImageUpload, UploadBatch};
