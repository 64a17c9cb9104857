//! Text-generation providers used for query parsing and response writing.

/// Canned-response provider for tests.
pub mod mock;
/// Local Ollama provider.
pub mod ollama;
/// OpenAI-compatible chat completions provider.
pub mod openai;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
