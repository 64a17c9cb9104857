//! Answers natural-language questions about GitHub repositories.
//!
//! An [`Agent`] parses a question, asks a [`repoquery_core::RepositoryProvider`]
//! for the matching repositories and renders an answer, either through a
//! text-generation provider or from built-in templates.

/// Orchestration and replies
pub mod agent;
/// Conversation memory
pub mod context;
/// Intent dispatch
pub mod handlers;
/// Response generation
pub mod render;
/// Template answers
pub mod templates;

pub use agent::{Agent, AgentReply, ReplyMetadata};
pub use context::{ConversationContext, HistoryEntry};
pub use handlers::AnalysisData;
pub use render::ResponseGenerator;
