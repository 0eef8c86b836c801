//! Language-model reasoner implementations.
//!
//! Currently one production implementation: [`MistralReasoner`], speaking
//! the Mistral chat-completions API (OpenAI-compatible wire format, so it
//! also works against any endpoint that speaks that dialect).

pub mod mistral;

pub use mistral::MistralReasoner;
