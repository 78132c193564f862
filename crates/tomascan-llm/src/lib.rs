//! Tomascan LLM
//!
//! Chat-completions client for the agronomy assistant persona, plus the
//! prompt builders for chat, disease detail, and treatment suggestions.

pub mod client;
pub mod prompts;

pub use client::{ChatClient, ChatMessage, ChatSettings, DEFAULT_API_URL, DEFAULT_MODEL};
pub use prompts::SuggestionLanguage;
