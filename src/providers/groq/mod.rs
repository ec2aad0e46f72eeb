//! Groq provider (OpenAI-compatible Chat Completions API).

pub mod client;
pub mod types;

pub use client::{GroqProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
