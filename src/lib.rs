//! An HTTP service that asks a hosted LLM who the modern-day equivalent of a
//! cricket player is.
//!
//! Each request runs a fixed sequence: the player name is substituted into a
//! two-turn chat template, the prompt is sent to a Groq-hosted model, and the
//! completion text is returned as-is.

pub mod error;
pub mod types;
pub mod provider;
pub mod providers;
pub mod response;
pub mod template;
pub mod parser;
pub mod chain;
pub mod config;
pub mod cli;
pub mod logger;
pub mod server;

// Re-export core types for easy usage
pub use error::Error;
pub use types::*;
pub use provider::LLMProvider;
pub use providers::*;
pub use response::*;
pub use template::ChatPromptTemplate;
pub use parser::StrOutputParser;
pub use chain::{ChainInput, EquivalenceChain};
pub use config::{ServerConfig, Settings};
