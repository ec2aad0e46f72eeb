//! Provider implementations for remote text-generation services.

pub mod groq;

// Re-export commonly used provider types
pub use groq::GroqProvider;
