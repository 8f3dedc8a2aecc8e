//! Real provider implementations behind the trait seams.

pub mod groq;
pub mod serpapi;

pub use groq::GroqChat;
pub use serpapi::{RateGate, SerpApiClient, CALLS_PER_MINUTE};
