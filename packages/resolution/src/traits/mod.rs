//! Trait seams the pipeline is generic over.
//!
//! The original tool reached for module-level service singletons; here the
//! search backend and the language model are explicit, injected components
//! so a batch can run against fakes in tests.

pub mod chat;
pub mod searcher;

pub use chat::ChatModel;
pub use searcher::SearchProvider;
