//! Backends behind the mapper: text embeddings and chat completion.

pub mod completion;
pub mod embeddings;
pub mod hashing;
