//! Label index and context retrieval.

pub mod retriever;
pub mod vector;
