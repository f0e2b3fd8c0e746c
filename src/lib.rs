//! # taxonomy-mapper
//!
//! Maps a short story (plus free-form user tags) onto a fixed two-level
//! taxonomy of genre → subgenre. A small retrieval step picks the taxonomy
//! labels closest to the story, a hosted language model chooses the final
//! pair, and a keyword classifier answers whenever the model cannot.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │   tags + story (POST)    │
//!                 └────────────┬─────────────┘
//!                              ▼
//!                 ┌──────────────────────────┐
//!                 │ Context retrieval (top k │
//!                 │ "Genre -> Sub" labels)   │
//!                 └────────────┬─────────────┘
//!                              │
//!              LLM configured? │
//!            ┌─── yes ─────────┴────────── no ───┐
//!            ▼                                   │
//!   ┌──────────────────┐                         │
//!   │  Prompted LLM    │── error / bad JSON ──┐  │
//!   │  (temperature 0) │                      │  │
//!   └────────┬─────────┘                      ▼  ▼
//!            ▼                      ┌──────────────────────┐
//!   ┌──────────────────┐            │ Keyword fallback     │
//!   │ Taxonomy check   │            │ (ordered rules,      │
//!   │ (coerce UNMAPPED)│            │  first match wins)   │
//!   └────────┬─────────┘            └──────────┬───────────┘
//!            └───────────────┬─────────────────┘
//!                            ▼
//!               { genre, subgenre, reasoning }
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, retrieval and backends
//! - [`models`] - `MappingResult`, the `UNMAPPED` sentinel, request/response types
//! - [`taxonomy`] - Immutable genre → subgenre store with invariant checks
//! - [`llm::embeddings`] - `Embedder` trait and Ollama / OpenAI-compatible embedding clients
//! - [`llm::hashing`] - Local feature-hashing embedder used by default
//! - [`llm::completion`] - `LanguageModel` trait and the chat-completion client
//! - [`search::vector`] - In-memory label index with cosine similarity
//! - [`search::retriever`] - Top-k taxonomy context for a story
//! - [`mapper`] - The decision engine: prompt, reply validation and keyword fallback
//! - [`error`] - Typed errors for the mapping path and taxonomy construction
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared, read-only application state

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod mapper;
pub mod models;
pub mod search;
pub mod state;
pub mod taxonomy;
