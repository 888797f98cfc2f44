//! Lead Generation API Library
//!
//! This library provides the core functionality for the lead generation
//! API: lead CRUD over Postgres, the LLM-backed analysis pipeline, lead
//! scoring, data models, and HTTP handlers.
//!
//! # Modules
//!
//! - `analysis`: Lead analysis pipeline (prompt -> LLM -> parse -> score -> write).
//! - `config`: Configuration management.
//! - `db`: Database connection and schema bootstrap.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `llm_client`: Chat model capability and OpenAI client.
//! - `models`: Core data models.
//! - `prompts`: LLM prompt constants and builders.
//! - `scoring`: Lead scoring function.
//! - `store`: Lead persistence capability and Postgres implementation.

// Re-export primary modules for shared use in tests and other binaries
pub mod analysis;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod llm_client;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod store;
