//! Shabd - English to Hindi Phrase-Based Lookup Translation
//! 
//! A deterministic dictionary and phrase substitution engine. Word and phrase tables are
//! derived from labeled English/Hindi sentence pairs and persisted as JSON documents.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod store;
pub mod text;
pub mod training;
pub mod workflow;
