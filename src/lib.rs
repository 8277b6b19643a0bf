//! Legalizer core: extract text from PDF legal documents and run
//! AI-backed analysis operations over it.
//!
//! Pipeline: PDF bytes → [`extract`] → document text held in a
//! [`session::DocumentSession`] → [`prompts`] templates → [`ai_client`]
//! dispatch → [`section_parser`] / [`classification`] post-processing.

pub mod ai_client;
pub mod analyzer;
pub mod classification;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod section_parser;
pub mod session;
pub mod settings;
