// Resume / job description matching engine.
// Tokenize → score → skill gap → annotate → rewrite. Everything here is pure
// and synchronous; handlers are the only async layer.

pub mod annotate;
pub mod engine;
pub mod handlers;
pub mod rewrite;
pub mod scoring;
pub mod session;
pub mod skill_gap;
pub mod tokenizer;

pub use engine::MatchEngine;
