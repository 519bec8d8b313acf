//! # Overview
//!
//! A MegaHAL-style conversational text generator: free-form text is folded
//! into a pair of fixed-order N-gram tries (forward and backward) over
//! interned tokens, and a reply to an utterance is produced by walking both
//! tries outward from a keyword and scoring the candidates that fall out
//! against the very distribution that generated them.
//!
//! # Usage
//!
//! ```
//! use megahal::{Config, Model};
//!
//! let mut model = Model::new(Config::default());
//! model.learn("The cat sat on the mat and looked out the window.");
//! let reply = model.reply("Tell me about cats", Default::default());
//! assert!(!reply.is_empty());
//! ```
//!
//! # Training
//!
//! A model starts out empty (`Model::new`) and accumulates state purely
//! through [`Model::learn`]. There is no separate "trained" vs. "untrained"
//! mode: every call to [`Model::converse`] both learns from and replies to
//! its input.

pub mod babble;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod keyword;
pub mod learner;
pub mod lexicon;
pub mod model;
pub mod reconstruct;
pub mod storage;
pub mod symbol;
pub mod tokenizer;
pub mod trie;

pub use config::{Config, ReplyBudget};
pub use error::MegahalError;
pub use model::{LearnReport, Model};

/// The reply returned when the model has not learned enough to say anything.
pub const FALLBACK: &str = "I don't know enough to answer you yet!";
