// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The stateful model and its four public operations: `learn`, `reply`,
//! `greet`, `converse`. Everything upstream (tokenizer, interner, tries,
//! keyword selection, babble, evaluator, reconstructor) is pure; `Model`
//! is where their state lives and where the candidate-search loop of
//! spec.md §4.7 is driven.

use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::babble;
use crate::config::Config;
use crate::error::MegahalError;
use crate::evaluator;
use crate::keyword;
use crate::learner::learn_line;
use crate::lexicon::Lexicon;
use crate::reconstruct::reconstruct;
use crate::storage::{self, LexiconSnapshot, ModelSnapshot, SymbolRow, TrieNodeRow};
use crate::symbol::SymbolTable;
use crate::tokenizer::{tokenize, Tok};
use crate::trie::{Tree, Trie};
use crate::ReplyBudget;
use crate::FALLBACK;

/// The outcome of a [`Model::learn`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LearnReport {
    /// Sum of the lengths of every learned line.
    pub tokens_learned: u64,
    /// Lines long enough to learn from (`length > order`).
    pub lines_learned: u64,
    /// Every non-empty, non-comment line seen, learned or not.
    pub lines_processed: u64,
}

/// The full conversational model: symbol table, lexicon, and the forward
/// and backward tries, plus the one piece of mutable external state
/// (the RNG) that generation draws on.
pub struct Model {
    config: Config,
    symbols: SymbolTable,
    lexicon: Lexicon,
    forward: Trie,
    backward: Trie,
    rng: StdRng,
}

impl Model {
    /// Builds a fresh, empty model. `greet`/`reply` on a fresh model
    /// return [`crate::FALLBACK`] until enough has been learned.
    pub fn new(config: Config) -> Model {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Model {
            config,
            symbols: SymbolTable::new(),
            lexicon: Lexicon::new(),
            forward: Trie::new(Tree::Forward),
            backward: Trie::new(Tree::Backward),
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    /// Folds `text` into both tries, one line at a time. Comment lines
    /// (first non-whitespace character `#`) and blank lines are skipped
    /// entirely -- not even counted in `lines_processed`. A line with
    /// `order` tokens or fewer is counted in `lines_processed` but not
    /// `lines_learned`/`tokens_learned`.
    pub fn learn(&mut self, text: &str) -> LearnReport {
        let mut report = LearnReport::default();

        for raw_line in text.lines() {
            let stripped = raw_line.trim();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }
            report.lines_processed += 1;

            let toks = tokenize(stripped);
            let ids: Vec<u32> = toks.iter().map(|t| self.symbols.intern(t.as_str())).collect();

            if let Some(len) = learn_line(&mut self.forward, &mut self.backward, &ids, self.config.order) {
                report.lines_learned += 1;
                report.tokens_learned += len as u64;
            }
        }

        debug!(
            "learn: processed {} lines, learned {} ({} tokens), vocabulary now {} symbols",
            report.lines_processed,
            report.lines_learned,
            report.tokens_learned,
            self.symbols.len()
        );
        report
    }

    /// Generates a reply to `text` within `budget`, without learning from
    /// it. Falls back to [`crate::FALLBACK`] if the model knows nothing or
    /// every candidate was rejected.
    pub fn reply(&mut self, text: &str, budget: ReplyBudget) -> String {
        let tokens = tokenize(text);
        let keywords = keyword::select_keywords(&tokens, &self.symbols, &self.lexicon);
        trace!("reply: selected {} keyword(s)", keywords.len());
        self.search(keywords, Some((&tokens, text)), budget)
    }

    /// Picks a random known greeting word and generates a reply anchored
    /// on it. Returns [`crate::FALLBACK`] verbatim if no greeting word is
    /// known to the model yet.
    pub fn greet(&mut self) -> String {
        let known: Vec<u32> = self
            .lexicon
            .greeting_words()
            .filter_map(|w| self.symbols.id_of(w))
            .collect();

        let Some(&chosen) = (if known.is_empty() {
            None
        } else {
            Some(&known[self.rng.gen_range(0..known.len())])
        }) else {
            info!("greet: no known greeting word, returning fallback");
            return FALLBACK.to_owned();
        };

        let budget = self.config.reply_budget;
        self.search(vec![chosen], None, budget)
    }

    /// Learns from `text`, then replies to it using the configured
    /// default budget. Both effects happen regardless of whether a
    /// non-fallback reply is produced.
    pub fn converse(&mut self, text: &str) -> String {
        self.learn(text);
        let budget = self.config.reply_budget;
        self.reply(text, budget)
    }

    /// Drives the candidate search loop of spec.md §4.7: generate, reject
    /// echoes, score, keep the best. `reject` carries the original
    /// utterance's tokens and raw text when called from `reply` (for
    /// echo rejection); `greet` passes `None` since there is no utterance
    /// to echo.
    fn search(&mut self, keywords: Vec<u32>, reject: Option<(&[Tok], &str)>, budget: ReplyBudget) -> String {
        if self.symbols.len() <= 2 {
            // Only the sentinels are known -- nothing has been learned.
            return FALLBACK.to_owned();
        }

        let mut best: Option<(Vec<u32>, f64)> = None;
        let deadline_start = Instant::now();
        let mut iterations = 0u32;

        loop {
            match budget {
                ReplyBudget::Iterations(limit) if iterations >= limit => break,
                ReplyBudget::WallClockMillis(ms) if deadline_start.elapsed().as_millis() as u64 >= ms => break,
                _ => {}
            }
            iterations += 1;

            let candidate = babble::generate(&self.forward, &self.backward, &keywords, self.config.order, &mut self.rng);
            if candidate.is_empty() {
                continue;
            }

            if let Some((utter_tokens, utter_text)) = reject {
                if is_echo(&candidate, utter_tokens, utter_text, &self.symbols) {
                    continue;
                }
            }

            let candidate_score = evaluator::score(&self.forward, &self.backward, &candidate, &keywords, self.config.order);

            let better = match &best {
                Some((_, best_score)) => candidate_score > *best_score,
                None => true,
            };
            if better {
                best = Some((candidate, candidate_score));
            }
        }

        match best {
            Some((ids, _)) => reconstruct(&ids, &self.symbols),
            None => {
                warn!("search: no candidate survived rejection after {iterations} iteration(s)");
                FALLBACK.to_owned()
            }
        }
    }

    // -- persisted-state view (spec.md §6), for tests --------------------

    pub fn symbols(&self) -> Vec<SymbolRow> {
        storage::dump_symbols(&self.symbols)
    }

    pub fn trie_nodes(&self) -> Vec<TrieNodeRow> {
        let mut rows = storage::dump_trie(&self.forward);
        rows.extend(storage::dump_trie(&self.backward));
        rows
    }

    pub fn lexicon_snapshot(&self) -> LexiconSnapshot {
        storage::dump_lexicon(&self.lexicon)
    }

    /// Serializes the full model state (symbols, both tries, lexicon) as
    /// JSON. The RNG's internal state is not persisted: a loaded model
    /// draws a fresh seed from `config.seed`/OS entropy, same as `new`.
    pub fn save(&self) -> Result<String, MegahalError> {
        let snapshot = ModelSnapshot {
            order: self.config.order,
            symbols: self.symbols(),
            trie_nodes: self.trie_nodes(),
            lexicon: self.lexicon_snapshot(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuilds a model from a [`Model::save`] snapshot.
    pub fn load(json: &str, config: Config) -> Result<Model, MegahalError> {
        let snapshot: ModelSnapshot = serde_json::from_str(json)?;
        let symbols = storage::rebuild_symbols(&snapshot.symbols)?;
        let (forward_rows, backward_rows) = storage::partition_trie_rows(&snapshot.trie_nodes);
        let forward = storage::rebuild_trie(Tree::Forward, &forward_rows)?;
        let backward = storage::rebuild_trie(Tree::Backward, &backward_rows)?;
        let lexicon = storage::rebuild_lexicon(&snapshot.lexicon);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Model { config, symbols, lexicon, forward, backward, rng })
    }
}

/// A candidate reply is an echo of the utterance if its word symbols
/// match the utterance's word tokens case-insensitively and
/// punctuation-insensitively, or if the reconstructed text matches the
/// utterance verbatim up to case and surrounding whitespace.
fn is_echo(candidate: &[u32], utterance_tokens: &[Tok], utterance_text: &str, symbols: &SymbolTable) -> bool {
    let candidate_words: Vec<&str> = candidate
        .iter()
        .map(|&id| symbols.word_of(id))
        .filter(|w| w.chars().next().map(char::is_alphanumeric).unwrap_or(false))
        .collect();
    let utterance_words: Vec<&str> = utterance_tokens
        .iter()
        .filter_map(|t| if let Tok::Word(w) = t { Some(w.as_str()) } else { None })
        .collect();

    if candidate_words == utterance_words {
        return true;
    }

    let reconstructed = reconstruct(candidate, symbols);
    reconstructed.trim().eq_ignore_ascii_case(utterance_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplyBudget;

    fn trained_model() -> Model {
        let mut model = Model::new(Config { order: 3, seed: Some(1), ..Config::default() });
        let corpus = "\
The cat sat on the mat and looked out the window.
Dogs are wonderful pets and good friends.
Birds can fly very high in the sky above the trees.
Fish swim in the ocean and in rivers every day.
The weather is nice today and the sun is warm.
I like to read books about animals and nature.
The sun rises in the east and sets in the west.";
        model.learn(corpus);
        model
    }

    #[test]
    fn fresh_model_greet_is_fallback() {
        let mut model = Model::new(Config::default());
        assert_eq!(model.greet(), FALLBACK);
    }

    #[test]
    fn fresh_model_converse_with_short_input_is_fallback() {
        let mut model = Model::new(Config::default());
        assert_eq!(model.converse("hi"), FALLBACK);
    }

    #[test]
    fn learn_reports_counts() {
        let mut model = Model::new(Config::default());
        let report = model.learn("The cat sat on the mat.");
        assert!(report.tokens_learned > 0);
        assert_eq!(report.lines_learned, 1);
        assert_eq!(report.lines_processed, 1);
    }

    #[test]
    fn short_line_reports_zero_but_is_processed() {
        let mut model = Model::new(Config::default());
        let report = model.learn("hi");
        assert_eq!(report.tokens_learned, 0);
        assert_eq!(report.lines_learned, 0);
        assert_eq!(report.lines_processed, 1);
    }

    #[test]
    fn comments_and_blanks_are_skipped_even_from_processed_count() {
        let mut model = Model::new(Config::default());
        let report = model.learn("# comment\n\nHello world there friend today.\n");
        assert!(report.tokens_learned > 0);
        assert_eq!(report.lines_learned, 1);
        assert_eq!(report.lines_processed, 1);
    }

    #[test]
    fn bulk_learning_matches_per_line_learning() {
        let lines = [
            "The cat sat on the mat.",
            "# This comment should be skipped.",
            "Dogs are wonderful pets.",
            "",
            "Birds can fly very high in the sky.",
            "hi",
            "Fish swim in the ocean and in rivers.",
        ];

        let mut bulk = Model::new(Config::default());
        bulk.learn(&lines.join("\n"));

        let mut individual = Model::new(Config::default());
        for line in lines {
            let stripped = line.trim();
            if !stripped.is_empty() && !stripped.starts_with('#') {
                individual.learn(stripped);
            }
        }

        let mut bulk_rows = bulk.trie_nodes();
        let mut individual_rows = individual.trie_nodes();
        bulk_rows.sort_by_key(|r| (r.tree.clone(), r.parent_id, r.symbol));
        individual_rows.sort_by_key(|r| (r.tree.clone(), r.parent_id, r.symbol));

        let bulk_usage_counts: Vec<(String, Option<u32>, u32, u64, u64)> =
            bulk_rows.iter().map(|r| (r.tree.clone(), r.parent_id, r.symbol, r.usage, r.count)).collect();
        let individual_usage_counts: Vec<(String, Option<u32>, u32, u64, u64)> =
            individual_rows.iter().map(|r| (r.tree.clone(), r.parent_id, r.symbol, r.usage, r.count)).collect();

        assert_eq!(bulk_usage_counts, individual_usage_counts);
    }

    #[test]
    fn reply_after_training_is_well_formed() {
        let mut model = trained_model();
        let reply = model.reply("hello there", ReplyBudget::Iterations(20));
        assert!(!reply.is_empty());
        let first_alpha = reply.chars().find(|c| c.is_alphabetic());
        assert_eq!(first_alpha.map(char::is_uppercase), Some(true));
        assert!(reply.trim_end().ends_with(['.', '!', '?']));
    }

    #[test]
    fn reply_never_echoes_the_utterance() {
        let mut model = trained_model();
        for seed in [1u64, 2, 3, 4] {
            let mut m = Model::new(Config { order: 3, seed: Some(seed), ..Config::default() });
            m.learn("The cat sat on the mat and looked out the window.");
            let reply = m.reply("The cat sat on the mat.", ReplyBudget::Iterations(30));
            assert_ne!(reply.to_uppercase(), "THE CAT SAT ON THE MAT.");
        }
    }

    #[test]
    fn converse_learns_and_replies() {
        let mut model = Model::new(Config::default());
        let reply = model.converse("The cat sat on the mat and looked out the window.");
        assert!(!reply.is_empty());
        assert!(model.trie_nodes().iter().any(|r| r.tree == "F" && r.parent_id.is_some()));
    }

    #[test]
    fn greet_after_training_is_nonempty() {
        let mut lexicon_model = trained_model();
        lexicon_model.lexicon_mut().load_greeting("hello\n");
        let greeting = lexicon_model.greet();
        assert!(!greeting.is_empty());
    }

    #[test]
    fn save_and_load_round_trip_preserves_reply_behavior() {
        let model = trained_model();
        let json = model.save().unwrap();

        let mut reloaded = Model::load(&json, Config { order: 3, seed: Some(99), ..Config::default() }).unwrap();
        assert_eq!(reloaded.symbols().len(), model.symbols().len());
        assert_eq!(reloaded.trie_nodes().len(), model.trie_nodes().len());

        let reply = reloaded.reply("hello", ReplyBudget::Iterations(10));
        assert!(!reply.is_empty());
    }

    #[test]
    fn load_rejects_corrupt_snapshot() {
        let bad = r#"{"order":5,"symbols":[{"id":0,"word":"NOPE"}],"trie_nodes":[],"lexicon":{"banned":[],"aux":[],"greeting":[],"swap":[]}}"#;
        assert!(Model::load(bad, Config::default()).is_err());
    }
}
