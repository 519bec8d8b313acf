// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Chooses the keyword symbols that anchor and bias reply generation.
//!
//! Pipeline, per word token of the user utterance: apply [`Lexicon`]
//! swaps, drop banned words, then split survivors into a primary set
//! (content words) and a secondary set (auxiliary words). Unknown words
//! -- never interned during learning -- are excluded outright, since a
//! keyword that the model has never seen cannot anchor generation. The
//! primary set wins if non-empty; otherwise the secondary set is used;
//! otherwise there are no keywords at all.

use std::collections::HashSet;

use crate::lexicon::Lexicon;
use crate::symbol::SymbolTable;
use crate::tokenizer::Tok;

/// Selects keyword ids from an already-tokenized utterance. Ids are
/// returned in first-seen order with duplicates removed.
pub fn select_keywords(tokens: &[Tok], symbols: &SymbolTable, lexicon: &Lexicon) -> Vec<u32> {
    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    let mut seen_primary = HashSet::new();
    let mut seen_secondary = HashSet::new();

    for tok in tokens {
        let Tok::Word(word) = tok else { continue };

        let resolved = lexicon.swap_target(word).unwrap_or(word.as_str());

        if lexicon.is_banned(resolved) {
            continue;
        }

        let Some(id) = symbols.id_of(resolved) else { continue };

        if lexicon.is_aux(resolved) {
            if seen_secondary.insert(id) {
                secondary.push(id);
            }
        } else if seen_primary.insert(id) {
            primary.push(id);
        }
    }

    if !primary.is_empty() {
        primary
    } else {
        secondary
    }
}
