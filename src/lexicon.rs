// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Read-only word lists that shape keyword selection: banned words, the
//! auxiliary (secondary) keyword set, greeting words, and the swap table.
//!
//! A fresh [`Lexicon`] is empty; loading is always explicit via
//! `load_banned`/`load_aux`/`load_greeting`/`load_swap`, each of which
//! takes already-read file text rather than a path, since file I/O is the
//! caller's job (see spec's Out-of-scope: bulk lexicon loading).

use std::collections::{HashMap, HashSet};

/// Parses a newline-delimited word list: blank lines and lines whose
/// first non-whitespace character is `#` are skipped, everything else is
/// trimmed and uppercased.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_ascii_uppercase())
        .collect()
}

/// Parses a two-column `from to` swap file under the same comment/blank
/// rules. Extra whitespace-separated columns on a line are ignored.
pub fn parse_swap_list(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let from = cols.next()?;
            let to = cols.next()?;
            Some((from.to_ascii_uppercase(), to.to_ascii_uppercase()))
        })
        .collect()
}

/// The four read-only lexicon tables.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    banned: HashSet<String>,
    aux: HashSet<String>,
    greeting: HashSet<String>,
    swap: HashMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn new() -> Lexicon {
        Lexicon::default()
    }

    pub fn load_banned(&mut self, text: &str) {
        self.banned.extend(parse_word_list(text));
    }

    pub fn load_aux(&mut self, text: &str) {
        self.aux.extend(parse_word_list(text));
    }

    pub fn load_greeting(&mut self, text: &str) {
        self.greeting.extend(parse_word_list(text));
    }

    /// Many-to-one swaps are allowed (`YOU -> I`, `YOU -> ME`); targets for
    /// a given source are kept sorted so lookup can resolve the
    /// lexicographically smallest target in O(log n).
    pub fn load_swap(&mut self, text: &str) {
        for (from, to) in parse_swap_list(text) {
            let targets = self.swap.entry(from).or_default();
            if let Err(idx) = targets.binary_search(&to) {
                targets.insert(idx, to);
            }
        }
    }

    pub fn is_banned(&self, word: &str) -> bool {
        self.banned.contains(word)
    }

    pub fn is_aux(&self, word: &str) -> bool {
        self.aux.contains(word)
    }

    pub fn greeting_words(&self) -> impl Iterator<Item = &str> {
        self.greeting.iter().map(String::as_str)
    }

    /// The lexicographically smallest swap target for `word`, per the
    /// pinned reference policy, or `None` if `word` has no swap entry.
    pub fn swap_target(&self, word: &str) -> Option<&str> {
        self.swap.get(word).and_then(|targets| targets.first()).map(String::as_str)
    }

    pub fn banned_words(&self) -> impl Iterator<Item = &str> {
        self.banned.iter().map(String::as_str)
    }

    pub fn aux_words(&self) -> impl Iterator<Item = &str> {
        self.aux.iter().map(String::as_str)
    }

    pub fn swap_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.swap
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_str(), to.as_str())))
    }
}
