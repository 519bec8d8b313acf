// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turns a symbol sequence back into a sentence-cased, terminally
//! punctuated string.
//!
//! `<ERROR>`/`<FIN>` sentinels are dropped before rendering. Words get a
//! preceding space (except the first token); punctuation never does.
//! Stored symbols are uppercase, but the rendered text is lowercased
//! except for the first alphabetic character, which is the only case
//! spec.md actually constrains.

use crate::symbol::{SymbolTable, ERROR, FIN};

fn is_word(text: &str) -> bool {
    text.chars().next().map(char::is_alphanumeric).unwrap_or(false)
}

fn uppercase_first_alpha(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut done = false;
    for c in s.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

fn ensure_terminal_punctuation(s: &mut String) {
    let end = s.trim_end().len();
    s.truncate(end);
    match s.chars().last() {
        Some('.') | Some('!') | Some('?') => {}
        _ => s.push('.'),
    }
}

/// Renders `ids` as a sentence. Returns an empty string if `ids` contains
/// nothing but sentinels.
pub fn reconstruct(ids: &[u32], symbols: &SymbolTable) -> String {
    let mut out = String::new();

    for &id in ids {
        if id == ERROR || id == FIN {
            continue;
        }
        let raw = symbols.word_of(id);
        if is_word(raw) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&raw.to_lowercase());
        } else {
            out.push_str(raw);
        }
    }

    if out.is_empty() {
        return out;
    }

    let mut out = uppercase_first_alpha(&out);
    ensure_terminal_punctuation(&mut out);
    out
}
