// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Updates both tries with the context windows of a single learned line.
//!
//! A line shorter than `order + 1` tokens is a no-op: neither trie is
//! touched. Otherwise the line is conceptually terminated with `<FIN>`
//! (forward) or started with `<FIN>` (backward), and every window of
//! `order + 1` symbols along the resulting sequence is inserted.

use crate::symbol::FIN;
use crate::trie::Trie;

/// Applies one line's symbols to both tries. Returns the line length `L`
/// if the line was long enough to learn from (`L > order`), or `None` if
/// it was skipped -- in which case neither trie was modified.
pub fn learn_line(forward: &mut Trie, backward: &mut Trie, symbols: &[u32], order: usize) -> Option<usize> {
    let len = symbols.len();
    if len <= order {
        return None;
    }

    let mut extended_forward = Vec::with_capacity(len + 1);
    extended_forward.extend_from_slice(symbols);
    extended_forward.push(FIN);

    let mut extended_backward = Vec::with_capacity(len + 1);
    extended_backward.push(FIN);
    extended_backward.extend(symbols.iter().rev().copied());

    for window in extended_forward.windows(order + 1) {
        forward.insert_path(window);
    }
    for window in extended_backward.windows(order + 1) {
        backward.insert_path(window);
    }

    Some(len)
}
