// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Generates a candidate reply by walking the forward and backward tries
//! outward from an anchor symbol.
//!
//! A reply is seeded with one symbol -- a keyword, chosen uniformly at
//! random from the keyword set, or (if there are no keywords) a symbol
//! sampled from the forward root weighted by `usage`. Forward extension
//! then repeatedly looks up the deepest node reachable by the trailing
//! `order` symbols of the reply so far and samples a child weighted by
//! `usage`, appending until `<FIN>` is drawn or the hard cap is hit;
//! backward extension is the mirror image, prepending instead of
//! appending. At each step, if an unused keyword is available as a
//! sibling of the sampled symbol, it is substituted in -- each keyword
//! biases generation at most once per reply.

use std::collections::HashSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::config::MAX_REPLY_TOKENS;
use crate::symbol::FIN;
use crate::trie::{Trie, ROOT};

/// Picks a child of `node_id` weighted by the child's `usage`, returning
/// its `(symbol, child_id)`. Children are sorted by symbol id before
/// sampling so the result only depends on `(model, rng state)`, never on
/// the arena's hash-map iteration order.
fn sample_weighted_child(trie: &Trie, node_id: u32, rng: &mut impl Rng) -> Option<(u32, u32)> {
    let children = trie.sorted_children(node_id);
    if children.is_empty() {
        return None;
    }
    let weights: Vec<u64> = children.iter().map(|&(_, cid)| trie.node(cid).usage).collect();
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(children[dist.sample(rng)])
}

/// If an unused keyword is among `node_id`'s children, prefer it over the
/// symbol that was actually sampled; otherwise keep the sampled symbol.
fn apply_keyword_bias(trie: &Trie, node_id: u32, sampled: u32, keywords: &[u32], used: &HashSet<u32>) -> u32 {
    if keywords.contains(&sampled) && !used.contains(&sampled) {
        return sampled;
    }
    trie.sorted_children(node_id)
        .into_iter()
        .find(|&(sym, _)| keywords.contains(&sym) && !used.contains(&sym))
        .map(|(sym, _)| sym)
        .unwrap_or(sampled)
}

fn pick_anchor(forward: &Trie, keywords: &[u32], rng: &mut impl Rng) -> Option<u32> {
    if !keywords.is_empty() {
        let idx = rng.gen_range(0..keywords.len());
        return Some(keywords[idx]);
    }
    sample_weighted_child(forward, ROOT, rng).map(|(sym, _)| sym)
}

/// The trailing context used to look up the forward trie: the last
/// `min(order, reply.len())` symbols, in order.
fn forward_context(reply: &[u32], order: usize) -> &[u32] {
    let take = order.min(reply.len());
    &reply[reply.len() - take..]
}

/// The leading context used to look up the backward trie: the first
/// `min(order, reply.len())` symbols, reversed -- mirroring how `learner`
/// builds backward windows from `[<FIN>] ++ reverse(sentence)`.
fn backward_context(reply: &[u32], order: usize) -> Vec<u32> {
    let take = order.min(reply.len());
    reply[..take].iter().rev().copied().collect()
}

/// Generates one candidate reply. Returns an empty reply if there is
/// nothing to anchor on (empty keyword set and an empty forward trie).
pub fn generate(forward: &Trie, backward: &Trie, keywords: &[u32], order: usize, rng: &mut impl Rng) -> Vec<u32> {
    let Some(anchor) = pick_anchor(forward, keywords, rng) else {
        return Vec::new();
    };

    let mut reply = vec![anchor];
    let mut used = HashSet::new();
    if keywords.contains(&anchor) {
        used.insert(anchor);
    }

    while reply.len() < MAX_REPLY_TOKENS {
        let context = forward_context(&reply, order).to_vec();
        let ids = forward.walk(&context);
        let node_id = *ids.last().expect("walk always visits at least the root");
        let Some((sampled, _)) = sample_weighted_child(forward, node_id, rng) else {
            break;
        };
        let symbol = apply_keyword_bias(forward, node_id, sampled, keywords, &used);
        if symbol == FIN {
            break;
        }
        reply.push(symbol);
        if keywords.contains(&symbol) {
            used.insert(symbol);
        }
    }

    while reply.len() < MAX_REPLY_TOKENS {
        let context = backward_context(&reply, order);
        let ids = backward.walk(&context);
        let node_id = *ids.last().expect("walk always visits at least the root");
        let Some((sampled, _)) = sample_weighted_child(backward, node_id, rng) else {
            break;
        };
        let symbol = apply_keyword_bias(backward, node_id, sampled, keywords, &used);
        if symbol == FIN {
            break;
        }
        reply.insert(0, symbol);
        if keywords.contains(&symbol) {
            used.insert(symbol);
        }
    }

    reply
}
