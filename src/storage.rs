// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The logical relations a persistence layer must expose, independent of
//! whatever physical layout the in-memory arena actually uses:
//! `symbols(id, word)`, `trie_nodes(id, tree, parent_id, symbol, usage,
//! count)`, and the four lexicon sets. [`ModelSnapshot`] is the
//! JSON-serializable union of all of them, used by `Model::save`/`load`.

use serde::{Deserialize, Serialize};

use crate::error::MegahalError;
use crate::lexicon::Lexicon;
use crate::symbol::SymbolTable;
use crate::trie::{NodeRecord, Tree, Trie};

/// One row of the `symbols` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRow {
    pub id: u32,
    pub word: String,
}

/// One row of the `trie_nodes` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNodeRow {
    pub id: u32,
    pub tree: String,
    pub parent_id: Option<u32>,
    pub symbol: u32,
    pub usage: u64,
    pub count: u64,
}

/// A snapshot of the four lexicon sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconSnapshot {
    pub banned: Vec<String>,
    pub aux: Vec<String>,
    pub greeting: Vec<String>,
    pub swap: Vec<(String, String)>,
}

/// The whole persisted state of a [`crate::Model`], suitable for JSON
/// round-tripping via `serde_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub order: usize,
    pub symbols: Vec<SymbolRow>,
    pub trie_nodes: Vec<TrieNodeRow>,
    pub lexicon: LexiconSnapshot,
}

pub fn dump_symbols(table: &SymbolTable) -> Vec<SymbolRow> {
    table.iter().map(|(id, word)| SymbolRow { id, word: word.to_owned() }).collect()
}

pub fn dump_trie(trie: &Trie) -> Vec<TrieNodeRow> {
    let tag = trie.tree().as_str().to_owned();
    trie.to_records()
        .into_iter()
        .map(|r| TrieNodeRow {
            id: r.id,
            tree: tag.clone(),
            parent_id: r.parent_id,
            symbol: r.symbol,
            usage: r.usage,
            count: r.count,
        })
        .collect()
}

pub fn dump_lexicon(lexicon: &Lexicon) -> LexiconSnapshot {
    LexiconSnapshot {
        banned: lexicon.banned_words().map(str::to_owned).collect(),
        aux: lexicon.aux_words().map(str::to_owned).collect(),
        greeting: lexicon.greeting_words().map(str::to_owned).collect(),
        swap: lexicon.swap_pairs().map(|(f, t)| (f.to_owned(), t.to_owned())).collect(),
    }
}

/// Rebuilds a [`SymbolTable`] from id-ordered rows, verifying the two
/// reserved sentinels land where they must.
pub fn rebuild_symbols(rows: &[SymbolRow]) -> Result<SymbolTable, MegahalError> {
    let mut table = SymbolTable::new();
    for (expected_id, row) in rows.iter().enumerate() {
        if row.id as usize != expected_id {
            return Err(MegahalError::CorruptState(format!(
                "symbol rows must be in id order, got id {} at position {expected_id}",
                row.id
            )));
        }
        match expected_id {
            0 if row.word != "<ERROR>" => {
                return Err(MegahalError::CorruptState("id 0 must be <ERROR>".to_owned()))
            }
            1 if row.word != "<FIN>" => {
                return Err(MegahalError::CorruptState("id 1 must be <FIN>".to_owned()))
            }
            0 | 1 => {}
            _ => {
                let interned = table.intern(&row.word);
                if interned != row.id {
                    return Err(MegahalError::CorruptState(format!(
                        "word {:?} re-interned to {interned}, expected {}",
                        row.word, row.id
                    )));
                }
            }
        }
    }
    Ok(table)
}

pub fn rebuild_trie(tree: Tree, rows: &[TrieNodeRow]) -> Result<Trie, MegahalError> {
    let records: Vec<NodeRecord> = rows
        .iter()
        .map(|r| NodeRecord {
            id: r.id,
            parent_id: r.parent_id,
            symbol: r.symbol,
            usage: r.usage,
            count: r.count,
        })
        .collect();
    Trie::from_records(tree, &records).map_err(MegahalError::CorruptState)
}

pub fn rebuild_lexicon(snapshot: &LexiconSnapshot) -> Lexicon {
    let mut lexicon = Lexicon::new();
    for w in &snapshot.banned {
        lexicon.load_banned(w);
    }
    for w in &snapshot.aux {
        lexicon.load_aux(w);
    }
    for w in &snapshot.greeting {
        lexicon.load_greeting(w);
    }
    let swap_text: String = snapshot.swap.iter().map(|(f, t)| format!("{f} {t}\n")).collect();
    lexicon.load_swap(&swap_text);
    lexicon
}

/// Splits a flat `trie_nodes` dump back into its forward/backward rows,
/// by the `tree` tag.
pub fn partition_trie_rows(rows: &[TrieNodeRow]) -> (Vec<TrieNodeRow>, Vec<TrieNodeRow>) {
    let mut forward = Vec::new();
    let mut backward = Vec::new();
    for row in rows {
        if row.tree == Tree::Forward.as_str() {
            forward.push(row.clone());
        } else {
            backward.push(row.clone());
        }
    }
    (forward, backward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Tree;

    #[test]
    fn symbol_round_trip() {
        let mut table = SymbolTable::new();
        table.intern("CAT");
        table.intern("DOG");

        let rows = dump_symbols(&table);
        let rebuilt = rebuild_symbols(&rows).unwrap();

        assert_eq!(rebuilt.len(), table.len());
        assert_eq!(rebuilt.id_of("CAT"), table.id_of("CAT"));
        assert_eq!(rebuilt.id_of("DOG"), table.id_of("DOG"));
    }

    #[test]
    fn rejects_tampered_sentinel() {
        let rows = vec![SymbolRow { id: 0, word: "NOT_ERROR".to_owned() }];
        assert!(rebuild_symbols(&rows).is_err());
    }

    #[test]
    fn trie_round_trip_through_rows() {
        let mut trie = Trie::new(Tree::Forward);
        trie.insert_path(&[2, 3, 4]);

        let rows = dump_trie(&trie);
        assert!(rows.iter().all(|r| r.tree == "F"));

        let rebuilt = rebuild_trie(Tree::Forward, &rows).unwrap();
        assert_eq!(rebuilt.root().usage, trie.root().usage);
    }

    #[test]
    fn lexicon_round_trip() {
        let mut lexicon = Lexicon::new();
        lexicon.load_banned("spam\n");
        lexicon.load_swap("you me\n");

        let snapshot = dump_lexicon(&lexicon);
        let rebuilt = rebuild_lexicon(&snapshot);

        assert!(rebuilt.is_banned("SPAM"));
        assert_eq!(rebuilt.swap_target("YOU"), Some("ME"));
    }
}
