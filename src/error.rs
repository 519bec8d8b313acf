// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types propagated across the crate's public surface.
//!
//! Per the ordinary operation of `learn`/`reply`/`greet`/`converse`, no
//! error ever escapes: an empty model falls back to [`crate::FALLBACK`],
//! short input is a silent no-op, unknown keywords are dropped, and an
//! exhausted search budget returns the best candidate seen (or the
//! fallback). [`MegahalError`] exists only for the snapshot round-trip
//! (`Model::save`/`Model::load`), where storage-level failures are
//! propagated verbatim rather than swallowed.

use thiserror::Error;

/// Errors surfaced by persistence operations.
#[derive(Debug, Error)]
pub enum MegahalError {
    /// The underlying reader/writer failed.
    #[error("storage I/O error: {0}")]
    Storage(#[from] std::io::Error),

    /// A persisted snapshot was well-formed JSON but violated an invariant
    /// the model relies on (e.g. a trie node referencing an unknown
    /// symbol, or a symbol table missing the reserved sentinels).
    #[error("corrupt persisted state: {0}")]
    CorruptState(String),

    /// The snapshot could not be parsed as JSON at all.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}
