// Copyright 2026 megahal-rs developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Splits raw text into uppercase word tokens and punctuation tokens.
//!
//! A line is processed left to right: whitespace is collapsed and never
//! emitted, a maximal run of letters/digits becomes a word (uppercased),
//! and a maximal run of non-alphanumeric, non-whitespace characters
//! becomes a punctuation token. If the last token of a non-empty line is a
//! word with no trailing punctuation, a synthetic `.` is appended so every
//! learned sentence has a terminator to anchor the backward trie on.

/// A single tokenizer output: either a word (already uppercased) or a run
/// of punctuation, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    Word(String),
    Punct(String),
}

impl Tok {
    pub fn as_str(&self) -> &str {
        match self {
            Tok::Word(s) => s,
            Tok::Punct(s) => s,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Tok::Word(_))
    }
}

/// Tokenizes a single line (no embedded newlines). Appends a synthetic `.`
/// if the line is non-empty and its last token is a bare word.
fn tokenize_line(line: &str) -> Vec<Tok> {
    let mut toks = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c.is_alphanumeric() {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_alphanumeric() {
                    word.push(c.to_ascii_uppercase());
                    chars.next();
                } else {
                    break;
                }
            }
            toks.push(Tok::Word(word));
        } else {
            let mut punct = String::new();
            while let Some(&c) = chars.peek() {
                if !c.is_whitespace() && !c.is_alphanumeric() {
                    punct.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            toks.push(Tok::Punct(punct));
        }
    }

    if matches!(toks.last(), Some(Tok::Word(_))) {
        toks.push(Tok::Punct(".".to_owned()));
    }

    toks
}

/// Tokenizes multi-line text, one `Vec<Tok>` per non-empty line. Empty
/// lines (after the newline split, before any trim) produce no entry at
/// all -- there is nothing to flush.
pub fn tokenize_lines(text: &str) -> Vec<Vec<Tok>> {
    text.lines()
        .map(tokenize_line)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Tokenizes the whole input as one flat stream, ignoring line
/// boundaries. Used where only a bag/sequence of tokens is needed (e.g.
/// the echo-rejection check in `Model::reply`), never for learning, which
/// must window per line.
pub fn tokenize(text: &str) -> Vec<Tok> {
    tokenize_lines(text).into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(toks: &[Tok]) -> Vec<&str> {
        toks.iter().map(Tok::as_str).collect()
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn splits_words_and_uppercases() {
        let toks = tokenize_line("the cat sat.");
        assert_eq!(words(&toks), vec!["THE", "CAT", "SAT", "."]);
    }

    #[test]
    fn collapses_whitespace_runs() {
        let toks = tokenize_line("the   cat\tsat.");
        assert_eq!(words(&toks), vec!["THE", "CAT", "SAT", "."]);
    }

    #[test]
    fn punctuation_runs_stay_together() {
        let toks = tokenize_line("wait... really?!");
        assert_eq!(words(&toks), vec!["WAIT", "...", "REALLY", "?!"]);
    }

    #[test]
    fn appends_synthetic_period_for_bare_trailing_word() {
        let toks = tokenize_line("hello there");
        assert_eq!(words(&toks), vec!["HELLO", "THERE", "."]);
    }

    #[test]
    fn no_synthetic_period_when_punctuation_already_terminal() {
        let toks = tokenize_line("hello there!");
        assert_eq!(words(&toks), vec!["HELLO", "THERE", "!"]);
    }

    #[test]
    fn newline_separates_lines() {
        let lines = tokenize_lines("hi there\nbye now");
        assert_eq!(lines.len(), 2);
        assert_eq!(words(&lines[0]), vec!["HI", "THERE", "."]);
        assert_eq!(words(&lines[1]), vec!["BYE", "NOW", "."]);
    }

    #[test]
    fn blank_lines_produce_no_entry() {
        let lines = tokenize_lines("hi\n\n\nbye");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn digits_join_words() {
        let toks = tokenize_line("room101 is great");
        assert_eq!(words(&toks), vec!["ROOM101", "IS", "GREAT", "."]);
    }
}
