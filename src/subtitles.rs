use std::fs;
use std::path::Path;

use crate::error::{VocabError, VocabResult};

const TIMING_MARKER: &str = "-->";
const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";
const MIN_WORD_LEN: usize = 2;

/// A candidate vocabulary word and the (trimmed) subtitle line it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub word: String,
    pub line: String,
}

/// Read a subtitle file as UTF-8, tolerating a leading byte-order mark.
pub fn read_subtitle_file(path: &Path) -> VocabResult<String> {
    let bytes = fs::read(path).map_err(|e| VocabError::file_read(path, e))?;
    let body = bytes.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&bytes[..]);

    String::from_utf8(body.to_vec()).map_err(|e| {
        VocabError::file_read(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

/// Pull every candidate word out of the text of a subtitle file, in the
/// order they are encountered.
pub fn extract(text: &str) -> Vec<Token> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    text.lines()
        .map(str::trim)
        .filter(|line| is_dialogue_line(line))
        .flat_map(|line| {
            tokenize(line).map(move |word| Token {
                word,
                line: line.to_string(),
            })
        })
        .collect()
}

/// Sequence numbers, timing ranges and `[music]`/`(laughs)` annotations carry
/// no dialogue.
pub fn is_dialogue_line(line: &str) -> bool {
    !line.is_empty()
        && !line.chars().all(|c| c.is_ascii_digit())
        && !line.contains(TIMING_MARKER)
        && !line.starts_with('[')
        && !line.starts_with('(')
}

/// Lowercased words of at least two letters, each a run of ASCII letters
/// optionally joined to one more run by a single apostrophe (`don't`,
/// `john's`).
pub fn tokenize(line: &str) -> impl Iterator<Item = String> + '_ {
    Tokens { text: line, pos: 0 }.filter(|w| w.len() >= MIN_WORD_LEN)
}

struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

#[derive(Clone, Copy)]
enum State {
    Head,
    Apostrophe,
    Tail,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'a> Tokens<'a> {
    /// A word may only start on a word boundary, so `abc1def` yields nothing
    /// for `def`.
    fn at_boundary(&self, idx: usize) -> bool {
        self.text[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c))
    }

    fn next_start(&mut self) -> Option<usize> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let idx = self.pos;
            if bytes[idx].is_ascii_alphabetic() && self.at_boundary(idx) {
                return Some(idx);
            }
            self.pos += 1;
        }
        None
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = self.next_start()?;
        let bytes = self.text.as_bytes();
        let mut end = start;
        let mut state = State::Head;
        let mut idx = start;

        while idx < bytes.len() {
            let b = bytes[idx];
            state = match (state, b) {
                (State::Head, b) if b.is_ascii_alphabetic() => State::Head,
                (State::Head, b'\'') => State::Apostrophe,
                (State::Apostrophe, b) if b.is_ascii_alphabetic() => State::Tail,
                (State::Tail, b) if b.is_ascii_alphabetic() => State::Tail,
                _ => break,
            };
            idx += 1;
            if let State::Head | State::Tail = state {
                end = idx;
            }
        }

        // A dangling apostrophe is left for the scan to skip over.
        self.pos = end;
        Some(self.text[start..end].to_ascii_lowercase())
    }
}
