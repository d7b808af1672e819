//! Comparison tokens shared by the repetition collapser.
//!
//! Text is split on whitespace into words, except that every CJK grapheme
//! (ideographs, kana, CJK punctuation, full-width forms) becomes a token of
//! its own. Each token remembers whether whitespace preceded it, so a token
//! sequence can be turned back into the exact whitespace-normalized text.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A whitespace-delimited run of non-CJK text
    Word,
    /// A single CJK grapheme
    Char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// Whitespace separated this token from the previous one
    pub spaced: bool,
    key: String,
}

impl Token {
    fn new(text: String, kind: TokenKind, spaced: bool) -> Self {
        let key = text.to_lowercase();
        Self { text, kind, spaced, key }
    }

    /// Case-folded form used for equality checks
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Whether a character is written without word separators
pub fn is_cjk_unit_char(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F      // CJK symbols and punctuation
        | 0x3040..=0x30FF    // Hiragana, Katakana
        | 0x31F0..=0x31FF    // Katakana phonetic extensions
        | 0x3400..=0x4DBF    // Extension A
        | 0x4E00..=0x9FFF    // Unified ideographs
        | 0xF900..=0xFAFF    // Compatibility ideographs
        | 0xFF00..=0xFFEF    // Half/full-width forms
        | 0x20000..=0x2FA1F  // Supplementary ideographic planes
    )
}

/// Split whitespace-normalized text into comparison tokens
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (word_index, word) in text.split_whitespace().enumerate() {
        let mut spaced = word_index > 0;
        let mut run = String::new();

        for grapheme in word.graphemes(true) {
            let cjk = grapheme.chars().next().is_some_and(is_cjk_unit_char);
            if cjk {
                if !run.is_empty() {
                    tokens.push(Token::new(std::mem::take(&mut run), TokenKind::Word, spaced));
                    spaced = false;
                }
                tokens.push(Token::new(grapheme.to_string(), TokenKind::Char, spaced));
                spaced = false;
            } else {
                run.push_str(grapheme);
            }
        }

        if !run.is_empty() {
            tokens.push(Token::new(run, TokenKind::Word, spaced));
        }
    }

    tokens
}

/// Rebuild text from tokens; the first token never gets a leading space
pub fn join_tokens<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut text = String::new();
    for token in tokens {
        if token.spaced && !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text
}

/// Case-insensitive equality of two token slices
pub fn tokens_match(a: &[Token], b: &[Token]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.key() == y.key())
}
