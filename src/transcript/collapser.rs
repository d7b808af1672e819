/*!
 * Repetition collapsing for rolling auto-captions.
 *
 * Automatic captions repeat themselves in two ways:
 * 1. **Rolling overlap**: each cue restates the tail of the previous one
 *    before adding new words. The longest suffix/prefix overlap against the
 *    recently emitted text is dropped.
 * 2. **Adjacent repetition**: a whole phrase is emitted twice in a row. A
 *    long enough phrase followed by copies of itself is kept once.
 *
 * Optionally, sentences that exactly repeat an earlier sentence are dropped
 * as well. All passes are repeated until nothing changes, which makes
 * collapsing a fixed point: collapsing its own output is a no-op.
 *
 * The longest overlap always wins. A speaker really saying "no no" across
 * a cue boundary loses one "no"; that is the accepted cost of removing
 * rolling duplication without timing heuristics.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cue::CaptionCue;
use super::tokens::{Token, TokenKind, join_tokens, tokenize, tokens_match};

/// Terminators that close a sentence for repeated-sentence detection
const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// A deduplicated run of transcript text; timing is gone at this point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub text: String,
}

impl TextSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Tuning knobs for the collapser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapseConfig {
    /// Overlaps shorter than this many tokens are left alone
    #[serde(default = "default_min_overlap_tokens")]
    pub min_overlap_tokens: usize,

    /// How many recently emitted tokens are searched for a rolling overlap
    #[serde(default = "default_overlap_window_tokens")]
    pub overlap_window_tokens: usize,

    /// Minimum phrase length in word units for adjacent repetition
    #[serde(default = "default_min_phrase_words")]
    pub min_phrase_words: usize,

    /// Minimum phrase length in character units for adjacent repetition
    #[serde(default = "default_min_phrase_chars")]
    pub min_phrase_chars: usize,

    /// Longest phrase (in tokens) considered for adjacent repetition
    #[serde(default = "default_max_phrase_tokens")]
    pub max_phrase_tokens: usize,

    /// Drop sentences that repeat an earlier sentence anywhere in the transcript
    #[serde(default)]
    pub drop_repeated_sentences: bool,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            min_overlap_tokens: default_min_overlap_tokens(),
            overlap_window_tokens: default_overlap_window_tokens(),
            min_phrase_words: default_min_phrase_words(),
            min_phrase_chars: default_min_phrase_chars(),
            max_phrase_tokens: default_max_phrase_tokens(),
            drop_repeated_sentences: false,
        }
    }
}

fn default_min_overlap_tokens() -> usize {
    1
}

fn default_overlap_window_tokens() -> usize {
    64
}

fn default_min_phrase_words() -> usize {
    5
}

fn default_min_phrase_chars() -> usize {
    10
}

fn default_max_phrase_tokens() -> usize {
    120
}

/// Removes rolling-caption and phrase-level duplication
#[derive(Debug, Clone, Default)]
pub struct RepetitionCollapser {
    config: CollapseConfig,
}

impl RepetitionCollapser {
    pub fn new(config: CollapseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollapseConfig {
        &self.config
    }

    /// Collapse an ordered cue sequence into deduplicated text segments
    pub fn collapse(&self, cues: &[CaptionCue]) -> Vec<TextSegment> {
        self.collapse_texts(cues.iter().map(|cue| cue.text.as_str()))
    }

    /// Collapse segments again, treating each one as a single untimed cue
    pub fn collapse_segments(&self, segments: &[TextSegment]) -> Vec<TextSegment> {
        self.collapse_texts(segments.iter().map(|segment| segment.text.as_str()))
    }

    fn collapse_texts<'a, I>(&self, texts: I) -> Vec<TextSegment>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut segments: Vec<Vec<Token>> = texts
            .map(tokenize)
            .filter(|tokens| !tokens.is_empty())
            .collect();
        let initial_tokens = token_count(&segments);

        // Every pass only removes tokens, so this terminates
        let mut passes = 0;
        loop {
            let before = token_count(&segments);
            let mut next = self.remove_rolling_overlap(segments);
            next = self.collapse_adjacent_phrases(next);
            if self.config.drop_repeated_sentences {
                next = self.drop_repeated_sentences(next);
            }
            segments = next;
            passes += 1;

            if token_count(&segments) == before {
                break;
            }
        }

        debug!(
            "Collapsed {} tokens to {} in {} segment(s) after {} pass(es)",
            initial_tokens,
            token_count(&segments),
            segments.len(),
            passes
        );

        segments
            .iter()
            .map(|tokens| TextSegment::new(join_tokens(tokens)))
            .collect()
    }

    /// Drop the head of each segment that restates the tail of what was already emitted
    fn remove_rolling_overlap(&self, segments: Vec<Vec<Token>>) -> Vec<Vec<Token>> {
        let window_size = self.config.overlap_window_tokens;
        let mut window: Vec<Token> = Vec::with_capacity(window_size);
        let mut emitted = Vec::with_capacity(segments.len());

        for mut segment in segments {
            loop {
                let overlap = self.longest_overlap(&window, &segment);
                if overlap == 0 {
                    break;
                }
                segment.drain(..overlap);
                if segment.is_empty() {
                    break;
                }
            }

            if segment.is_empty() {
                continue;
            }

            window.extend(segment.iter().cloned());
            if window.len() > window_size {
                let excess = window.len() - window_size;
                window.drain(..excess);
            }
            emitted.push(segment);
        }

        emitted
    }

    /// Longest k such that the last k window tokens equal the first k segment tokens
    fn longest_overlap(&self, window: &[Token], segment: &[Token]) -> usize {
        let max = window.len().min(segment.len());
        let min = self.config.min_overlap_tokens.max(1);

        (min..=max)
            .rev()
            .find(|&k| tokens_match(&window[window.len() - k..], &segment[..k]))
            .unwrap_or(0)
    }

    /// Keep one copy of any qualifying phrase that immediately repeats itself
    fn collapse_adjacent_phrases(&self, segments: Vec<Vec<Token>>) -> Vec<Vec<Token>> {
        let (owners, tokens) = flatten(segments);
        let n = tokens.len();
        let mut keep = vec![true; n];
        let mut i = 0;

        while i < n {
            let max_len = ((n - i) / 2).min(self.config.max_phrase_tokens);
            let phrase_len = (1..=max_len).rev().find(|&len| {
                tokens[i].key() == tokens[i + len].key()
                    && self.phrase_qualifies(&tokens[i..i + len])
                    && tokens_match(&tokens[i..i + len], &tokens[i + len..i + 2 * len])
            });

            match phrase_len {
                Some(len) => {
                    let mut pos = i + len;
                    while pos + len <= n && tokens_match(&tokens[i..i + len], &tokens[pos..pos + len]) {
                        keep[pos..pos + len].iter_mut().for_each(|k| *k = false);
                        pos += len;
                    }
                    debug!("Collapsed repeated phrase of {} token(s) at token {}", len, i);
                    i = pos;
                }
                None => i += 1,
            }
        }

        rebuild(owners, tokens, &keep)
    }

    /// A phrase qualifies when it is long enough in word units, character units, or a mix of both
    fn phrase_qualifies(&self, phrase: &[Token]) -> bool {
        let min_words = self.config.min_phrase_words.max(1);
        let min_chars = self.config.min_phrase_chars.max(1);
        let chars = phrase.iter().filter(|t| t.kind == TokenKind::Char).count();
        let words = phrase.len() - chars;

        words * min_chars + chars * min_words >= min_words * min_chars
    }

    /// Drop every sentence that already appeared earlier in the transcript
    fn drop_repeated_sentences(&self, segments: Vec<Vec<Token>>) -> Vec<Vec<Token>> {
        let (owners, tokens) = flatten(segments);
        let mut keep = vec![true; tokens.len()];
        let mut seen: HashSet<String> = HashSet::new();
        let mut start = 0;

        for end in 0..tokens.len() {
            let closes = tokens[end].text.ends_with(|c| SENTENCE_TERMINATORS.contains(&c)) || end + 1 == tokens.len();
            if !closes {
                continue;
            }

            let key = tokens[start..=end]
                .iter()
                .map(Token::key)
                .collect::<Vec<_>>()
                .join(" ");
            if !seen.insert(key) {
                debug!("Dropping repeated sentence of {} token(s)", end + 1 - start);
                keep[start..=end].iter_mut().for_each(|k| *k = false);
            }
            start = end + 1;
        }

        rebuild(owners, tokens, &keep)
    }
}

fn token_count(segments: &[Vec<Token>]) -> usize {
    segments.iter().map(Vec::len).sum()
}

/// Flatten segments into one token stream, remembering each token's segment
fn flatten(segments: Vec<Vec<Token>>) -> (Vec<usize>, Vec<Token>) {
    let mut owners = Vec::new();
    let mut tokens = Vec::new();
    for (index, segment) in segments.into_iter().enumerate() {
        owners.extend(std::iter::repeat_n(index, segment.len()));
        tokens.extend(segment);
    }
    (owners, tokens)
}

/// Regroup kept tokens into their segments, dropping segments left empty
fn rebuild(owners: Vec<usize>, tokens: Vec<Token>, keep: &[bool]) -> Vec<Vec<Token>> {
    let mut segments: Vec<Vec<Token>> = Vec::new();
    let mut current_owner = None;

    for ((owner, mut token), kept) in owners.into_iter().zip(tokens).zip(keep) {
        if !*kept {
            continue;
        }
        if current_owner != Some(owner) {
            segments.push(Vec::new());
            current_owner = Some(owner);
        }
        if let Some(segment) = segments.last_mut() {
            // Two words only touch when a removed CJK token sat between them
            let touches_word = segment.last().is_some_and(|prev| prev.kind == TokenKind::Word);
            if touches_word && token.kind == TokenKind::Word && !token.spaced {
                token.spaced = true;
            }
            segment.push(token);
        }
    }

    segments
}
