/*!
 * Script detection and formatting policies.
 *
 * The classifier decides whether a transcript is written in a CJK script or
 * in a space-separated (Latin) script, and the policy table maps that
 * decision to line and chunk limits. A language hint, when it is a valid
 * ISO 639 code, bypasses detection entirely.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::collapser::TextSegment;
use crate::language_utils::{get_language_name, script_for_language};

/// CJK share above which a transcript is classified as CJK
pub const CJK_RATIO_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptKind {
    Cjk,
    Latin,
    /// Reserved for multi-script handling; formats like `Latin`
    MixedDefaultLatin,
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cjk => "cjk",
            Self::Latin => "latin",
            Self::MixedDefaultLatin => "mixed-default-latin",
        };
        write!(f, "{}", name)
    }
}

/// Where a script decision came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "code")]
pub enum ProfileSource {
    Detected,
    Hint(String),
}

/// Script decision for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptProfile {
    pub script_kind: ScriptKind,
    /// Winning ratio for detected profiles, 1.0 for hinted ones
    pub detection_confidence: f64,
    pub source: ProfileSource,
}

impl ScriptProfile {
    pub fn detected(script_kind: ScriptKind, detection_confidence: f64) -> Self {
        Self {
            script_kind,
            detection_confidence: detection_confidence.clamp(0.0, 1.0),
            source: ProfileSource::Detected,
        }
    }

    pub fn hinted(script_kind: ScriptKind, code: impl Into<String>) -> Self {
        Self {
            script_kind,
            detection_confidence: 1.0,
            source: ProfileSource::Hint(code.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Whitespace-delimited words
    Word,
    /// Extended grapheme clusters
    Character,
}

/// Reflow limits for one script family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingPolicy {
    pub unit_kind: UnitKind,
    /// Maximum units per line
    pub line_limit: usize,
    /// Maximum units per chunk
    pub chunk_limit: usize,
}

impl FormattingPolicy {
    pub fn latin() -> Self {
        Self {
            unit_kind: UnitKind::Word,
            line_limit: 15,
            chunk_limit: 100,
        }
    }

    pub fn cjk() -> Self {
        Self {
            unit_kind: UnitKind::Character,
            line_limit: 50,
            chunk_limit: 500,
        }
    }
}

/// The two live policies, selected by script kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyTable {
    pub latin: FormattingPolicy,
    pub cjk: FormattingPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            latin: FormattingPolicy::latin(),
            cjk: FormattingPolicy::cjk(),
        }
    }
}

impl PolicyTable {
    pub fn select(&self, profile: &ScriptProfile) -> FormattingPolicy {
        match profile.script_kind {
            ScriptKind::Cjk => self.cjk,
            ScriptKind::Latin | ScriptKind::MixedDefaultLatin => self.latin,
        }
    }
}

/// Count code points in the CJK Unified Ideographs block
pub fn cjk_count(text: &str) -> usize {
    text.chars().filter(|c| ('\u{4E00}'..='\u{9FFF}').contains(c)).count()
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (('\u{00C0}'..='\u{024F}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
        || ('\u{1E00}'..='\u{1EFF}').contains(&c)
}

/// Count maximal runs of Latin-alphabet letters
pub fn latin_word_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for c in text.chars() {
        let letter = is_latin_letter(c);
        if letter && !in_word {
            count += 1;
        }
        in_word = letter;
    }
    count
}

/// Decides the dominant script of a transcript
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptClassifier;

impl ScriptClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify text by the share of CJK ideographs against Latin word runs
    pub fn classify(&self, text: &str) -> ScriptProfile {
        let cjk = cjk_count(text);
        let latin = latin_word_count(text);
        let total = cjk + latin;

        if total == 0 {
            debug!("No CJK or Latin content found, defaulting to latin");
            return ScriptProfile::detected(ScriptKind::Latin, 0.0);
        }

        let ratio = cjk as f64 / total as f64;
        let profile = if ratio > CJK_RATIO_THRESHOLD {
            ScriptProfile::detected(ScriptKind::Cjk, ratio)
        } else {
            ScriptProfile::detected(ScriptKind::Latin, 1.0 - ratio)
        };

        debug!(
            "Classified as {} ({} CJK, {} Latin words, confidence {:.2})",
            profile.script_kind, cjk, latin, profile.detection_confidence
        );
        profile
    }

    pub fn classify_segments(&self, segments: &[TextSegment]) -> ScriptProfile {
        let joined = segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.classify(&joined)
    }

    /// Build a profile from a language hint; `None` when the hint is not a known code
    pub fn from_hint(&self, hint: &str) -> Option<ScriptProfile> {
        match script_for_language(hint) {
            Ok(kind) => {
                let name = get_language_name(hint).unwrap_or_else(|_| hint.trim().to_string());
                debug!("Language hint '{}' ({}) selects {} formatting", hint.trim(), name, kind);
                Some(ScriptProfile::hinted(kind, hint.trim()))
            }
            Err(e) => {
                warn!("Ignoring language hint: {}", e);
                None
            }
        }
    }

    /// Hint first, detection otherwise
    pub fn profile(&self, segments: &[TextSegment], hint: Option<&str>) -> ScriptProfile {
        hint.filter(|h| !h.trim().is_empty())
            .and_then(|h| self.from_hint(h))
            .unwrap_or_else(|| self.classify_segments(segments))
    }
}
