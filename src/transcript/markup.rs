/*!
 * Markup stripping for caption text.
 *
 * Caption dialects carry presentation markup inside cue text:
 * - WebVTT karaoke timestamps (`<00:00:01.520>`) and class spans (`<c>`, `<c.colorE5E5E5>`)
 * - HTML-style style tags (`<i>`, `<b>`, `<u>`, `<font ...>`, `<v Speaker>`)
 * - ASS override blocks (`{\an8}`)
 * - HTML entities (`&gt;`, `&nbsp;`, `&#39;`)
 *
 * Everything here reduces cue text to plain, whitespace-normalized prose.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Inline karaoke timestamps inside WebVTT cue text
static INLINE_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\d{1,2}:\d{2}(?::\d{2})?[.,]\d{1,3}>").expect("Invalid inline timestamp regex")
});

/// Opening and closing tags (`<c.color>`, `</i>`, `<v Speaker>`, `<font color="x">`)
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z][^<>]*>").expect("Invalid tag regex")
});

/// ASS/SSA override blocks such as `{\an8}` or `{\i1}`
static ASS_OVERRIDE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\\[^{}]*\}").expect("Invalid override regex")
});

/// Named and numeric HTML entities
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("Invalid entity regex")
});

/// Bracketed sound descriptions: [Music], (applause), ♪ la la ♪
static SOUND_ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\[\]]*\]|\([^()]*\)|♪[^♪]*♪|[♪♫]").expect("Invalid sound annotation regex")
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Strip presentation markup from a piece of cue text.
///
/// Tags are removed before entities are decoded, so an escaped `&lt;i&gt;`
/// survives as literal text.
pub fn strip_markup(text: &str) -> String {
    let text = INLINE_TIMESTAMP_REGEX.replace_all(text, "");
    let text = TAG_REGEX.replace_all(&text, "");
    let text = ASS_OVERRIDE_REGEX.replace_all(&text, "");
    // ASS hard line breaks
    let text = text.replace("\\N", " ").replace("\\n", " ");
    decode_entities(&text)
}

/// Remove sound descriptions such as `[Music]` or `(laughter)`
pub fn strip_sound_annotations(text: &str) -> String {
    SOUND_ANNOTATION_REGEX.replace_all(text, " ").into_owned()
}

/// Collapse whitespace runs (including non-breaking spaces) to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Full cleanup of a cue's text lines
pub fn clean_cue_text(text: &str, strip_sounds: bool) -> String {
    let plain = strip_markup(text);
    if strip_sounds {
        normalize_whitespace(&strip_sound_annotations(&plain))
    } else {
        normalize_whitespace(&plain)
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
            } else {
                named_entity(body).map(String::from)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some(" "),
        // Directional marks carry no visible text
        "lrm" | "rlm" => Some(""),
        _ => None,
    }
}
