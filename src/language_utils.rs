use anyhow::{Result, anyhow};
use isolang::Language;

use crate::transcript::script::ScriptKind;

/// Language utilities for caption language hints
///
/// Hints arrive from the command line, sidecar metadata and subtitle file
/// names (`talk.zh-Hans.vtt`). They are ISO 639-1 (2-letter) or ISO 639-2
/// (3-letter) codes, optionally followed by a region or script subtag.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Languages written in CJK scripts, as ISO 639-2/T or 639-3 codes
const CJK_LANGUAGES: [&str; 9] = ["zho", "jpn", "kor", "cmn", "yue", "wuu", "nan", "hak", "lzh"];

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(part2b, _)| *part2b == code)
        .map(|(_, part2t)| *part2t)
}

/// Drop a region or script subtag: `zh-Hans` becomes `zh`, `en_US` becomes `en`
pub fn strip_region_subtag(code: &str) -> &str {
    let code = code.trim();
    match code.find(|c| c == '-' || c == '_') {
        Some(pos) => &code[..pos],
        None => code,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = strip_region_subtag(code).to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if part2b_to_part2t(&normalized_code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = strip_region_subtag(code).to_lowercase();

    match validate_language_code(&normalized_code) {
        Ok(LanguageCodeType::Part1) => Language::from_639_1(&normalized_code)
            .map(|lang| lang.to_639_3().to_string())
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        Ok(LanguageCodeType::Part2T) => Ok(normalized_code),
        Ok(LanguageCodeType::Part2B) => part2b_to_part2t(&normalized_code)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        Err(_) => Err(anyhow!("Cannot normalize invalid language code: {}", code)),
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Script family a language is written in.
///
/// Chinese, Japanese and Korean map to `Cjk`; every other valid code maps to
/// `Latin`, which also covers non-Latin alphabets that separate words with
/// spaces.
pub fn script_for_language(code: &str) -> Result<ScriptKind> {
    let part2t = normalize_to_part2t(code)?;
    if CJK_LANGUAGES.contains(&part2t.as_str()) {
        Ok(ScriptKind::Cjk)
    } else {
        Ok(ScriptKind::Latin)
    }
}
