/*!
 * Tests for language utility functions
 */

use ytnote::language_utils::{
    LanguageCodeType, get_language_name, normalize_to_part2t, script_for_language,
    strip_region_subtag, validate_language_code,
};
use ytnote::transcript::ScriptKind;

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1 tests
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("zh").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("ja").unwrap(), LanguageCodeType::Part1));

    // ISO 639-2/T tests
    assert!(matches!(validate_language_code("eng").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("zho").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("kor").unwrap(), LanguageCodeType::Part2T));

    // ISO 639-2/B tests
    assert!(matches!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code("chi").unwrap(), LanguageCodeType::Part2B));

    // Region and script subtags
    assert!(matches!(validate_language_code("zh-Hans").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("en_GB").unwrap(), LanguageCodeType::Part1));

    // Whitespace and case tests
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("ENG").unwrap(), LanguageCodeType::Part2T));

    // Invalid codes
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("english").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("zh").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("ja-JP").unwrap(), "jpn");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");

    // Case insensitivity
    assert_eq!(normalize_to_part2t("KO").unwrap(), "kor");

    // Whitespace
    assert_eq!(normalize_to_part2t(" en ").unwrap(), "eng");
}

/// Test subtag stripping
#[test]
fn test_strip_region_subtag_shouldKeepPrimaryLanguage() {
    assert_eq!(strip_region_subtag("zh-Hant-TW"), "zh");
    assert_eq!(strip_region_subtag("pt_BR"), "pt");
    assert_eq!(strip_region_subtag("ko"), "ko");
}

/// Test retrieval of language names from codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnCorrectName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("jpn").unwrap(), "Japanese");
    assert_eq!(get_language_name("ko-KR").unwrap(), "Korean");
    assert!(get_language_name("12").is_err());
}

/// Test the script family behind each language
#[test]
fn test_script_for_language_shouldMapCjkLanguages() {
    assert_eq!(script_for_language("zh-Hans").unwrap(), ScriptKind::Cjk);
    assert_eq!(script_for_language("cmn").unwrap(), ScriptKind::Cjk);
    assert_eq!(script_for_language("JA").unwrap(), ScriptKind::Cjk);
    assert_eq!(script_for_language("ru").unwrap(), ScriptKind::Latin);
    assert_eq!(script_for_language("vie").unwrap(), ScriptKind::Latin);
    assert!(script_for_language("").is_err());
}
