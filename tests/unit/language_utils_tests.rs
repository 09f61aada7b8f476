/*!
 * Tests for language utility functions
 */

use transcorpus::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, short_code,
    validate_language_code,
};

/// Test validation of language identifiers
#[test]
fn test_validateLanguageCode_withValidIdentifiers_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("fre").is_ok());
    assert!(validate_language_code("French").is_ok());
    assert!(validate_language_code("fra_Latn").is_ok());

    // Whitespace and case tests
    assert!(validate_language_code(" EN ").is_ok());
    assert!(validate_language_code("ENG").is_ok());

    // Invalid identifiers
    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("q").is_err());
}

/// Test normalization to the ISO 639-2/T format
#[test]
fn test_normalizeToPart2t_withValidIdentifiers_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fra").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("fra_Latn").unwrap(), "fra");

    // Case insensitivity
    assert_eq!(normalize_to_part2t("EN").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
}

/// Test derivation of short directory-style codes
#[test]
fn test_shortCode_withLongIdentifiers_shouldPreferPart1() {
    assert_eq!(short_code("fra").unwrap(), "fr");
    assert_eq!(short_code("fra_Latn").unwrap(), "fr");
    assert_eq!(short_code("french").unwrap(), "fr");
    assert_eq!(short_code("eng_Latn").unwrap(), "en");
    assert_eq!(short_code("de").unwrap(), "de");

    assert!(short_code("xyz").is_err());
}

/// Test matching of different identifier formats
#[test]
fn test_languageCodesMatch_withAliases_shouldTreatAsEquivalent() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fra", "fre"));
    assert!(language_codes_match("fr", "French"));
    assert!(language_codes_match("fra_Latn", "fr"));
    assert!(language_codes_match("en", "eng"));

    // Case insensitivity
    assert!(language_codes_match("EN", "eng"));
    assert!(language_codes_match(" en ", "ENG"));

    // Non-matches
    assert!(!language_codes_match("en", "fra"));
    assert!(!language_codes_match("eng", "fre"));
    assert!(!language_codes_match("en", "xyz"));
    assert!(!language_codes_match("xyz", "xyz"));
}

/// Test retrieval of language names from identifiers
#[test]
fn test_getLanguageName_withValidIdentifiers_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
    assert_eq!(get_language_name("fre").unwrap(), "French");
    assert_eq!(get_language_name("fra_Latn").unwrap(), "French");

    assert!(get_language_name("xyz").is_err());
}
