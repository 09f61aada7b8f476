use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for locating catalogs and labelling diagnostics.
///
/// Catalog trees name their per-language directories with short codes
/// (`locale/fr/LC_MESSAGES/...`), while corpus runs are usually invoked with
/// longer identifiers (`fra`, `french`, or engine-style `fra_Latn`). This
/// module maps between the two and decides whether two codes denote the same
/// language. Nothing here makes a linguistic decision beyond matching.
/// ISO 639-2/B codes that differ from their 639-2/T counterpart
static PART2B_ALIASES: &[(&str, &str)] = &[
    ("fre", "fra"), // French
    ("ger", "deu"), // German
    ("dut", "nld"), // Dutch
    ("gre", "ell"), // Greek
    ("chi", "zho"), // Chinese
    ("cze", "ces"), // Czech
    ("ice", "isl"), // Icelandic
    ("alb", "sqi"), // Albanian
    ("arm", "hye"), // Armenian
    ("baq", "eus"), // Basque
    ("bur", "mya"), // Burmese
    ("per", "fas"), // Persian
    ("geo", "kat"), // Georgian
    ("may", "msa"), // Malay
    ("mac", "mkd"), // Macedonian
    ("rum", "ron"), // Romanian
    ("slo", "slk"), // Slovak
    ("wel", "cym"), // Welsh
];

/// Resolve an arbitrary language identifier to an isolang Language.
///
/// Accepts 2-letter (ISO 639-1) and 3-letter (ISO 639-2/T or /B) codes,
/// engine-style identifiers with a script suffix (`fra_Latn`), and English
/// language names (`French`). Case and surrounding whitespace are ignored.
fn resolve(identifier: &str) -> Option<Language> {
    let code = identifier.trim().to_lowercase();

    // Engine identifiers carry a script or region suffix after the first
    // separator; only the language part matters for directory matching.
    let code = code
        .split(['_', '-'])
        .next()
        .unwrap_or(code.as_str())
        .to_string();

    match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code).or_else(|| {
            PART2B_ALIASES
                .iter()
                .find(|(b, _)| *b == code)
                .and_then(|(_, t)| Language::from_639_3(t))
        }),
        _ => Language::from_name(&title_case(&code)),
    }
}

/// isolang resolves English names by exact spelling ("Haitian Creole"),
/// so rebuild that casing from the lowercased input
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether an identifier names a language this tool can resolve
pub fn validate_language_code(identifier: &str) -> Result<()> {
    resolve(identifier)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Unrecognized language identifier: {}", identifier))
}

/// Normalize an identifier to the short directory-style code.
///
/// Prefers the ISO 639-1 (2-letter) code and falls back to ISO 639-2/T when
/// no 2-letter code exists, which is the convention catalog trees follow for
/// their per-language directories.
pub fn short_code(identifier: &str) -> Result<String> {
    let lang = resolve(identifier)
        .ok_or_else(|| anyhow!("Cannot derive a short code from '{}'", identifier))?;

    match lang.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Ok(lang.to_639_3().to_string()),
    }
}

/// Normalize an identifier to the ISO 639-2/T (3-letter) code
pub fn normalize_to_part2t(identifier: &str) -> Result<String> {
    let lang = resolve(identifier)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language identifier: {}", identifier))?;
    Ok(lang.to_639_3().to_string())
}

/// Check if two language identifiers denote the same language.
///
/// `fr`, `fra`, `fre`, `French` and `fra_Latn` all match each other. Returns
/// false when either side fails to resolve; callers treat that as a skip,
/// never as an error.
pub fn language_codes_match(first: &str, second: &str) -> bool {
    match (resolve(first), resolve(second)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for an identifier
pub fn get_language_name(identifier: &str) -> Result<String> {
    let lang = resolve(identifier)
        .ok_or_else(|| anyhow!("Failed to get language from identifier: {}", identifier))?;
    Ok(lang.to_name().to_string())
}
