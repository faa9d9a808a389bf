//! Language code normalization and inference.
//!
//! Every language the crate stores is a canonical ISO 639-2 code. Tokens
//! coming from container tags, track titles, file names or user input are
//! resolved through [`normalize`].

pub mod tables;

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Canonical code for an undefined language
pub const UNDEFINED: &str = "und";

static ALIAS_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    tables::ALIASES
        .iter()
        .flat_map(|(code, aliases)| aliases.iter().map(move |alias| (*alias, *code)))
        .collect()
});

static FILENAME_PATTERNS: LazyLock<Vec<(Regex, Option<&'static str>)>> = LazyLock::new(|| {
    let fixed: &[(&str, &str)] = &[
        (r"[\[(](?:en|eng|english)[\])]", "eng"),
        (r"[\[(](?:jp|jpn|ja|jap|japanese)[\])]", "jpn"),
        (r"[\[(](?:es|spa|spanish|español|espanol)[\])]", "spa"),
        (r"[\[(](?:fr|fra|fre|french|français|francais)[\])]", "fra"),
        (r"[\[(](?:de|deu|ger|german|deutsch)[\])]", "deu"),
        (r"[\[(](?:zh|zho|chi|cn|chinese)[\])]", "zho"),
        (r"[\[(](?:it|ita|italian|italiano)[\])]", "ita"),
        (r"[\[(](?:ko|kor|korean)[\])]", "kor"),
        (r"[\[(](?:ru|rus|russian)[\])]", "rus"),
    ];
    let extracted = [
        format!(
            r"\.([a-z]{{2,3}})\.(?:{})$",
            tables::LANGUAGE_SUFFIX_EXTENSIONS
        ),
        r"[._-]([a-z]{2,3})[._-]".to_string(),
        r"[._-](english|spanish|french|german|italian|japanese|korean|chinese|russian)[._-]"
            .to_string(),
    ];

    fixed
        .iter()
        .map(|(pattern, code)| (Regex::new(pattern).unwrap(), Some(*code)))
        .chain(
            extracted
                .iter()
                .map(|pattern| (Regex::new(pattern).unwrap(), None)),
        )
        .collect()
});

static TITLE_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(en|eng|es|spa|fr|fra|de|deu|it|ita|jp|jpn|zh|zho|ko|kor|ru|rus)\]").unwrap()
});

/// Normalize a free-form language token to a canonical three-letter code.
///
/// Lookup order: alias table, ISO 639-1 table, bibliographic codes, already
/// canonical codes, then a locale suffix (`pt-BR`, `en_US`) is stripped once.
pub fn normalize(token: &str) -> Option<&'static str> {
    normalize_inner(token, true)
}

fn normalize_inner(token: &str, strip_locale: bool) -> Option<&'static str> {
    let clean = token.trim().to_lowercase();
    if clean.is_empty() {
        return None;
    }

    if let Some(code) = ALIAS_LOOKUP.get(clean.as_str()) {
        return Some(*code);
    }

    if clean.len() == 2
        && let Some((_, code)) = tables::TWO_TO_THREE.iter().find(|(two, _)| *two == clean)
    {
        return Some(*code);
    }

    if let Some((_, code)) = tables::BIBLIOGRAPHIC.iter().find(|(alt, _)| *alt == clean) {
        return Some(*code);
    }

    if clean.len() == 3
        && let Some(code) = canonical_code(&clean)
    {
        return Some(code);
    }

    if strip_locale
        && let Some((base, _)) = clean.split_once(['-', '_'])
    {
        return normalize_inner(base, false);
    }

    debug!("Could not normalize language token: {}", token);
    None
}

/// Look up a three-letter code among the known canonical codes
fn canonical_code(code: &str) -> Option<&'static str> {
    tables::TWO_TO_THREE
        .iter()
        .map(|(_, three)| *three)
        .chain(tables::BIBLIOGRAPHIC.iter().map(|(_, three)| *three))
        .chain(tables::DISPLAY_NAMES.iter().map(|(three, _)| *three))
        .find(|known| *known == code)
}

/// Whether a token resolves to any known language
pub fn is_known_code(token: &str) -> bool {
    normalize(token).is_some()
}

/// Whether a raw token stands for "no language"
pub fn is_undefined_token(token: &str) -> bool {
    let clean = token.trim();
    clean.is_empty() || normalize(clean) == Some(UNDEFINED)
}

/// Infer a language from a file name such as `movie.eng.srt` or `show [jpn].mkv`
pub fn detect_from_filename(filename: &str) -> Option<&'static str> {
    if filename.is_empty() {
        return None;
    }
    let lower = filename.to_lowercase();

    for (pattern, fixed) in FILENAME_PATTERNS.iter() {
        if let Some(code) = *fixed {
            if pattern.is_match(&lower) {
                return Some(code);
            }
            continue;
        }

        for caps in pattern.captures_iter(&lower) {
            if let Some(code) = caps.get(1).and_then(|m| normalize(m.as_str()))
                && code != UNDEFINED
            {
                debug!("Detected language '{}' from filename '{}'", code, filename);
                return Some(code);
            }
        }
    }

    None
}

/// Infer a language from a track title ("English (SDH)", "Commentary [jpn]")
pub fn detect_from_title(title: &str) -> Option<&'static str> {
    if title.is_empty() {
        return None;
    }
    let lower = title.to_lowercase();

    for (code, names) in tables::TITLE_NAMES {
        if names.iter().any(|name| lower.contains(name)) {
            debug!("Detected language '{}' from title '{}'", code, title);
            return Some(*code);
        }
    }

    TITLE_BRACKET
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| normalize(m.as_str()))
}

/// Resolve a track language from every available source.
///
/// Container metadata wins over the track title, which wins over the
/// file name. An `und` metadata tag carries no information and does not
/// stop the search.
pub fn enhance_detection(
    metadata: Option<&str>,
    filename: &str,
    title: Option<&str>,
) -> Option<&'static str> {
    if let Some(code) = metadata.and_then(normalize)
        && code != UNDEFINED
    {
        return Some(code);
    }

    if let Some(code) = title.and_then(detect_from_title) {
        return Some(code);
    }

    detect_from_filename(filename)
}

/// Human readable name for a language code, echoing the input when unknown
pub fn display_name(code: &str) -> String {
    normalize(code)
        .and_then(|canonical| {
            tables::DISPLAY_NAMES
                .iter()
                .find(|(known, _)| *known == canonical)
                .map(|(_, name)| name.to_string())
        })
        .unwrap_or_else(|| code.to_string())
}

/// Normalize a list of requested languages, keeping unknown tokens lowercased
pub fn normalize_all<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        let code = normalize(token)
            .map(str::to_string)
            .unwrap_or_else(|| token.to_lowercase());
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

/// Every language with a display name, common languages first
pub fn supported_languages() -> Vec<(&'static str, &'static str)> {
    let name_of = |code: &str| {
        tables::DISPLAY_NAMES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown")
    };

    let mut out: Vec<(&'static str, &'static str)> =
        tables::COMMON.iter().map(|code| (*code, name_of(code))).collect();
    for (code, name) in tables::DISPLAY_NAMES {
        if *code != UNDEFINED && !tables::COMMON.contains(code) {
            out.push((*code, *name));
        }
    }
    out
}
