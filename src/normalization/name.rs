//! Club-name canonicalization for fuzzy matching.
//!
//! The output here is a comparison key only; display names are never rewritten.

/// Whole-word tokens dropped from a normalized name.
const SUFFIX_WORDS: [&str; 2] = ["mc", "chapter"];

/// Multi-word suffix phrases dropped from a normalized name.
const SUFFIX_PHRASES: [[&str; 2]; 3] = [
    ["motorcycle", "club"],
    ["riding", "club"],
    ["riders", "club"],
];

/// Build a normalized comparison key from a raw club name.
///
/// Normalization steps:
/// - lowercase
/// - drop a trailing `#<digits>` chapter marker
/// - strip periods so "M.C." folds to "mc" before tokenization
/// - map everything outside `[a-z0-9 ]` to a space and collapse whitespace
/// - remove club-suffix tokens ("mc", "chapter") and phrases
///   ("motorcycle club", "riding club", "riders club") as whole words
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let trimmed = strip_trailing_chapter_number(&lowered);

    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '.' | '\u{2019}' | '\'' => {} // fold "m.c." / "rider's" without splitting the word
            c if c.is_ascii_alphanumeric() => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let kept = drop_suffix_tokens(&words);
    kept.join(" ")
}

/// Drop a trailing "#<digits>" token (e.g. "Night Wolves #12").
fn strip_trailing_chapter_number(s: &str) -> &str {
    let trimmed = s.trim_end();
    if let Some(idx) = trimmed.rfind('#') {
        let tail = &trimmed[idx + 1..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            return trimmed[..idx].trim_end();
        }
    }
    trimmed
}

fn drop_suffix_tokens<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let mut out: Vec<&'a str> = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        if i + 1 < words.len()
            && SUFFIX_PHRASES
                .iter()
                .any(|p| p[0] == words[i] && p[1] == words[i + 1])
        {
            i += 2;
            continue;
        }
        if SUFFIX_WORDS.contains(&words[i]) {
            i += 1;
            continue;
        }
        out.push(words[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_mc_suffix_variants() {
        assert_eq!(normalize_name("Iron Horsemen MC"), "iron horsemen");
        assert_eq!(normalize_name("Iron Horsemen M.C."), "iron horsemen");
        assert_eq!(
            normalize_name("Iron Horsemen Motorcycle Club"),
            "iron horsemen"
        );
    }

    #[test]
    fn strips_riding_and_riders_club() {
        assert_eq!(normalize_name("Desert Eagles Riding Club"), "desert eagles");
        assert_eq!(normalize_name("Desert Eagles Riders Club"), "desert eagles");
    }

    #[test]
    fn strips_chapter_and_trailing_number() {
        assert_eq!(normalize_name("Night Wolves Chapter #12"), "night wolves");
        assert_eq!(normalize_name("Night Wolves #3"), "night wolves");
    }

    #[test]
    fn filters_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize_name("  Röad-Dogs   (East) "), "r ad dogs east");
        assert_eq!(normalize_name("Rider's Edge"), "riders edge");
    }

    #[test]
    fn keeps_interior_tokens_intact() {
        // "club" alone is not a suffix token; only the listed phrases are.
        assert_eq!(normalize_name("Clubhouse Riders"), "clubhouse riders");
    }

    #[test]
    fn empty_and_suffix_only_inputs() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("MC"), "");
        assert_eq!(normalize_name("Motorcycle Club"), "");
    }
}
