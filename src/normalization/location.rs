//! City and state canonicalization.
//!
//! States resolve against a fixed table of the 50 US states plus DC. Anything
//! that does not resolve is an unrecognized-state sentinel (`None`) and must be
//! skipped by the caller; the table never guesses.

/// Canonical state reference: lowercase two-letter code plus display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsState {
    pub code: &'static str,
    pub name: &'static str,
}

const STATES: [UsState; 51] = [
    UsState { code: "al", name: "Alabama" },
    UsState { code: "ak", name: "Alaska" },
    UsState { code: "az", name: "Arizona" },
    UsState { code: "ar", name: "Arkansas" },
    UsState { code: "ca", name: "California" },
    UsState { code: "co", name: "Colorado" },
    UsState { code: "ct", name: "Connecticut" },
    UsState { code: "de", name: "Delaware" },
    UsState { code: "dc", name: "District of Columbia" },
    UsState { code: "fl", name: "Florida" },
    UsState { code: "ga", name: "Georgia" },
    UsState { code: "hi", name: "Hawaii" },
    UsState { code: "id", name: "Idaho" },
    UsState { code: "il", name: "Illinois" },
    UsState { code: "in", name: "Indiana" },
    UsState { code: "ia", name: "Iowa" },
    UsState { code: "ks", name: "Kansas" },
    UsState { code: "ky", name: "Kentucky" },
    UsState { code: "la", name: "Louisiana" },
    UsState { code: "me", name: "Maine" },
    UsState { code: "md", name: "Maryland" },
    UsState { code: "ma", name: "Massachusetts" },
    UsState { code: "mi", name: "Michigan" },
    UsState { code: "mn", name: "Minnesota" },
    UsState { code: "ms", name: "Mississippi" },
    UsState { code: "mo", name: "Missouri" },
    UsState { code: "mt", name: "Montana" },
    UsState { code: "ne", name: "Nebraska" },
    UsState { code: "nv", name: "Nevada" },
    UsState { code: "nh", name: "New Hampshire" },
    UsState { code: "nj", name: "New Jersey" },
    UsState { code: "nm", name: "New Mexico" },
    UsState { code: "ny", name: "New York" },
    UsState { code: "nc", name: "North Carolina" },
    UsState { code: "nd", name: "North Dakota" },
    UsState { code: "oh", name: "Ohio" },
    UsState { code: "ok", name: "Oklahoma" },
    UsState { code: "or", name: "Oregon" },
    UsState { code: "pa", name: "Pennsylvania" },
    UsState { code: "ri", name: "Rhode Island" },
    UsState { code: "sc", name: "South Carolina" },
    UsState { code: "sd", name: "South Dakota" },
    UsState { code: "tn", name: "Tennessee" },
    UsState { code: "tx", name: "Texas" },
    UsState { code: "ut", name: "Utah" },
    UsState { code: "vt", name: "Vermont" },
    UsState { code: "va", name: "Virginia" },
    UsState { code: "wa", name: "Washington" },
    UsState { code: "wv", name: "West Virginia" },
    UsState { code: "wi", name: "Wisconsin" },
    UsState { code: "wy", name: "Wyoming" },
];

/// Resolve a free-form state name or code to its canonical entry.
///
/// Accepts either the two-letter code ("TX", "tx") or the full name
/// ("Texas"), case-insensitively. Returns `None` for anything else.
pub fn normalize_state(raw: &str) -> Option<&'static UsState> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    STATES
        .iter()
        .find(|s| s.code == needle || s.name.to_lowercase() == needle)
}

/// Normalize a city for storage and comparison: lowercase, restricted to
/// `[a-z0-9 -]`, repeated separators collapsed, edge separators trimmed.
pub fn normalize_city(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_sep: Option<char> = None;
    for c in raw.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_sep = None;
        } else if c == ' ' || c == '-' {
            if prev_sep != Some(c) {
                out.push(c);
            }
            prev_sep = Some(c);
        }
        // everything else is dropped
    }
    out.trim_matches([' ', '-']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_codes_and_names() {
        assert_eq!(normalize_state("TX").map(|s| s.code), Some("tx"));
        assert_eq!(normalize_state("texas").map(|s| s.name), Some("Texas"));
        assert_eq!(
            normalize_state(" District of Columbia ").map(|s| s.code),
            Some("dc")
        );
    }

    #[test]
    fn unknown_states_are_sentinels_not_guesses() {
        assert!(normalize_state("Texaz").is_none());
        assert!(normalize_state("PR").is_none());
        assert!(normalize_state("").is_none());
    }

    #[test]
    fn city_charset_and_separator_collapse() {
        assert_eq!(normalize_city("St. Paul"), "st paul");
        assert_eq!(normalize_city("Winston--Salem"), "winston-salem");
        assert_eq!(normalize_city("  Los   Angeles  "), "los angeles");
        assert_eq!(normalize_city("-Coeur d'Alene-"), "coeur dalene");
    }
}
