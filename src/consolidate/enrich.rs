//! Field-level enrichment: fill empty fields from a newly observed duplicate,
//! never overwrite populated ones. Identity fields (external id, slug, name,
//! city, state) are immutable here — a later, noisier source must not drift a
//! canonical record's identity.

use crate::consolidate::model::ClubRecord;

/// Merge `incoming` into `existing` under the fill-if-empty policy.
/// Returns whether anything actually changed; an unchanged merge must be
/// counted as skipped, not enriched.
pub fn enrich(existing: &mut ClubRecord, incoming: &ClubRecord) -> bool {
    let mut changed = false;
    changed |= fill(&mut existing.phone, &incoming.phone);
    changed |= fill(&mut existing.website, &incoming.website);
    changed |= fill(&mut existing.description, &incoming.description);
    changed |= fill(&mut existing.map_link, &incoming.map_link);
    changed |= fill(&mut existing.featured_image, &incoming.featured_image);
    changed
}

/// Set `slot` from `value` only when `slot` is absent or blank and `value`
/// is present and non-blank.
fn fill(slot: &mut Option<String>, value: &Option<String>) -> bool {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if !empty {
        return false;
    }
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => {
            *slot = Some(v.to_string());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::model::test_club;

    #[test]
    fn fills_empty_fields_only() {
        let mut existing = test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin");
        existing.phone = Some(String::new());
        existing.website = Some("http://a.com".to_string());

        let mut incoming = test_club("x2", "a2-tx", "A", ("tx", "Texas"), "Austin");
        incoming.phone = Some("555-1234".to_string());
        incoming.website = Some("http://b.com".to_string());

        let changed = enrich(&mut existing, &incoming);
        assert!(changed);
        assert_eq!(existing.phone.as_deref(), Some("555-1234"));
        // Populated website is never clobbered.
        assert_eq!(existing.website.as_deref(), Some("http://a.com"));
    }

    #[test]
    fn no_change_reports_false() {
        let mut existing = test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin");
        existing.phone = Some("555-0000".to_string());
        existing.website = Some("http://a.com".to_string());

        let mut incoming = test_club("x2", "a2-tx", "A", ("tx", "Texas"), "Austin");
        incoming.phone = Some("555-9999".to_string());

        assert!(!enrich(&mut existing, &incoming));
        assert_eq!(existing.phone.as_deref(), Some("555-0000"));
    }

    #[test]
    fn blank_incoming_values_do_not_fill() {
        let mut existing = test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin");
        let mut incoming = test_club("x2", "a2-tx", "A", ("tx", "Texas"), "Austin");
        incoming.description = Some("   ".to_string());
        assert!(!enrich(&mut existing, &incoming));
        assert!(existing.description.is_none());
    }

    #[test]
    fn identity_fields_are_untouched() {
        let mut existing = test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin");
        let incoming = test_club("x2", "b-ca", "B", ("ca", "California"), "Fresno");
        enrich(&mut existing, &incoming);
        assert_eq!(existing.external_id, "x1");
        assert_eq!(existing.slug, "a-tx");
        assert_eq!(existing.name, "A");
        assert_eq!(existing.state_code, "tx");
        assert_eq!(existing.city, "Austin");
    }
}
