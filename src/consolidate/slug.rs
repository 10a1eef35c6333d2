//! Slug derivation and run-local unique allocation.
//!
//! The reserved set is an explicit value owned by the allocator for the
//! duration of one run. It is never re-read from storage mid-run, so two
//! colliding new records in the same batch resolve consistently.

use std::collections::HashSet;

/// URL-safe slug: lowercase, `[a-z0-9-]`, hyphen runs collapsed, no edge hyphens.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_hyphen = false;
    for c in s.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            out.push('-');
            prev_hyphen = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Hands out globally unique slugs against an in-memory reserved set.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    reserved: HashSet<String>,
}

impl SlugAllocator {
    /// Seed the allocator with every slug already issued in the canonical set.
    pub fn with_reserved<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: slugs.into_iter().map(Into::into).collect(),
        }
    }

    /// Reserve and return `base` if free, otherwise probe `base-2`, `base-3`,
    /// … until an unreserved candidate is found. Deterministic: the same
    /// reserved set and base always yield the same slug.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.reserved.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n: u64 = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.reserved.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn is_reserved(&self, slug: &str) -> bool {
        self.reserved.contains(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Thunder Riders"), "thunder-riders");
        assert_eq!(slugify("  Röad--Dogs! "), "r-ad-dogs");
        assert_eq!(slugify("Iron Horsemen M.C."), "iron-horsemen-m-c");
    }

    #[test]
    fn first_caller_gets_the_base() {
        let mut alloc = SlugAllocator::default();
        assert_eq!(alloc.allocate("thunder-riders-tx"), "thunder-riders-tx");
        assert_eq!(alloc.allocate("thunder-riders-tx"), "thunder-riders-tx-2");
        assert_eq!(alloc.allocate("thunder-riders-tx"), "thunder-riders-tx-3");
    }

    #[test]
    fn prior_reservation_forces_suffix() {
        let mut alloc = SlugAllocator::with_reserved(["foo"]);
        assert_eq!(alloc.allocate("foo"), "foo-2");
    }

    #[test]
    fn colliding_batch_yields_distinct_slugs() {
        let mut alloc = SlugAllocator::default();
        let issued: HashSet<String> = (0..10).map(|_| alloc.allocate("base")).collect();
        assert_eq!(issued.len(), 10);
    }

    #[test]
    fn probing_skips_pre_reserved_suffixes() {
        let mut alloc = SlugAllocator::with_reserved(["foo", "foo-2", "foo-3"]);
        assert_eq!(alloc.allocate("foo"), "foo-4");
    }
}
