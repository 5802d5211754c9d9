use serde::Serialize;

use crate::api::models::Repository;
use crate::filter::matcher::PropertyMatch;

/// Order-preserving buckets of repository names produced by a scan.
///
/// `public_matched` overlaps `matched`; nothing is deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub matched: Vec<String>,
    pub public_matched: Vec<String>,
    pub unmatched: Vec<String>,
    pub missing_property: Vec<String>,
    pub public: Vec<String>,
    pub skipped: Vec<String>,
    pub checked: usize,
}

impl Classification {
    /// Classify a repository whose visibility is known.
    pub fn record(&mut self, repo: &Repository, outcome: &PropertyMatch) {
        self.record_named(&repo.name, Some(repo.is_public_active()), outcome);
    }

    /// Classify by name only; `public_active` is `None` when the source
    /// carried no visibility data, which keeps the repository out of
    /// `public_matched`.
    pub fn record_named(&mut self, name: &str, public_active: Option<bool>, outcome: &PropertyMatch) {
        self.checked += 1;
        match outcome {
            PropertyMatch::NotFound => self.missing_property.push(name.to_string()),
            found if found.is_match() => {
                self.matched.push(name.to_string());
                if public_active == Some(true) {
                    self.public_matched.push(name.to_string());
                }
            }
            PropertyMatch::Found { .. } => self.unmatched.push(name.to_string()),
        }
    }

    /// Public-only mode: visibility decides, properties are never consulted.
    pub fn record_public_only(&mut self, repo: &Repository) {
        if repo.is_public_active() {
            self.public.push(repo.name.clone());
        }
    }

    /// A repository whose properties could not be fetched.
    pub fn record_skipped(&mut self, name: &str) {
        self.skipped.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, private: bool, archived: bool) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            private,
            archived,
            security_and_analysis: None,
        }
    }

    fn found(matched: bool) -> PropertyMatch {
        PropertyMatch::Found {
            value: "yes".to_string(),
            matched,
        }
    }

    #[test]
    fn test_public_match_lands_in_both_buckets() {
        let mut classification = Classification::default();
        classification.record(&repo("web", false, false), &found(true));

        assert_eq!(classification.matched, vec!["web"]);
        assert_eq!(classification.public_matched, vec!["web"]);
        assert_eq!(classification.checked, 1);
    }

    #[test]
    fn test_private_never_public_matched() {
        let mut classification = Classification::default();
        classification.record(&repo("secret", true, false), &found(true));
        classification.record(&repo("old", false, true), &found(true));

        assert_eq!(classification.matched, vec!["secret", "old"]);
        assert!(classification.public_matched.is_empty());
    }

    #[test]
    fn test_missing_and_unmatched_are_distinct() {
        let mut classification = Classification::default();
        classification.record(&repo("a", false, false), &PropertyMatch::NotFound);
        classification.record(&repo("b", false, false), &found(false));

        assert_eq!(classification.missing_property, vec!["a"]);
        assert_eq!(classification.unmatched, vec!["b"]);
        assert!(classification.matched.is_empty());
    }

    #[test]
    fn test_unknown_visibility_is_not_public_matched() {
        let mut classification = Classification::default();
        classification.record_named("api", None, &found(true));

        assert_eq!(classification.matched, vec!["api"]);
        assert!(classification.public_matched.is_empty());
    }

    #[test]
    fn test_public_only_uses_visibility() {
        let mut classification = Classification::default();
        for r in [
            repo("open", false, false),
            repo("closed", true, false),
            repo("frozen", false, true),
        ] {
            classification.record_public_only(&r);
        }

        assert_eq!(classification.public, vec!["open"]);
        assert_eq!(classification.checked, 0);
        assert!(classification.matched.is_empty());
    }

    #[test]
    fn test_order_preserved_and_duplicates_kept() {
        let mut classification = Classification::default();
        for name in ["c", "a", "c"] {
            classification.record(&repo(name, false, false), &found(true));
        }
        assert_eq!(classification.matched, vec!["c", "a", "c"]);
    }
}
