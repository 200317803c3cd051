//! Client-side result filters.
//!
//! Two independent, case-insensitive substring filters: one over the title,
//! one over the domain. A filter whose pattern is blank (after trimming) is
//! inactive. Active filters compose conjunctively. No regex, no tokenization.

use crate::models::ArticleRecord;

/// Title and domain filters applied after fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub title: String,
    pub domain: String,
}

impl ResultFilter {
    pub fn new(title: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            domain: domain.into(),
        }
    }

    /// `true` when at least one pattern is non-blank.
    pub fn is_active(&self) -> bool {
        is_active(&self.title) || is_active(&self.domain)
    }

    /// Whether a single record passes both filters.
    pub fn matches(&self, record: &ArticleRecord) -> bool {
        field_matches(&record.title, &self.title) && field_matches(&record.domain, &self.domain)
    }

    /// Keep only the records that pass, preserving their order.
    pub fn apply(&self, records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
        if !self.is_active() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn is_active(pattern: &str) -> bool {
    !pattern.trim().is_empty()
}

/// Case-insensitive containment. Inactive patterns match everything; an
/// empty field never matches an active pattern.
fn field_matches(field: &str, pattern: &str) -> bool {
    if !is_active(pattern) {
        return true;
    }
    !field.is_empty() && field.to_lowercase().contains(&pattern.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GDELT_PROVIDER;
    use chrono::NaiveDate;

    fn record(title: &str, domain: &str) -> ArticleRecord {
        ArticleRecord {
            published_at: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            title: title.to_string(),
            source_label: String::new(),
            domain: domain.to_string(),
            url: String::new(),
            snippet: String::new(),
            provider: GDELT_PROVIDER.to_string(),
        }
    }

    fn sample() -> Vec<ArticleRecord> {
        vec![
            record("Harcèlement au Festival de Cannes", "lemonde.fr"),
            record("Une exposition relance le débat", "liberation.fr"),
            record("Festival d'Avignon: plainte déposée", "liberation.fr"),
            record("", "lemonde.fr"),
            record("Théâtre: témoignages", ""),
        ]
    }

    fn titles(records: &[ArticleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_domain_filter_keeps_only_matching_domain() {
        let out = ResultFilter::new("", "lemonde.fr").apply(sample());
        assert!(out.iter().all(|r| r.domain == "lemonde.fr"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_title_filter_is_case_insensitive() {
        let out = ResultFilter::new("FESTIVAL", "").apply(sample());
        assert_eq!(
            titles(&out),
            vec![
                "Harcèlement au Festival de Cannes",
                "Festival d'Avignon: plainte déposée"
            ]
        );
    }

    #[test]
    fn test_non_ascii_case_folding() {
        let out = ResultFilter::new("THÉÂTRE", "").apply(sample());
        assert_eq!(titles(&out), vec!["Théâtre: témoignages"]);
    }

    #[test]
    fn test_blank_patterns_are_inactive() {
        let filter = ResultFilter::new("   ", "\t");
        assert!(!filter.is_active());
        assert_eq!(filter.apply(sample()).len(), sample().len());
    }

    #[test]
    fn test_empty_fields_never_match_active_pattern() {
        let out = ResultFilter::new("", "fr").apply(sample());
        assert!(out.iter().all(|r| !r.domain.is_empty()));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_title_filter_is_idempotent() {
        let filter = ResultFilter::new("festival", "");
        let once = filter.apply(sample());
        let twice = filter.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filters_compose_as_intersection() {
        let both = ResultFilter::new("festival", "liberation").apply(sample());
        let by_title = ResultFilter::new("festival", "").apply(sample());
        let by_domain = ResultFilter::new("", "liberation").apply(sample());

        let intersection: Vec<ArticleRecord> = by_title
            .into_iter()
            .filter(|r| by_domain.contains(r))
            .collect();

        assert_eq!(both, intersection);
        assert_eq!(titles(&both), vec!["Festival d'Avignon: plainte déposée"]);
    }

    #[test]
    fn test_no_regex_interpretation() {
        let out = ResultFilter::new("festival.*cannes", "").apply(sample());
        assert!(out.is_empty());
    }
}
