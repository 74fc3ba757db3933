//! City data resolver.
//!
//! [`Cities`] turns document keys from a [`ContentSource`] into
//! [`CityRecord`]s. Nothing is cached: every listing call re-reads the
//! source, and failures degrade to `None` or an omitted record.

use std::sync::Arc;

use cs_storage::ContentSource;

use crate::record::{CityRecord, StateSummary};

/// Resolves city slugs to records and enumerates cities.
///
/// Cheap to clone; all clones share the same content source.
#[derive(Clone)]
pub struct Cities {
    source: Arc<dyn ContentSource>,
}

impl Cities {
    /// Create a resolver over a content source.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Resolve one city by slug.
    ///
    /// The slug is lowercased first. Slugs that could address anything other
    /// than a single root-level document resolve to `None` without touching
    /// storage. Missing documents log at debug, unreadable or malformed ones
    /// at warn.
    #[must_use]
    pub fn resolve(&self, slug: &str) -> Option<CityRecord> {
        let slug = slug.to_lowercase();
        if !is_clean_slug(&slug) {
            tracing::debug!(slug = %slug, "Rejected city slug");
            return None;
        }

        let raw = match self.source.read(&slug) {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                tracing::debug!(slug = %slug, "City not found");
                return None;
            }
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "Failed to read city");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "Failed to parse city");
                None
            }
        }
    }

    /// All city slugs, in the content source's enumeration order.
    ///
    /// An unreadable source yields an empty list.
    #[must_use]
    pub fn list_all_slugs(&self) -> Vec<String> {
        match self.source.list() {
            Ok(slugs) => slugs,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list cities");
                Vec::new()
            }
        }
    }

    /// Every city that resolves, in slug listing order.
    #[must_use]
    pub fn list_all(&self) -> Vec<CityRecord> {
        let records: Vec<_> = self
            .list_all_slugs()
            .iter()
            .filter_map(|slug| self.resolve(slug))
            .collect();
        tracing::debug!(city_count = records.len(), "City listing completed");
        records
    }

    /// Cities grouped by uppercased state code.
    ///
    /// Groups appear in order of first occurrence; cities within a group keep
    /// [`list_all`](Self::list_all) order.
    #[must_use]
    pub fn group_by_state(&self) -> Vec<(String, Vec<CityRecord>)> {
        group_records(self.list_all())
    }

    /// One summary per state present in the data, sorted by state name.
    #[must_use]
    pub fn summarize_states(&self) -> Vec<StateSummary> {
        summarize_groups(self.group_by_state())
    }

    /// Cities whose state code matches `code`, case-insensitively.
    #[must_use]
    pub fn cities_for_state(&self, code: &str) -> Vec<CityRecord> {
        self.list_all()
            .into_iter()
            .filter(|c| c.in_state(code))
            .collect()
    }
}

impl std::fmt::Debug for Cities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cities")
            .field("available", &self.source.is_available())
            .finish()
    }
}

fn is_clean_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}

fn group_records(records: Vec<CityRecord>) -> Vec<(String, Vec<CityRecord>)> {
    let mut groups: Vec<(String, Vec<CityRecord>)> = Vec::new();
    for record in records {
        let code = record.state.to_uppercase();
        match groups.iter_mut().find(|(c, _)| *c == code) {
            Some((_, cities)) => cities.push(record),
            None => groups.push((code, vec![record])),
        }
    }
    groups
}

fn summarize_groups(groups: Vec<(String, Vec<CityRecord>)>) -> Vec<StateSummary> {
    let mut summaries: Vec<_> = groups
        .into_iter()
        .filter_map(|(state, cities)| {
            let first = cities.first()?;
            Some(StateSummary {
                state_name: first.state_name.clone(),
                count: cities.len(),
                state,
            })
        })
        .collect();
    summaries.sort_by(|a, b| a.state_name.cmp(&b.state_name));
    summaries
}

#[cfg(test)]
mod tests {
    use cs_storage::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;

    fn city_json(slug: &str, city: &str, state: &str, state_name: &str) -> String {
        format!(
            r#"{{"slug":"{slug}","city":"{city}","state":"{state}","state_name":"{state_name}"}}"#
        )
    }

    fn texas_source() -> MockSource {
        MockSource::new()
            .with_entry("austin-tx", city_json("austin-tx", "Austin", "TX", "Texas"))
            .with_entry("dallas-tx", city_json("dallas-tx", "Dallas", "TX", "Texas"))
    }

    fn mixed_source() -> MockSource {
        MockSource::new()
            .with_entry("reno-nv", city_json("reno-nv", "Reno", "NV", "Nevada"))
            .with_entry("austin-tx", city_json("austin-tx", "Austin", "TX", "Texas"))
            .with_entry("akron-oh", city_json("akron-oh", "Akron", "oh", "Ohio"))
            .with_entry("dallas-tx", city_json("dallas-tx", "Dallas", "tx", "Texas"))
            .with_entry("broken-ca", "{ not json")
    }

    fn cities(source: MockSource) -> Cities {
        Cities::new(Arc::new(source))
    }

    #[test]
    fn test_cities_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cities>();
    }

    #[test]
    fn test_resolve_known() {
        let cities = cities(texas_source());

        let record = cities.resolve("austin-tx").unwrap();

        assert_eq!(record.city, "Austin");
        assert_eq!(record.state_name, "Texas");
    }

    #[test]
    fn test_resolve_lowercases_slug() {
        let cities = cities(texas_source());

        assert_eq!(cities.resolve("Austin-TX").unwrap().slug, "austin-tx");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let cities = cities(texas_source());

        assert_eq!(cities.resolve("dallas-tx"), cities.resolve("dallas-tx"));
    }

    #[test]
    fn test_resolve_unknown() {
        let cities = cities(texas_source());

        assert!(cities.resolve("nowhere-zz").is_none());
    }

    #[test]
    fn test_resolve_malformed() {
        let cities = cities(mixed_source());

        assert!(cities.resolve("broken-ca").is_none());
    }

    #[test]
    fn test_resolve_rejects_unclean_slugs() {
        let cities = cities(texas_source());

        for slug in ["", "../austin-tx", "tx/austin-tx", "a\\b", ".."] {
            assert!(cities.resolve(slug).is_none(), "slug {slug:?}");
        }
    }

    #[test]
    fn test_resolve_unavailable_source() {
        let cities = cities(MockSource::unavailable());

        assert!(cities.resolve("austin-tx").is_none());
        assert!(cities.list_all_slugs().is_empty());
        assert!(cities.summarize_states().is_empty());
    }

    #[test]
    fn test_list_all_slugs_in_source_order() {
        let cities = cities(mixed_source());

        assert_eq!(
            cities.list_all_slugs(),
            vec!["reno-nv", "austin-tx", "akron-oh", "dallas-tx", "broken-ca"]
        );
    }

    #[test]
    fn test_every_listed_record_resolves() {
        let cities = cities(mixed_source());

        let all = cities.list_all();

        assert_eq!(all.len(), 4);
        for record in &all {
            assert_eq!(cities.resolve(&record.slug).as_ref(), Some(record));
        }
    }

    #[test]
    fn test_group_by_state_partitions() {
        let cities = cities(mixed_source());

        let groups = cities.group_by_state();
        let codes: Vec<_> = groups.iter().map(|(code, _)| code.as_str()).collect();

        assert_eq!(codes, vec!["NV", "TX", "OH"]);
        let total: usize = groups.iter().map(|(_, c)| c.len()).sum();
        assert_eq!(total, cities.list_all().len());
        for (code, members) in &groups {
            assert!(members.iter().all(|c| c.state.to_uppercase() == *code));
        }

        let texas: Vec<_> = groups[1].1.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(texas, vec!["austin-tx", "dallas-tx"]);
    }

    #[test]
    fn test_summarize_states_sorted_by_name() {
        let cities = cities(mixed_source());

        let summaries = cities.summarize_states();

        assert_eq!(
            summaries,
            vec![
                StateSummary {
                    state: "NV".to_owned(),
                    state_name: "Nevada".to_owned(),
                    count: 1,
                },
                StateSummary {
                    state: "OH".to_owned(),
                    state_name: "Ohio".to_owned(),
                    count: 1,
                },
                StateSummary {
                    state: "TX".to_owned(),
                    state_name: "Texas".to_owned(),
                    count: 2,
                },
            ]
        );
        let total: usize = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, cities.list_all().len());
    }

    #[test]
    fn test_texas_example() {
        let cities = cities(texas_source());

        assert_eq!(
            cities.summarize_states(),
            vec![StateSummary {
                state: "TX".to_owned(),
                state_name: "Texas".to_owned(),
                count: 2,
            }]
        );
        assert_eq!(cities.cities_for_state("tx").len(), 2);
        assert!(cities.cities_for_state("ca").is_empty());
    }

    #[test]
    fn test_cities_for_state_case_insensitive() {
        let cities = cities(mixed_source());

        let upper: Vec<_> = cities.cities_for_state("TX").into_iter().map(|c| c.slug).collect();
        let lower: Vec<_> = cities.cities_for_state("tx").into_iter().map(|c| c.slug).collect();

        assert_eq!(upper, vec!["austin-tx".to_owned(), "dallas-tx".to_owned()]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_listing_reflects_new_entries() {
        let source = Arc::new(texas_source());
        let cities = Cities::new(Arc::clone(&source) as Arc<dyn ContentSource>);
        assert_eq!(cities.list_all_slugs().len(), 2);

        source.insert("houston-tx", city_json("houston-tx", "Houston", "TX", "Texas"));

        assert_eq!(cities.list_all_slugs().len(), 3);
        assert_eq!(cities.cities_for_state("tx").len(), 3);
    }
}
