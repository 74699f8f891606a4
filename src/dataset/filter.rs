//! Record filtering and filter option lists

use std::collections::{BTreeSet, HashMap};

use super::schema::DoctorRecord;

/// Select value meaning "no restriction"
pub const ALL: &str = "all";

/// Map a select value to an optional filter term
pub fn selection(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == ALL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Specialty and governorate filter, recomputed from the full set each time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    /// Exact specialty match
    pub specialty: Option<String>,
    /// Substring of the address
    pub governorate: Option<String>,
}

impl DoctorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn with_governorate(mut self, governorate: impl Into<String>) -> Self {
        self.governorate = Some(governorate.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.specialty.is_none() && self.governorate.is_none()
    }

    pub fn matches<T: DoctorRecord>(&self, record: &T) -> bool {
        let listing = record.listing();
        if let Some(specialty) = &self.specialty {
            if &listing.specialty != specialty {
                return false;
            }
        }
        if let Some(governorate) = &self.governorate {
            if !listing.address.contains(governorate.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a, T: DoctorRecord>(&self, records: &'a [T]) -> Vec<&'a T> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }

    pub fn count<T: DoctorRecord>(&self, records: &[T]) -> usize {
        records.iter().filter(|r| self.matches(*r)).count()
    }
}

/// Alphabetical distinct non-empty values
pub fn distinct_sorted<T, F>(records: &[T], key: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    records
        .iter()
        .map(|r| key(r))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct non-empty values with counts, most frequent first.
/// Ties keep alphabetical order.
pub fn rank_by_frequency<T, F>(records: &[T], key: F) -> Vec<(String, usize)>
where
    F: Fn(&T) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in records.iter().map(|r| key(r)).filter(|v| !v.is_empty()) {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::{CsvSchema, ProfileRecord};

    fn record(specialty: &str, address: &str) -> ProfileRecord {
        let fields: Vec<String> = ["", "Dr", specialty, "", "", address, "36.8", "10.2"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        ProfileRecord::from_fields(&fields)
    }

    fn records() -> Vec<ProfileRecord> {
        vec![
            record("Cardiologue", "Avenue Habib Bourguiba Tunis"),
            record("ORL", "Rue de Carthage Tunis"),
            record("Cardiologue", "Route de Gabès Sfax"),
            record("Pédiatre", "Cité El Ghazela Ariana"),
            record("Cardiologue", "Centre Urbain Nord Tunis"),
        ]
    }

    #[test]
    fn test_selection() {
        assert_eq!(selection("all"), None);
        assert_eq!(selection(""), None);
        assert_eq!(selection("ORL"), Some("ORL".to_string()));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let records = records();
        let filter = DoctorFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.count(&records), 5);
    }

    #[test]
    fn test_specialty_is_exact() {
        let records = records();
        assert_eq!(DoctorFilter::new().with_specialty("Cardiologue").count(&records), 3);
        assert_eq!(DoctorFilter::new().with_specialty("Cardio").count(&records), 0);
    }

    #[test]
    fn test_combined_filter() {
        let records = records();
        let filter = DoctorFilter::new()
            .with_specialty("Cardiologue")
            .with_governorate("Tunis");
        let hits = filter.apply(&records);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.listing.address.ends_with("Tunis")));
    }

    #[test]
    fn test_distinct_sorted() {
        let records = records();
        assert_eq!(
            distinct_sorted(&records, |r| r.listing.governorate()),
            vec!["Ariana", "Sfax", "Tunis"]
        );
    }

    #[test]
    fn test_rank_by_frequency() {
        let records = records();
        let ranked = rank_by_frequency(&records, |r| r.listing.specialty.as_str());
        assert_eq!(
            ranked,
            vec![
                ("Cardiologue".to_string(), 3),
                ("ORL".to_string(), 1),
                ("Pédiatre".to_string(), 1),
            ]
        );
    }
}
