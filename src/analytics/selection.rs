//! Drug selection
//!
//! The set of drugs currently chosen for display and aggregation. Every
//! mutation is checked against the dataset so the set never holds a name the
//! dataset does not know.

use serde::Serialize;
use std::collections::BTreeSet;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::data::Dataset;

/// Set of selected drug names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    drugs: BTreeSet<String>,
}

impl Selection {
    /// Every drug in the dataset
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            drugs: dataset.drugs().map(str::to_string).collect(),
        }
    }

    /// The empty selection
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a selection from names, rejecting any the dataset does not contain
    pub fn from_drugs<I, S>(dataset: &Dataset, drugs: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::none();
        for drug in drugs {
            let drug = drug.as_ref().trim();
            if drug.is_empty() {
                continue;
            }
            if !dataset.contains(drug) {
                return Err(AnalyticsError::UnknownDrug(drug.to_string()));
            }
            selection.drugs.insert(drug.to_string());
        }
        Ok(selection)
    }

    /// Parse a comma-separated list of drug names. An empty string is the empty selection.
    pub fn parse(dataset: &Dataset, list: &str) -> AnalyticsResult<Self> {
        Self::from_drugs(dataset, list.split(','))
    }

    /// Flip membership of `drug`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, dataset: &Dataset, drug: &str) -> AnalyticsResult<bool> {
        if !dataset.contains(drug) {
            return Err(AnalyticsError::UnknownDrug(drug.to_string()));
        }

        if self.drugs.remove(drug) {
            tracing::trace!(drug, "Drug deselected");
            Ok(false)
        } else {
            self.drugs.insert(drug.to_string());
            tracing::trace!(drug, "Drug selected");
            Ok(true)
        }
    }

    /// Reset to every known drug
    pub fn select_all(&mut self, dataset: &Dataset) {
        *self = Self::all(dataset);
    }

    pub fn clear(&mut self) {
        self.drugs.clear();
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.drugs.contains(drug)
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Whether every drug in the dataset is selected
    pub fn is_all(&self, dataset: &Dataset) -> bool {
        dataset.drugs().all(|d| self.contains(d))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.drugs.iter().map(String::as_str)
    }

    /// Selected drugs in palette order
    pub fn ordered<'a>(&self, dataset: &'a Dataset) -> Vec<&'a str> {
        dataset.drugs().filter(|d| self.contains(d)).collect()
    }

    /// Comma-separated form accepted by [`Selection::parse`]
    pub fn to_query(&self, dataset: &Dataset) -> String {
        self.ordered(dataset).join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_and_none() {
        let ds = Dataset::builtin();
        let all = Selection::all(ds);
        assert_eq!(all.len(), 5);
        assert!(all.is_all(ds));
        assert!(Selection::none().is_empty());
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let ds = Dataset::builtin();
        for drug in ds.drugs() {
            let original = Selection::parse(ds, "Fentanyl,Cocaine").unwrap();
            let mut s = original.clone();
            s.toggle(ds, drug).unwrap();
            assert_ne!(s, original);
            s.toggle(ds, drug).unwrap();
            assert_eq!(s, original);
        }
    }

    #[test]
    fn test_toggle_reports_membership() {
        let ds = Dataset::builtin();
        let mut s = Selection::none();
        assert_eq!(s.toggle(ds, "Heroin"), Ok(true));
        assert!(s.contains("Heroin"));
        assert_eq!(s.toggle(ds, "Heroin"), Ok(false));
        assert!(!s.contains("Heroin"));
    }

    #[test]
    fn test_toggle_unknown_is_refused() {
        let ds = Dataset::builtin();
        let mut s = Selection::all(ds);
        assert_eq!(
            s.toggle(ds, "Kratom"),
            Err(AnalyticsError::UnknownDrug("Kratom".to_string()))
        );
        assert_eq!(s, Selection::all(ds));
    }

    #[test]
    fn test_select_all_then_clear() {
        let ds = Dataset::builtin();
        let mut s = Selection::parse(ds, "Heroin").unwrap();
        s.select_all(ds);
        assert!(s.is_all(ds));
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_parse() {
        let ds = Dataset::builtin();
        let s = Selection::parse(ds, " Heroin , Prescription Opioids ").unwrap();
        assert_eq!(s.len(), 2);
        assert!(Selection::parse(ds, "").unwrap().is_empty());
        assert!(Selection::parse(ds, "Heroin,Kratom").is_err());
    }

    #[test]
    fn test_ordered_follows_palette() {
        let ds = Dataset::builtin();
        let s = Selection::parse(ds, "Heroin,Fentanyl,Cocaine").unwrap();
        assert_eq!(s.ordered(ds), vec!["Fentanyl", "Cocaine", "Heroin"]);
        assert_eq!(s.to_query(ds), "Fentanyl,Cocaine,Heroin");
    }

    #[test]
    fn test_serializes_as_name_list() {
        let ds = Dataset::builtin();
        let s = Selection::parse(ds, "Heroin,Cocaine").unwrap();
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"drugs":["Cocaine","Heroin"]}"#
        );
    }
}
