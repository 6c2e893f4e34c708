//! Normalized trial records and the per-search result set

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Overall status of a registry study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialStatus {
    #[default]
    Unknown,
    ActiveNotRecruiting,
    Completed,
    Recruiting,
    Terminated,
}

impl TrialStatus {
    /// Map the registry's raw status string. Total: unrecognized values
    /// become [`TrialStatus::Unknown`], never an error.
    pub fn from_registry(raw: &str) -> Self {
        match raw {
            "ACTIVE_NOT_RECRUITING" => Self::ActiveNotRecruiting,
            "COMPLETED" => Self::Completed,
            "RECRUITING" => Self::Recruiting,
            "TERMINATED" => Self::Terminated,
            _ => Self::Unknown,
        }
    }
}

/// Score and matched-concept annotations attached by the ranking pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceMetadata {
    pub relevance_score: u32,
    #[serde(default)]
    pub matched_conditions: Vec<String>,
    #[serde(default)]
    pub matched_interventions: Vec<String>,
    #[serde(default)]
    pub matched_terms: Vec<String>,
}

/// One normalized registry study.
///
/// `protocol_section` carries the registry's nested metadata through
/// untouched for detail display. `relevance_metadata` stays `None` until
/// the ranking pass annotates the trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub nct_id: String,
    pub title: String,
    #[serde(default)]
    pub status: TrialStatus,
    #[serde(default)]
    pub has_results: bool,
    #[serde(default)]
    pub protocol_section: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_metadata: Option<RelevanceMetadata>,
}

impl Trial {
    /// Normalize one raw registry study record.
    ///
    /// A study missing its id or title is still included, with an empty
    /// string in the missing field and a data-quality warning logged.
    pub fn from_study(study: &JsonValue) -> Self {
        let nct_id = study
            .pointer("/protocolSection/identificationModule/nctId")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        let title = study
            .pointer("/protocolSection/identificationModule/briefTitle")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();

        if nct_id.is_empty() {
            tracing::warn!("registry study has no nctId");
        }
        if title.is_empty() {
            tracing::warn!(nct_id = %nct_id, "registry study has no briefTitle");
        }

        let status = study
            .pointer("/protocolSection/statusModule/overallStatus")
            .and_then(JsonValue::as_str)
            .map(TrialStatus::from_registry)
            .unwrap_or_default();
        let has_results = study
            .get("hasResults")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        let protocol_section = study
            .get("protocolSection")
            .cloned()
            .unwrap_or(JsonValue::Null);

        Self {
            nct_id,
            title,
            status,
            has_results,
            protocol_section,
            relevance_metadata: None,
        }
    }
}

/// Insertion-ordered map of trials keyed by registry id.
///
/// Inserting a duplicate id replaces the earlier record in place: a
/// response listing the same study twice keeps the later copy without
/// disturbing display order. Serializes as a JSON object keyed by id, in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialSet {
    order: Vec<String>,
    trials: HashMap<String, Trial>,
}

impl TrialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a registry `studies` array into a fresh set.
    pub fn from_studies(studies: &[JsonValue]) -> Self {
        let mut set = Self::new();
        for study in studies {
            set.insert(Trial::from_study(study));
        }
        set
    }

    /// Insert a trial, replacing any earlier record with the same id.
    pub fn insert(&mut self, trial: Trial) {
        if !self.trials.contains_key(&trial.nct_id) {
            self.order.push(trial.nct_id.clone());
        }
        self.trials.insert(trial.nct_id.clone(), trial);
    }

    pub fn get(&self, nct_id: &str) -> Option<&Trial> {
        self.trials.get(nct_id)
    }

    pub fn get_mut(&mut self, nct_id: &str) -> Option<&mut Trial> {
        self.trials.get_mut(nct_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate trials in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.order.iter().filter_map(|id| self.trials.get(id))
    }

    /// Clone the trials out in insertion order.
    pub fn to_vec(&self) -> Vec<Trial> {
        self.iter().cloned().collect()
    }
}

impl Serialize for TrialSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for trial in self.iter() {
            map.serialize_entry(&trial.nct_id, trial)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TrialSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = TrialSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of registry id to trial")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TrialSet, A::Error> {
                let mut set = TrialSet::new();
                // The trial's own id wins over the map key
                while let Some((_, trial)) = access.next_entry::<String, Trial>()? {
                    set.insert(trial);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn study(nct_id: &str, title: &str, status: &str) -> JsonValue {
        json!({
            "protocolSection": {
                "identificationModule": { "nctId": nct_id, "briefTitle": title },
                "statusModule": { "overallStatus": status }
            },
            "hasResults": false
        })
    }

    #[test]
    fn status_mapping_is_total() {
        assert_eq!(
            TrialStatus::from_registry("ACTIVE_NOT_RECRUITING"),
            TrialStatus::ActiveNotRecruiting
        );
        assert_eq!(TrialStatus::from_registry("COMPLETED"), TrialStatus::Completed);
        assert_eq!(TrialStatus::from_registry("RECRUITING"), TrialStatus::Recruiting);
        assert_eq!(TrialStatus::from_registry("TERMINATED"), TrialStatus::Terminated);

        assert_eq!(TrialStatus::from_registry(""), TrialStatus::Unknown);
        assert_eq!(TrialStatus::from_registry("WITHDRAWN"), TrialStatus::Unknown);
        assert_eq!(TrialStatus::from_registry("recruiting"), TrialStatus::Unknown);
    }

    #[test]
    fn normalizes_studies_in_order() {
        let studies = [
            study("NCT00000001", "First", "RECRUITING"),
            study("NCT00000002", "Second", "COMPLETED"),
        ];
        let set = TrialSet::from_studies(&studies);

        assert_eq!(set.len(), 2);
        let ids: Vec<_> = set.iter().map(|t| t.nct_id.as_str()).collect();
        assert_eq!(ids, ["NCT00000001", "NCT00000002"]);
        assert_eq!(set.get("NCT00000002").unwrap().status, TrialStatus::Completed);
    }

    #[test]
    fn duplicate_id_keeps_the_later_study() {
        let studies = [
            study("NCT00000001", "Earlier", "RECRUITING"),
            study("NCT00000001", "Later", "TERMINATED"),
        ];
        let set = TrialSet::from_studies(&studies);

        assert_eq!(set.len(), 1);
        let trial = set.get("NCT00000001").unwrap();
        assert_eq!(trial.title, "Later");
        assert_eq!(trial.status, TrialStatus::Terminated);
    }

    #[test]
    fn missing_title_is_included_with_empty_string() {
        let study = json!({
            "protocolSection": {
                "identificationModule": { "nctId": "NCT00000003" },
                "statusModule": { "overallStatus": "RECRUITING" }
            }
        });
        let set = TrialSet::from_studies(std::slice::from_ref(&study));

        assert_eq!(set.len(), 1);
        let trial = set.get("NCT00000003").unwrap();
        assert_eq!(trial.title, "");
        assert!(!trial.has_results);
    }

    #[test]
    fn unrecognized_status_defaults_to_unknown() {
        let set = TrialSet::from_studies(&[study("NCT00000004", "T", "SUSPENDED")]);
        assert_eq!(set.get("NCT00000004").unwrap().status, TrialStatus::Unknown);
    }

    #[test]
    fn protocol_section_is_carried_through() {
        let raw = study("NCT00000005", "T", "COMPLETED");
        let set = TrialSet::from_studies(std::slice::from_ref(&raw));
        let trial = set.get("NCT00000005").unwrap();

        assert_eq!(trial.protocol_section, raw["protocolSection"]);
    }

    #[test]
    fn serializes_as_id_keyed_object_and_round_trips_order() {
        let set = TrialSet::from_studies(&[
            study("NCT00000002", "B", "COMPLETED"),
            study("NCT00000001", "A", "RECRUITING"),
        ]);

        let json = serde_json::to_string(&set).unwrap();
        // Insertion order, not lexicographic
        assert!(json.find("NCT00000002").unwrap() < json.find("NCT00000001").unwrap());

        let back: TrialSet = serde_json::from_str(&json).unwrap();
        let ids: Vec<_> = back.iter().map(|t| t.nct_id.as_str()).collect();
        assert_eq!(ids, ["NCT00000002", "NCT00000001"]);
    }
}
