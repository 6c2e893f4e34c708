//! Relevance-ranking payload decoding and merge

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::DecodeError;
use crate::query::extract_json;
use crate::trial::{RelevanceMetadata, TrialSet};

/// One entry of the ranking payload returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStudy {
    pub nct_id: String,
    pub relevance_metadata: RelevanceMetadata,
}

/// Decode the `{"studies": [...]}` ranking reply.
///
/// Valid JSON without a `studies` list is a shape error, not an empty
/// ranking.
pub fn decode_ranking(text: &str) -> Result<Vec<RankedStudy>, DecodeError> {
    let value: JsonValue = serde_json::from_str(extract_json(text)?)?;
    let studies = value
        .get("studies")
        .ok_or_else(|| DecodeError::Shape("ranking reply has no `studies` list".into()))?;

    Ok(serde_json::from_value(studies.clone())?)
}

impl TrialSet {
    /// Merge relevance annotations into matching trials by registry id.
    ///
    /// An id with no corresponding trial cannot be merged and is skipped;
    /// trials absent from the ranking keep no relevance fields. Returns how
    /// many trials were annotated.
    pub fn apply_ranking(&mut self, ranking: Vec<RankedStudy>) -> usize {
        let mut merged = 0;
        for entry in ranking {
            match self.get_mut(&entry.nct_id) {
                Some(trial) => {
                    trial.relevance_metadata = Some(entry.relevance_metadata);
                    merged += 1;
                }
                None => {
                    tracing::debug!(nct_id = %entry.nct_id, "ranked study not in result set");
                }
            }
        }
        merged
    }
}
