//! Relevance ranking of fetched trials against extracted concepts

use trials_core::{QueryTerms, RankedStudy, TrialSet, decode_ranking};

use super::client::ClaudeClient;
use crate::error::AppError;

const MAX_TOKENS: u32 = 2048;

const SYSTEM_PROMPT: &str = r#"You are a clinical trial search assistant specialized in re-ranking studies based on medical concepts extracted from patient-provider conversations. Your task is to analyze a list of clinical trial studies and reorder them by relevance to the extracted medical information.

# Input Format
You will receive:
1. Conditions: A list of medical conditions/diseases identified in the conversation
2. Terms: A list of medical terms, symptoms, or related concepts mentioned
3. Interventions: A list of treatments, medications, or procedures discussed
4. Studies: A JSON list of clinical trial studies with detailed metadata

# Your Task
Analyze each study and assign a relevance score (0-100) based on how well it matches the extracted medical concepts. Consider these factors:

## Relevance Factors

Condition Match (33%): Does the study investigate any of the listed conditions?
*   Exact match: Full points
*   Related condition: Partial points
*   Unrelated: Minimal points

Terms Match (33%): Do the study's outcomes or descriptions relate to mentioned terms?
*   Direct symptom/biomarker alignment
*   Related pathophysiology
*   Relevant complications

Intervention Match (33%): Does the study test any of the specified interventions?
*   Exact drug/treatment match: Full points
*   Same drug class: High partial points
*   Similar mechanism of action: Moderate points
*   Different approach: Minimal points

## Scoring Guidelines

*   90-100: Excellent match - condition AND intervention align precisely
*   75-89: Strong match - condition matches with related intervention OR vice versa
*   60-74: Good match - condition matches with different intervention approach
*   40-59: Moderate match - related condition or tangential relevance
*   20-39: Weak match - distant connection or single minor element matches
*   0-19: Poor match - no meaningful alignment

## Format Output

Return ONLY valid JSON with the studies ordered by relevance_score (highest first). The final JSON MUST strictly conform to the following structure and data types. Adhere to this exactly.
{
  "studies": [
    {
      "nctId": "NCT########",
      "relevanceMetadata": {
        "relevanceScore": 85,
        "matchedConditions": ["condition1"],
        "matchedInterventions": ["intervention1"],
        "matchedTerms": ["term1"]
      }
    }
  ]
}

Critical: Return ONLY the JSON structure. No explanatory text before or after. No markdown code blocks. Just the raw JSON object.

# Analysis Principles

*   Be precise: Match medical terminology accurately, recognizing synonyms and related concepts
*   Consider context: Related conditions (e.g., Type 1 vs Type 2 diabetes) should be scored appropriately
*   Drug knowledge: Apply understanding of drug classes, mechanisms, and therapeutic equivalents
*   No artificial inflation: Use the full 0-100 range honestly
*   Handle ambiguity: Note when extracted terms are vague or could match multiple study aspects

# Important Notes

*   This is for informational ranking only, not clinical recommendations
*   Focus on factual matching of medical concepts
*   Do not make assumptions about patient suitability for trials
*   Maintain objectivity regardless of study sponsor or location"#;

/// Ask the model to score the trial set against the extracted concepts.
///
/// Returns the ranking entries; merging into the set is the caller's step,
/// so a failure here cannot touch trials already fetched.
pub async fn rank_trials(
    client: &ClaudeClient,
    trials: &TrialSet,
    extracted: &QueryTerms,
) -> Result<Vec<RankedStudy>, AppError> {
    let user_message = format!(
        "There are two inputs:\n\
         1) The trials to rerank in JSON format: {}\n\
         2) The conditions, terms, and interventions in JSON format: {}",
        serde_json::to_string(trials)
            .map_err(|e| AppError::Internal(format!("Failed to serialize trials: {e}")))?,
        serde_json::to_string(extracted)
            .map_err(|e| AppError::Internal(format!("Failed to serialize query terms: {e}")))?,
    );

    let reply = client.message(SYSTEM_PROMPT, &user_message, MAX_TOKENS).await?;
    let ranking = decode_ranking(&reply)?;

    tracing::info!(entries = ranking.len(), "Received relevance ranking");
    Ok(ranking)
}
