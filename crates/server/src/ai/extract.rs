//! Medical concept extraction from conversation text

use trials_core::{QueryTerms, decode_query_terms};

use super::client::ClaudeClient;
use crate::error::AppError;

const MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = r#"You are a medical information extraction assistant. Your task is to analyze patient-provider conversations and extract key medical information in JSON format.

INSTRUCTIONS:
1. Read the conversation carefully
2. Extract three types of information:
   - "terms": Symptoms or general medical terms (e.g., "Pain, Chronic", "Upper Extremity Problem")
   - "conditions": Diagnoses or medical conditions (e.g., "Adenocarcinoma", "Neoplasms by Site")
   - "interventions": Treatments or procedures (e.g., "Hypofractionated radiation therapy", "blood sample", "Computed Tomography")
3. Only include information explicitly mentioned in the conversation
4. Return ONLY valid JSON in this exact format:

{
  "terms": ["term1", "term2"],
  "conditions": ["condition1", "condition2"],
  "interventions": ["intervention1", "intervention2"]
}

CRITICAL RULES:
- Output ONLY the JSON object, with no additional text, explanations, or markdown
- If a category has no items, use an empty array: []
- Do not include any text before or after the JSON
- Do not wrap the JSON in code blocks or markdown
- Ensure all strings are properly escaped
- Do not hallucinate or infer information not present in the conversation"#;

/// Extract structured query terms from free conversation text.
///
/// A reply that does not decode into the expected JSON object is an error;
/// it is never downgraded to empty terms.
pub async fn extract_query_terms(
    client: &ClaudeClient,
    conversation: &str,
) -> Result<QueryTerms, AppError> {
    let reply = client
        .message(SYSTEM_PROMPT, conversation, MAX_TOKENS)
        .await?;

    let terms = decode_query_terms(&reply)?;
    tracing::info!(
        conditions = terms.conditions.len(),
        terms = terms.terms.len(),
        interventions = terms.interventions.len(),
        "Extracted query terms"
    );

    Ok(terms)
}
