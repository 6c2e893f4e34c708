//! Query terms and registry query-URL construction

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Essie boolean join operand used by the registry query syntax
const OR_OPERAND: &str = " OR ";

/// Structured medical concepts extracted from a patient-provider
/// conversation. Any field may be empty; order is preserved for display but
/// carries no query meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryTerms {
    pub conditions: Vec<String>,
    pub terms: Vec<String>,
    pub interventions: Vec<String>,
}

impl QueryTerms {
    /// True when no field would contribute a registry query parameter.
    pub fn is_empty(&self) -> bool {
        or_join(&self.conditions).is_none()
            && or_join(&self.terms).is_none()
            && or_join(&self.interventions).is_none()
    }
}

/// Strict mirror of the extraction reply: all three keys must be present,
/// so a wrong-shape payload can never decode into empty terms.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionReply {
    terms: Vec<String>,
    conditions: Vec<String>,
    interventions: Vec<String>,
}

/// Decode the extraction reply text into [`QueryTerms`].
///
/// The model is instructed to answer with bare JSON, but fenced replies
/// still occur; fences are stripped before the strict decode.
pub fn decode_query_terms(text: &str) -> Result<QueryTerms, DecodeError> {
    let reply: ExtractionReply = serde_json::from_str(extract_json(text)?)?;
    Ok(QueryTerms {
        conditions: reply.conditions,
        terms: reply.terms,
        interventions: reply.interventions,
    })
}

/// Extract a JSON object from text that might contain markdown code blocks
pub(crate) fn extract_json(text: &str) -> Result<&str, DecodeError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    // Direct JSON object
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    // Wrapped in ```json ... ```
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim());
        }
    }

    // Wrapped in ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim());
        }
    }

    Err(DecodeError::Shape(format!(
        "no JSON object in reply: {trimmed}"
    )))
}

/// Build the registry search URL.
///
/// Always carries `format=json` and `pageSize`; each non-empty term field
/// contributes one `query.*` parameter with its entries trimmed,
/// blank-filtered and `OR`-joined. Parameter order is fixed so the same
/// inputs always yield the same URL.
pub fn search_url(base_url: &str, page_size: u32, query_terms: Option<&QueryTerms>) -> String {
    let base = base_url.trim_end_matches('/');

    let mut query = format!("format=json&pageSize={page_size}");
    if let Some(terms) = query_terms {
        let fields = [
            ("query.cond", &terms.conditions),
            ("query.term", &terms.terms),
            ("query.intr", &terms.interventions),
        ];
        for (key, words) in fields {
            if let Some(joined) = or_join(words) {
                query.push('&');
                query.push_str(key);
                query.push('=');
                query.push_str(&urlencoding::encode(&joined));
            }
        }
    }

    format!("{base}?{query}")
}

/// Join phrases with the essie `OR` operand, dropping blank entries.
/// Returns `None` when nothing survives the filter.
fn or_join(words: &[String]) -> Option<String> {
    let joined = words
        .iter()
        .map(|word| word.trim())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(OR_OPERAND);

    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(conditions: &[&str], terms: &[&str], interventions: &[&str]) -> QueryTerms {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        QueryTerms {
            conditions: owned(conditions),
            terms: owned(terms),
            interventions: owned(interventions),
        }
    }

    #[test]
    fn url_without_terms_has_only_format_and_page_size() {
        let url = search_url("https://clinicaltrials.gov/api/v2/studies", 10, None);
        assert_eq!(
            url,
            "https://clinicaltrials.gov/api/v2/studies?format=json&pageSize=10"
        );
    }

    #[test]
    fn url_strips_trailing_slash() {
        let url = search_url("https://clinicaltrials.gov/api/v2/studies/", 10, None);
        assert_eq!(
            url,
            "https://clinicaltrials.gov/api/v2/studies?format=json&pageSize=10"
        );
    }

    #[test]
    fn url_joins_each_field_with_or() {
        let q = terms(
            &["Osteoarthritis", "Arthritis"],
            &["Pain, Chronic"],
            &["Physical Therapy"],
        );
        let url = search_url("http://registry", 5, Some(&q));

        assert_eq!(
            url,
            "http://registry?format=json&pageSize=5\
             &query.cond=Osteoarthritis%20OR%20Arthritis\
             &query.term=Pain%2C%20Chronic\
             &query.intr=Physical%20Therapy"
        );
    }

    #[test]
    fn url_trims_and_drops_blank_entries() {
        let q = terms(&["  Diabetes  ", "   ", ""], &[], &[]);
        let url = search_url("http://registry", 10, Some(&q));

        assert_eq!(url, "http://registry?format=json&pageSize=10&query.cond=Diabetes");
    }

    #[test]
    fn url_omits_parameters_for_blank_only_fields() {
        let q = terms(&["  ", ""], &[" "], &[]);
        let url = search_url("http://registry", 10, Some(&q));

        assert!(!url.contains("query."));
        assert!(q.is_empty());
    }

    #[test]
    fn url_is_deterministic() {
        let q = terms(&["a"], &["b"], &["c"]);
        let first = search_url("http://registry", 10, Some(&q));
        let second = search_url("http://registry", 10, Some(&q));
        assert_eq!(first, second);
    }

    #[test]
    fn decodes_bare_json_reply() {
        let reply = r#"{"terms": ["Pain, Chronic"], "conditions": ["Osteoarthritis"], "interventions": ["Physical Therapy"]}"#;
        let decoded = decode_query_terms(reply).unwrap();

        assert_eq!(decoded.terms, vec!["Pain, Chronic"]);
        assert_eq!(decoded.conditions, vec!["Osteoarthritis"]);
        assert_eq!(decoded.interventions, vec!["Physical Therapy"]);
    }

    #[test]
    fn decodes_fenced_reply() {
        let reply = "```json\n{\"terms\": [], \"conditions\": [\"Asthma\"], \"interventions\": []}\n```";
        let decoded = decode_query_terms(reply).unwrap();

        assert_eq!(decoded.conditions, vec!["Asthma"]);
        assert!(decoded.terms.is_empty());
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert!(matches!(decode_query_terms("   "), Err(DecodeError::Empty)));
    }

    #[test]
    fn prose_reply_is_an_error() {
        let result = decode_query_terms("I could not find any medical terms.");
        assert!(matches!(result, Err(DecodeError::Shape(_))));
    }

    #[test]
    fn missing_category_key_is_an_error() {
        // Wrong-shape JSON must not silently decode into empty terms
        let result = decode_query_terms(r#"{"terms": [], "conditions": []}"#);
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }
}
