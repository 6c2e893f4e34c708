//! trials-core: Shared types and pure logic for the trial search service
//!
//! This crate holds the parts of the pipeline that need no I/O: the
//! query-term model, registry query-URL construction, trial normalization,
//! and strict decoding of the LLM payloads used for extraction and
//! relevance ranking.

pub mod error;
pub mod query;
pub mod rank;
pub mod trial;

pub use error::DecodeError;
pub use query::{QueryTerms, decode_query_terms, search_url};
pub use rank::{RankedStudy, decode_ranking};
pub use trial::{RelevanceMetadata, Trial, TrialSet, TrialStatus};
