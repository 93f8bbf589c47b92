//! Thesaurus payload shapes and their normalization into [`SynonymSet`].
//!
//! The Big Huge Thesaurus JSON format keys each part of speech to an object of
//! relation lists:
//!
//! ```json
//! {
//!   "noun":      { "syn": ["felicity", "happiness"], "ant": ["sadness"] },
//!   "adjective": { "sim": ["blessed", "blissful"] }
//! }
//! ```
//!
//! Some categories carry their candidates under `syn`, others under `sim`.
//! Both are treated as the candidate list; `syn` wins when both exist.
//! Other relations (`ant`, `rel`, `usr`) are ignored.

use lawyerify_types::{PartOfSpeech, SynonymSet};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("thesaurus payload is not a JSON object")]
    NotAnObject,
    #[error("invalid thesaurus JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct RelationLists {
    #[serde(default)]
    syn: Option<Vec<String>>,
    #[serde(default)]
    sim: Option<Vec<String>>,
}

impl RelationLists {
    fn into_candidates(self) -> Vec<String> {
        self.syn.or(self.sim).unwrap_or_default()
    }
}

/// Normalize one word's payload.
///
/// Unrecognized categories are dropped. A recognized category whose value is
/// malformed is kept with an empty candidate list so it still counts toward
/// ambiguity.
pub fn normalize_entry(payload: &Value) -> Result<SynonymSet, WireError> {
    let Value::Object(map) = payload else {
        return Err(WireError::NotAnObject);
    };

    let mut set = SynonymSet::new();
    for pos in PartOfSpeech::ALL {
        let Some(value) = map.get(pos.as_str()) else {
            continue;
        };
        let lists = match RelationLists::deserialize(value) {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!(%e, category = %pos, "Malformed relation lists in thesaurus payload");
                RelationLists::default()
            }
        };
        set.insert(pos, lists.into_candidates());
    }
    Ok(set)
}

/// Parse and normalize a raw response body.
pub fn parse_entry(body: &str) -> Result<SynonymSet, WireError> {
    let payload: Value = serde_json::from_str(body)?;
    normalize_entry(&payload)
}

#[cfg(test)]
mod tests {
    use super::{WireError, normalize_entry, parse_entry};
    use lawyerify_types::PartOfSpeech;
    use serde_json::json;

    #[test]
    fn syn_and_sim_are_both_candidates() {
        let set = normalize_entry(&json!({
            "noun": { "syn": ["felicity", "happiness"], "ant": ["sadness"] },
            "adjective": { "sim": ["blessed", "blissful"] }
        }))
        .unwrap();

        assert_eq!(
            set.get(PartOfSpeech::Noun).unwrap(),
            ["felicity", "happiness"]
        );
        assert_eq!(
            set.get(PartOfSpeech::Adjective).unwrap(),
            ["blessed", "blissful"]
        );
    }

    #[test]
    fn syn_preferred_over_sim() {
        let set = normalize_entry(&json!({
            "adjective": { "syn": ["glad"], "sim": ["blissful"] }
        }))
        .unwrap();
        assert_eq!(set.get(PartOfSpeech::Adjective).unwrap(), ["glad"]);
    }

    #[test]
    fn unknown_categories_are_dropped() {
        let set = normalize_entry(&json!({
            "pronoun": { "syn": ["they"] },
            "verb": { "syn": ["run"] }
        }))
        .unwrap();
        assert_eq!(set.category_count(), 1);
        assert!(set.get(PartOfSpeech::Verb).is_some());
    }

    #[test]
    fn category_without_candidates_still_present() {
        let set = normalize_entry(&json!({
            "noun": { "ant": ["nothing"] },
            "verb": { "syn": ["date"] }
        }))
        .unwrap();
        assert!(set.is_ambiguous());
        assert!(set.get(PartOfSpeech::Noun).unwrap().is_empty());
    }

    #[test]
    fn malformed_category_value_is_empty_candidates() {
        let set = normalize_entry(&json!({ "noun": "oops" })).unwrap();
        assert_eq!(set.category_count(), 1);
        assert!(set.get(PartOfSpeech::Noun).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(matches!(
            normalize_entry(&json!(["happy"])),
            Err(WireError::NotAnObject)
        ));
    }

    #[test]
    fn parse_entry_rejects_invalid_json() {
        assert!(matches!(parse_entry("{not json"), Err(WireError::Json(_))));
    }
}
