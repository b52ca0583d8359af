// ── Submission reconciler ──
//
// The exchange API answers a create with a JSON:API object on success, a
// plain error string on most failures, and occasionally something else
// entirely. `classify_submission` is the one place that shape is read.

use std::fmt;

use serde_json::Value;

/// Error code the exchange API returns when an equivalent resource exists.
pub const OVERLAP_MARKER: &str = "overlapping_resource";

/// Longest diagnostic excerpt of an unexpected response, in characters.
pub const EXCERPT_LIMIT: usize = 300;

/// Outcome of a single create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created,
    /// Idempotent success: the object is already there.
    AlreadyExists,
    Rejected(Rejection),
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Error text from the API, verbatim.
    Message(String),
    /// The API answered with no content at all.
    Empty,
    /// A reply that is neither error text nor a created object.
    Unexpected { shape: &'static str, excerpt: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(text) => f.write_str(text),
            Self::Empty => f.write_str(
                "empty response; check that NCX licences/subscriptions are applied",
            ),
            Self::Unexpected { shape, excerpt } => write!(
                f,
                "unexpected {shape} response ({excerpt}); check that NCX \
                 licences/subscriptions are applied"
            ),
        }
    }
}

/// Classify the raw reply to a create request.
pub fn classify_submission(response: &Value) -> SubmissionOutcome {
    match response {
        Value::String(text) if text.contains(OVERLAP_MARKER) => SubmissionOutcome::AlreadyExists,
        Value::String(text) => SubmissionOutcome::Rejected(Rejection::Message(text.clone())),
        Value::Object(map)
            if map.get("data").is_some_and(is_truthy) || map.get("id").is_some_and(is_truthy) =>
        {
            SubmissionOutcome::Created
        }
        Value::Null => SubmissionOutcome::Rejected(Rejection::Empty),
        other => SubmissionOutcome::Rejected(Rejection::Unexpected {
            shape: shape_name(other),
            excerpt: value_excerpt(other, EXCERPT_LIMIT),
        }),
    }
}

/// JSON type name used in diagnostics.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialized `value`, bounded to `limit` characters.
pub fn value_excerpt(value: &Value, limit: usize) -> String {
    excerpt(&value.to_string(), limit)
}

/// `text` unchanged if it fits in `limit` characters, else its first
/// `limit - 3` characters followed by `...`.
pub fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn overlap_text_is_idempotent_success() {
        let reply = json!(
            r#"{"errors":[{"code":"overlapping_resource","detail":"Resource overlaps"}]}"#
        );
        assert_eq!(classify_submission(&reply), SubmissionOutcome::AlreadyExists);
    }

    #[test]
    fn other_text_is_rejected_verbatim() {
        let reply = json!("403 Forbidden: subscription required");
        assert_eq!(
            classify_submission(&reply),
            SubmissionOutcome::Rejected(Rejection::Message(
                "403 Forbidden: subscription required".into()
            ))
        );
    }

    #[test]
    fn object_with_data_or_id_is_created() {
        let jsonapi = json!({"data": {"id": "s1", "type": "exchange_sites"}});
        let bare = json!({"id": 17, "name": "x"});
        assert_eq!(classify_submission(&jsonapi), SubmissionOutcome::Created);
        assert_eq!(classify_submission(&bare), SubmissionOutcome::Created);
    }

    #[test]
    fn object_with_falsy_markers_is_unexpected() {
        let reply = json!({"data": null, "id": ""});
        match classify_submission(&reply) {
            SubmissionOutcome::Rejected(Rejection::Unexpected { shape, excerpt }) => {
                assert_eq!(shape, "object");
                assert_eq!(excerpt, r#"{"data":null,"id":""}"#);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_or_zero_markers_are_not_created() {
        for reply in [json!({"data": {}}), json!({"id": 0}), json!({"data": [], "id": false})] {
            assert!(
                matches!(
                    classify_submission(&reply),
                    SubmissionOutcome::Rejected(Rejection::Unexpected { shape: "object", .. })
                ),
                "{reply}"
            );
        }
    }

    #[test]
    fn null_is_empty() {
        assert_eq!(
            classify_submission(&Value::Null),
            SubmissionOutcome::Rejected(Rejection::Empty)
        );
    }

    #[test]
    fn arrays_and_scalars_are_unexpected() {
        for (value, shape) in [
            (json!([1, 2]), "array"),
            (json!(42), "number"),
            (json!(true), "boolean"),
        ] {
            match classify_submission(&value) {
                SubmissionOutcome::Rejected(Rejection::Unexpected { shape: got, .. }) => {
                    assert_eq!(got, shape);
                }
                other => panic!("unexpected outcome for {value}: {other:?}"),
            }
        }
    }

    #[test]
    fn long_replies_are_bounded() {
        let big = json!({"errors": "x".repeat(1000)});
        let SubmissionOutcome::Rejected(Rejection::Unexpected { excerpt, .. }) =
            classify_submission(&big)
        else {
            panic!("expected unexpected-shape rejection");
        };
        assert_eq!(excerpt.chars().count(), EXCERPT_LIMIT);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(excerpt(&text, 5), "éé...");
        assert_eq!(excerpt("short", 5), "short");
    }

    #[test]
    fn rejection_messages_hint_at_licensing() {
        assert!(Rejection::Empty.to_string().contains("licences"));
        let unexpected = Rejection::Unexpected {
            shape: "array",
            excerpt: "[]".into(),
        };
        assert_eq!(
            unexpected.to_string(),
            "unexpected array response ([]); check that NCX licences/subscriptions are applied"
        );
    }
}
