//! Loose JSON field helpers.
//!
//! The listing API is not consistent about types: ids and years arrive as
//! numbers or strings, ratings as floats or text, directors as a string or a
//! list. These helpers turn one loosely typed value into display text,
//! treating "empty" values (`null`, `""`, `0`, `false`, empty lists) as
//! absent so that fallback chains skip them.

use serde_json::Value;

/// Render a single value as display text, or `None` if it counts as empty.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::Bool(true) => Some("true".into()),
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(|v| text(Some(v))).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        // Nested objects have no sensible one-line rendering.
        Value::Object(_) => None,
    }
}

/// First non-empty value among `candidates`, rendered as text.
pub fn first_text<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().find_map(text)
}

/// Borrow `value` as a JSON array, if it is one.
pub fn as_sequence(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_values_are_absent() {
        for v in [json!(null), json!(""), json!(0), json!(0.0), json!(false), json!([])] {
            assert_eq!(text(Some(&v)), None, "{v} should be empty");
        }
        assert_eq!(text(None), None);
    }

    #[test]
    fn numbers_and_strings_render() {
        assert_eq!(text(Some(&json!(7.5))).as_deref(), Some("7.5"));
        assert_eq!(text(Some(&json!(1999))).as_deref(), Some("1999"));
        assert_eq!(text(Some(&json!("Dune"))).as_deref(), Some("Dune"));
    }

    #[test]
    fn string_lists_are_joined() {
        let v = json!(["Lana Wachowski", "", "Lilly Wachowski"]);
        assert_eq!(
            text(Some(&v)).as_deref(),
            Some("Lana Wachowski, Lilly Wachowski")
        );
    }

    #[test]
    fn first_text_skips_empty_candidates() {
        let a = json!("");
        let b = json!(null);
        let c = json!("third");
        assert_eq!(
            first_text([Some(&a), Some(&b), None, Some(&c)]).as_deref(),
            Some("third")
        );
        assert_eq!(first_text([Some(&a), Some(&b)]), None);
    }
}
