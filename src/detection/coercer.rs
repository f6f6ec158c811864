use serde_json::Value;

/// Result of coercing a list-shaped field.
#[derive(Debug, Clone, PartialEq)]
pub enum ListField {
    /// Every piece parsed as a number.
    Numbers(Vec<f64>),
    /// At least one piece failed to parse; all pieces kept as trimmed text.
    Text(Vec<String>),
    /// The input was not string-shaped and is returned untouched.
    Passthrough(Value),
}

impl ListField {
    /// First element as a finite number, if there is one.
    ///
    /// Text lists never yield a number: a single unparseable piece poisons the
    /// whole field. Structured arrays yield their first element when numeric.
    pub fn first_number(&self) -> Option<f64> {
        let first = match self {
            ListField::Numbers(values) => values.first().copied(),
            ListField::Text(_) => None,
            ListField::Passthrough(Value::Array(items)) => items.first().and_then(Value::as_f64),
            ListField::Passthrough(_) => None,
        };
        first.filter(|v| v.is_finite())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ListField::Numbers(values) => values.is_empty(),
            ListField::Text(values) => values.is_empty(),
            ListField::Passthrough(Value::Array(items)) => items.is_empty(),
            ListField::Passthrough(_) => false,
        }
    }
}

/// Parse a delimited list such as `"[1700000000000, 1700000060000]"`.
///
/// Enclosing brackets are stripped, the rest is split on commas and each piece
/// trimmed; empty pieces are dropped. Numeric parsing is all-or-nothing.
pub fn parse_list_str(raw: &str) -> ListField {
    let inner = raw.trim().trim_matches(|c| c == '[' || c == ']');
    let pieces: Vec<&str> = inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let numbers: Result<Vec<f64>, _> = pieces.iter().map(|p| p.parse::<f64>()).collect();
    match numbers {
        Ok(values) => ListField::Numbers(values),
        Err(_) => ListField::Text(pieces.into_iter().map(str::to_string).collect()),
    }
}

/// Coerce a table cell into a list. Strings are parsed; any other shape
/// (already-structured arrays, scalars) passes through unchanged.
pub fn parse_list_field(field: &Value) -> ListField {
    match field {
        Value::String(s) => parse_list_str(s),
        other => ListField::Passthrough(other.clone()),
    }
}

/// Coerce a scalar cell to a finite number. Numeric strings are accepted;
/// anything else yields `None`.
pub fn coerce_number(field: &Value) -> Option<f64> {
    let value = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Render a cell as an identifier string. Missing and empty cells yield `None`.
pub fn coerce_text(field: &Value) -> Option<String> {
    match field {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_list() {
        assert_eq!(parse_list_str("[1,2,3]"), ListField::Numbers(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_all_or_nothing_fallback() {
        assert_eq!(
            parse_list_str("[a,2,3]"),
            ListField::Text(vec!["a".into(), "2".into(), "3".into()])
        );
    }

    #[test]
    fn test_whitespace_and_empty_pieces() {
        assert_eq!(
            parse_list_str("[ 1700000000000 , , 1700000060000 ]"),
            ListField::Numbers(vec![1_700_000_000_000.0, 1_700_000_060_000.0])
        );
        assert_eq!(parse_list_str("[]"), ListField::Numbers(vec![]));
        assert!(parse_list_str("[]").is_empty());
    }

    #[test]
    fn test_unbracketed_scalar_string() {
        assert_eq!(parse_list_str("42.5"), ListField::Numbers(vec![42.5]));
    }

    #[test]
    fn test_first_number() {
        assert_eq!(parse_list_str("[5, 6]").first_number(), Some(5.0));
        assert_eq!(parse_list_str("[]").first_number(), None);
        assert_eq!(parse_list_str("[x, 6]").first_number(), None);
        assert_eq!(parse_list_str("[NaN]").first_number(), None);
    }

    #[test]
    fn test_passthrough() {
        let field = parse_list_field(&json!([10, 20]));
        assert_eq!(field, ListField::Passthrough(json!([10, 20])));
        assert_eq!(field.first_number(), Some(10.0));

        let scalar = parse_list_field(&json!(7));
        assert_eq!(scalar, ListField::Passthrough(json!(7)));
        assert_eq!(scalar.first_number(), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!("101.25")), Some(101.25));
        assert_eq!(coerce_number(&json!(3)), Some(3.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&Value::Null), None);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&json!(" u1 ")), Some("u1".into()));
        assert_eq!(coerce_text(&json!(12)), Some("12".into()));
        assert_eq!(coerce_text(&json!("  ")), None);
        assert_eq!(coerce_text(&Value::Null), None);
    }
}
