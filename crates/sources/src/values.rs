use serde_json::Value;

/// Reads a non-negative count from a number or a numeric string.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
        }
        _ => None,
    }
}

pub(crate) fn as_rating(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite())
}

pub(crate) fn find_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

pub(crate) fn count_at(value: &Value, path: &[&str]) -> u64 {
    find_value(value, path).and_then(as_count).unwrap_or(0)
}
