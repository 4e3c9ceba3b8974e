use mysql::Value;
use serde_json::{Number, Value as JsonValue};

/// Convert a column value into a JSON scalar.
///
/// Strings and decimals arrive as bytes; they are decoded as UTF-8, lossily if
/// needed. Temporal values are rendered in MySQL's own text format.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::NULL => JsonValue::Null,
        Value::Int(n) => JsonValue::from(*n),
        Value::UInt(n) => JsonValue::from(*n),
        // Go through the shortest f32 text so 1.1f32 stays 1.1
        Value::Float(f) => float_to_json(f.to_string().parse().unwrap_or(f64::NAN)),
        Value::Double(d) => float_to_json(*d),
        Value::Bytes(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        Value::Date(year, month, day, hour, minute, second, micros) => JsonValue::String(
            format_date(*year, *month, *day, *hour, *minute, *second, *micros),
        ),
        Value::Time(negative, days, hours, minutes, seconds, micros) => JsonValue::String(
            format_time(*negative, *days, *hours, *minutes, *seconds, *micros),
        ),
    }
}

/// Whether [`to_json`] has to replace bytes of this value (BINARY, BLOB or BIT
/// data that is not UTF-8).
pub fn is_lossy(value: &Value) -> bool {
    matches!(value, Value::Bytes(bytes) if std::str::from_utf8(bytes).is_err())
}

/// Convert a JSON value back into a statement parameter.
pub fn to_param(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::NULL,
        JsonValue::Bool(b) => Value::Int(i64::from(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Double(n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(s) => Value::Bytes(s.as_bytes().to_vec()),
        other => Value::Bytes(other.to_string().into_bytes()),
    }
}

fn float_to_json(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

fn format_date(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> String {
    let date = format!("{:04}-{:02}-{:02}", year, month, day);
    if hour == 0 && minute == 0 && second == 0 && micros == 0 {
        return date;
    }
    let mut out = format!("{} {:02}:{:02}:{:02}", date, hour, minute, second);
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

fn format_time(
    negative: bool,
    days: u32,
    hours: u8,
    minutes: u8,
    seconds: u8,
    micros: u32,
) -> String {
    let total_hours = u64::from(days) * 24 + u64::from(hours);
    let sign = if negative { "-" } else { "" };
    let mut out = format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds);
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
