//! Binding a serializable struct or map to a statement's named parameters.
//!
//! Each `:name`, `@name` or `$name` parameter takes the field called `name`.
//! Fields without a matching parameter are ignored.

use rusqlite::types::Value;
use rusqlite::Statement;
use serde::Serialize;

use crate::error::{Error, Result};

/// Bind every named parameter of `stmt` from `arg`.
pub(crate) fn bind_named<A>(stmt: &mut Statement<'_>, arg: &A) -> Result<()>
where
    A: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(arg) {
        Ok(serde_json::Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(Error::named_argument(format!(
                "expected a struct or map, got {}",
                json_kind(&other)
            )))
        }
        Err(e) => return Err(Error::named_argument(e.to_string())),
    };

    for idx in 1..=stmt.parameter_count() {
        // `?` and `?NNN` are positional; SQLite names the latter "?NNN".
        let param = match stmt.parameter_name(idx) {
            Some(name) if !name.starts_with('?') => name.to_owned(),
            _ => {
                return Err(Error::named_argument(format!(
                    "parameter {idx} is positional; use exec for positional arguments"
                )))
            }
        };

        let key = param.trim_start_matches([':', '@', '$']);
        let value = fields
            .get(key)
            .ok_or_else(|| Error::MissingParameter(param.clone()))?;
        let value = to_sql_value(value)
            .map_err(|reason| Error::named_argument(format!("{param}: {reason}")))?;
        stmt.raw_bind_parameter(idx, value)?;
    }

    Ok(())
}

/// Map a JSON value to the SQLite value it binds as.
///
/// Unsigned integers beyond `i64::MAX` have no exact SQLite representation
/// and are rejected.
pub(crate) fn to_sql_value(value: &serde_json::Value) -> std::result::Result<Value, String> {
    let value = match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_u64() {
                return Err(format!("integer {n} does not fit in a signed 64-bit column"));
            } else {
                Value::Real(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        nested => Value::Text(nested.to_string()),
    };
    Ok(value)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
