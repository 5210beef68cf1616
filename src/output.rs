//! Rendering query results as JSON.

use rusqlite::types::ValueRef;
use rusqlite::{Row, Rows};
use serde_json::{Map, Value};

/// Convert one row into a JSON object keyed by column name.
///
/// Blobs are rendered as lowercase hex strings.
pub fn row_to_json(row: &Row<'_>) -> rusqlite::Result<Map<String, Value>> {
    let stmt = row.as_ref();
    let mut object = Map::new();

    for idx in 0..stmt.column_count() {
        let name = stmt.column_name(idx)?.to_string();
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(blob) => Value::String(hex::encode(blob)),
        };
        object.insert(name, value);
    }

    Ok(object)
}

/// Drain a row cursor into JSON objects.
pub fn collect_rows(mut rows: Rows<'_>) -> rusqlite::Result<Vec<Value>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(Value::Object(row_to_json(row)?));
    }
    Ok(out)
}
