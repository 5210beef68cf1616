//! Row scanning for `get` and `select`.

use rusqlite::types::FromSql;
use rusqlite::Row;

/// Build a value from one result row.
///
/// Implemented for tuples of [`FromSql`] values (columns taken by position);
/// implement it by hand for your own structs:
///
/// ```
/// use ssql_db::FromRow;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
///         Ok(User {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

macro_rules! tuple_from_row {
    ($($name:ident => $idx:tt),+) => {
        impl<$($name: FromSql),+> FromRow for ($($name,)+) {
            fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
                Ok(($(row.get::<_, $name>($idx)?,)+))
            }
        }
    };
}

tuple_from_row!(A => 0);
tuple_from_row!(A => 0, B => 1);
tuple_from_row!(A => 0, B => 1, C => 2);
tuple_from_row!(A => 0, B => 1, C => 2, D => 3);
tuple_from_row!(A => 0, B => 1, C => 2, D => 3, E => 4);
tuple_from_row!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
tuple_from_row!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
tuple_from_row!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_tuple_from_row() {
        let conn = Connection::open_in_memory().unwrap();
        let (a, b, c): (i64, String, Option<f64>) = conn
            .query_row("SELECT 1, 'two', NULL", [], |row| FromRow::from_row(row))
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
        assert_eq!(c, None);
    }

    #[test]
    fn test_single_column_tuple() {
        let conn = Connection::open_in_memory().unwrap();
        let (n,): (i64,) = conn
            .query_row("SELECT 42", [], |row| FromRow::from_row(row))
            .unwrap();
        assert_eq!(n, 42);
    }

    #[test]
    fn test_type_mismatch_is_sqlite_error() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<(i64,)> =
            conn.query_row("SELECT 'text'", [], |row| FromRow::from_row(row));
        assert!(matches!(
            result,
            Err(rusqlite::Error::InvalidColumnType(..))
        ));
    }
}
