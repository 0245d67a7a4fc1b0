//! Lexer, parser, value tree, and path resolver for a compact
//! human-authored configuration format.
//!
//! ```
//! let root = cfgfmt::parse(b"window.size 180x190");
//! let size = cfgfmt::query(&root, "window.size").unwrap();
//! assert_eq!(size.as_array().unwrap().len(), 2);
//! ```

mod error;
mod lexer;
mod location;
mod parser;
mod query;
mod token;
mod value;

pub use error::Error;
pub use location::Location;
pub use query::query;
pub use value::{Array, Table, Value};

/// Parses `source` into a document tree. Always returns a `Value` — on
/// failure it is `Value::Error` carrying a human-readable diagnostic, never
/// a Rust `Err`/panic. Callers should check [`Value::is_error`] before
/// proceeding; every other operation in this crate follows the same
/// never-panic, check-the-result contract.
pub fn parse(source: &[u8]) -> Value {
    match lexer::tokenize(source).and_then(parser::parse_root) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("parse failed: {err}");
            Value::Error(err.to_string())
        }
    }
}

/// The crate's semantic version, as `(major, minor, patch)`.
pub fn version() -> (u32, u32, u32) {
    let mut parts = env!("CARGO_PKG_VERSION").split('.');
    let mut next = || parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (next(), next(), next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s1_vector_literal_nested_under_dotted_key() {
        let root = parse(b"window.size 180x190");
        let window = root.as_table().unwrap().get("window").unwrap();
        let size = window.as_table().unwrap().get("size").unwrap();
        assert_eq!(
            size.as_array().unwrap().iter().cloned().collect::<Vec<_>>(),
            vec![Value::Int(180), Value::Int(190)]
        );
    }

    #[test]
    fn s2_ordered_float_entries() {
        let root = parse(b"a 1.0 b 42.0 miku 39.39");
        let table = root.as_table().unwrap();
        assert_eq!(table.key_at(0), Some("a"));
        assert_eq!(table.value_at(0), Some(&Value::Float(1.0)));
        assert_eq!(table.key_at(1), Some("b"));
        assert_eq!(table.value_at(1), Some(&Value::Float(42.0)));
        assert_eq!(table.key_at(2), Some("miku"));
        assert_eq!(table.value_at(2), Some(&Value::Float(39.39)));
    }

    #[test]
    fn s3_escaped_quotes_in_string() {
        let root = parse(br#"viva "viva \"happy\"""#);
        let viva = root.as_table().unwrap().get("viva").unwrap();
        assert_eq!(viva.as_str(), Some(b"viva \"happy\"".as_slice()));
    }

    #[test]
    fn s4_short_type_alongside_nested_table() {
        let root = parse(b"mi &ku window.width 55");
        let table = root.as_table().unwrap();
        assert_eq!(table.get("mi").unwrap().as_short_type(), Some("ku"));
        let width = table
            .get("window")
            .unwrap()
            .as_table()
            .unwrap()
            .get("width")
            .unwrap();
        assert_eq!(width, &Value::Int(55));
    }

    #[test]
    fn s5_dotted_short_type() {
        let root = parse(b"viva &viva.happy window.width 55");
        let viva = root.as_table().unwrap().get("viva").unwrap();
        assert_eq!(viva.as_short_type(), Some("viva.happy"));
    }

    #[test]
    fn s7_query_hit_and_miss() {
        let root = parse(b"a.b.c 7");
        assert_eq!(query(&root, "a.b.c"), Some(&Value::Int(7)));
        assert_eq!(query(&root, "a.b.d"), None);
    }

    #[test]
    fn error_kind_never_nested_inside_a_table() {
        let root = parse(b"a [");
        assert!(root.is_error());
    }

    #[test]
    fn vector_length_is_bounded_to_four() {
        let root = parse(b"v 1x2x3x4x5");
        assert!(root.is_error());
    }

    #[test]
    fn dotted_key_through_scalar_is_an_error() {
        let root = parse(b"a 1 a.b 2");
        assert!(root.is_error());
    }

    #[test]
    fn duplicate_keys_append_and_lookup_returns_first() {
        let root = parse(b"a 1 a 2");
        let table = root.as_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn version_parses_from_cargo_metadata() {
        assert_eq!(version(), (0, 1, 0));
    }
}
