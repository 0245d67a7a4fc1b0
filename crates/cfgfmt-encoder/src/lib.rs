//! Renders a [`cfgfmt::Value`] tree back to text.
//!
//! ```
//! let root = cfgfmt::parse(b"+enabled ;disabled name \"x\"");
//! let text = cfgfmt_encoder::serialize(&root, cfgfmt_encoder::Flags::default()).unwrap();
//! assert_eq!(text, b"+enabled ;disabled name \"x\" ");
//! ```

use cfgfmt::{Array, Table, Value};
use thiserror::Error;

/// Format flags: `format` enables newline-and-indent pretty-printing, and
/// `use_spaces` (only meaningful together with `format`) selects four-space
/// indentation over tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub format: bool,
    pub use_spaces: bool,
}

impl Flags {
    pub fn pretty() -> Self {
        Self {
            format: true,
            use_spaces: false,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown type for serialisation")]
    UnknownType,
}

/// Serializes `root` into an owned byte buffer. Output is bytes rather than
/// a `String` because document strings are arbitrary byte sequences, not
/// necessarily valid UTF-8, and are written through unchanged.
pub fn serialize(root: &Value, flags: Flags) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(128);
    encode(root, flags, 0, true, &mut out)?;
    Ok(out)
}

/// Serializes `value` as a standalone fragment rather than a document
/// root — the form to use for e.g. printing one node resolved by a path
/// query. The only observable difference from [`serialize`] is that a
/// numeric array up to 4 elements is eligible for vector shorthand here,
/// where at the true document root it is not.
pub fn serialize_fragment(value: &Value, flags: Flags) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(32);
    encode(value, flags, 0, false, &mut out)?;
    Ok(out)
}

fn separator(flags: Flags) -> &'static [u8] {
    if flags.format {
        b"\n"
    } else {
        b" "
    }
}

fn indent_unit(flags: Flags) -> &'static [u8] {
    if flags.use_spaces {
        b"    "
    } else {
        b"\t"
    }
}

fn write_indent(out: &mut Vec<u8>, flags: Flags, level: usize) {
    if !flags.format {
        return;
    }
    for _ in 0..level {
        out.extend_from_slice(indent_unit(flags));
    }
}

fn encode(
    value: &Value,
    flags: Flags,
    level: usize,
    is_root: bool,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    match value {
        Value::Null => {
            out.push(b';');
            Ok(())
        }
        Value::Bool(b) => {
            out.push(if *b { b'+' } else { b'-' });
            Ok(())
        }
        Value::Int(i) => {
            out.extend_from_slice(i.to_string().as_bytes());
            Ok(())
        }
        Value::Float(f) => {
            out.extend_from_slice(format_float(*f).as_bytes());
            Ok(())
        }
        Value::String(bytes) => {
            encode_quoted(bytes, out);
            Ok(())
        }
        Value::ShortType(s) => {
            encode_quoted(s.as_bytes(), out);
            Ok(())
        }
        Value::Array(arr) => encode_array(arr, flags, level, is_root, out),
        Value::Table(table) => encode_table(table, flags, level, is_root, out),
        Value::Error(_) => Err(Error::UnknownType),
    }
}

/// Rust's default float-to-string conversion drops the decimal point for
/// whole numbers (`1.0` becomes `"1"`), which would make a round-tripped
/// float re-lex as an `Int`. Appending `.0` when no separator is present
/// keeps a whole-number float distinguishable from an int on re-parse.
fn format_float(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') || !s.chars().any(|c| c.is_ascii_digit()) {
        s
    } else {
        format!("{s}.0")
    }
}

/// Writes a quoted string, escaping `"` and `\` on the way out, so that a
/// payload containing either byte still round-trips through the lexer.
fn encode_quoted(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'"');
    for &b in bytes {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            other => out.push(other),
        }
    }
    out.push(b'"');
}

fn is_vector_candidate(arr: &Array, is_root: bool) -> bool {
    !is_root
        && arr.len() <= 4
        && arr.iter().all(|v| matches!(v, Value::Int(_) | Value::Float(_)))
}

fn encode_array(
    arr: &Array,
    flags: Flags,
    level: usize,
    is_root: bool,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    if arr.is_empty() {
        out.extend_from_slice(b"[[]]");
        return Ok(());
    }

    if is_vector_candidate(arr, is_root) {
        for (i, elem) in arr.iter().enumerate() {
            encode(elem, flags, level, false, out)?;
            if i + 1 < arr.len() {
                out.push(b'x');
            }
        }
        return Ok(());
    }

    let sep = separator(flags);
    out.extend_from_slice(b"[[");
    out.extend_from_slice(sep);

    let child_level = level + 1;
    for elem in arr.iter() {
        write_indent(out, flags, child_level);
        encode(elem, flags, child_level, false, out)?;
        out.extend_from_slice(sep);
    }

    write_indent(out, flags, level);
    out.extend_from_slice(b"]]");
    Ok(())
}

fn encode_table(
    table: &Table,
    flags: Flags,
    level: usize,
    is_root: bool,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let sep = separator(flags);

    if !is_root {
        out.push(b'[');
        if table.is_empty() {
            out.push(b']');
            return Ok(());
        }
        out.extend_from_slice(sep);
    }

    let child_level = if is_root { 0 } else { level + 1 };

    for (key, value) in table.iter() {
        write_indent(out, flags, child_level);

        let mut scratch = Vec::new();
        encode(value, flags, child_level, false, &mut scratch)?;

        if scratch == b"+" || scratch == b"-" || scratch == b";" {
            out.extend_from_slice(&scratch);
            out.extend_from_slice(key.as_bytes());
        } else {
            out.extend_from_slice(key.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&scratch);
        }
        out.extend_from_slice(sep);
    }

    write_indent(out, flags, level);
    if !is_root {
        out.push(b']');
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s6_value_first_shorthand_preserves_order() {
        let root = cfgfmt::parse(br#"+enabled ;disabled name "x""#);
        let out = serialize(&root, Flags::pretty()).unwrap();
        assert_eq!(out, b"+enabled\n;disabled\nname \"x\"\n");
    }

    #[test]
    fn empty_array_renders_as_double_bracket_pair() {
        let root = cfgfmt::parse(b"a [[]]");
        let out = serialize(&root, Flags::default()).unwrap();
        assert_eq!(out, b"a [[]] ");
    }

    #[test]
    fn four_numbers_render_as_vector_shorthand() {
        let root = cfgfmt::parse(b"v 1x2x3x4");
        let out = serialize(&root, Flags::default()).unwrap();
        assert_eq!(out, b"v 1x2x3x4 ");
    }

    #[test]
    fn five_numbers_do_not_qualify_as_a_vector() {
        // Constructed directly: the parser itself rejects a >4 vector
        // literal, but an array assembled programmatically can still
        // exceed the shorthand's cap and must fall back to bracket form.
        let mut arr = cfgfmt::Array::new();
        for i in 1..=5 {
            arr.push(cfgfmt::Value::Int(i));
        }
        let mut table = cfgfmt::Table::new();
        table.push("v", cfgfmt::Value::Array(arr));
        let out = serialize(&cfgfmt::Value::Table(table), Flags::default()).unwrap();
        assert_eq!(out, b"v [[ 1 2 3 4 5 ]] ");
    }

    #[test]
    fn root_array_of_numbers_is_not_rendered_as_a_vector() {
        let root = cfgfmt::parse(b"[[ 1 2 ]]");
        let out = serialize(&root, Flags::default()).unwrap();
        assert_eq!(out, b"[[ 1 2 ]]");
    }

    #[test]
    fn strings_are_escaped_on_the_way_out() {
        let mut table = cfgfmt::Table::new();
        table.push("k", cfgfmt::Value::String(b"say \"hi\" \\ bye".to_vec()));
        let out = serialize(&cfgfmt::Value::Table(table), Flags::default()).unwrap();
        let mut expected = br#"k "say \"hi\" \\ bye""#.to_vec();
        expected.push(b' ');
        assert_eq!(out, expected);
    }

    #[test]
    fn whole_number_floats_keep_a_decimal_point() {
        let mut table = cfgfmt::Table::new();
        table.push("a", cfgfmt::Value::Float(1.0));
        let out = serialize(&cfgfmt::Value::Table(table), Flags::default()).unwrap();
        assert_eq!(out, b"a 1.0 ");
    }

    #[test]
    fn round_trips_through_parse_and_serialize() {
        // Flags::default(), not pretty(): pretty-printing indents with tab,
        // and the lexer only treats space/newline as whitespace, so a
        // tab-indented document does not re-lex. Round-trip safety is a
        // property of the compact form only.
        let source: &[u8] = b"window [ size 180x190 ] name \"hi\" +enabled miku 39.39";
        let root = cfgfmt::parse(source);
        let text = serialize(&root, Flags::default()).unwrap();
        let reparsed = cfgfmt::parse(&text);
        assert_eq!(root, reparsed);
    }

    #[test]
    fn error_root_fails_to_serialize() {
        let root = cfgfmt::Value::Error("boom".into());
        assert_eq!(serialize(&root, Flags::default()), Err(Error::UnknownType));
    }
}
