use crate::lexer;
use crate::token::TokenKind;
use crate::value::Value;

/// Resolves a dotted path (`window.size`, `items.0`, `a."b.c"`) against an
/// already-parsed tree, reusing the lexer to tokenize the path string.
///
/// Returns a borrowed reference into `root` — never a new allocation — or
/// `None` on any kind mismatch, missing key, out-of-range index, or
/// unsupported token. There is no separate error type for path failures:
/// a missing path is a not-found signal, not a diagnostic, unlike lex/parse
/// errors.
pub fn query<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let tokens = lexer::tokenize(path.as_bytes()).ok()?;
    if tokens.is_empty() {
        return None;
    }

    let mut pos = 0;
    let mut current = root;

    loop {
        let segment = tokens.get(pos)?;
        pos += 1;

        current = match (current, &segment.kind) {
            (Value::Array(arr), TokenKind::Int(i)) => {
                let index = usize::try_from(*i).ok()?;
                arr.get(index)?
            }
            (Value::Table(t), TokenKind::Ident(key)) => t.get(key)?,
            (Value::Table(t), TokenKind::String(bytes)) => {
                t.get(String::from_utf8_lossy(bytes).as_ref())?
            }
            _ => return None,
        };

        match tokens.get(pos) {
            None => return Some(current),
            Some(t) if matches!(t.kind, TokenKind::Dot) => pos += 1,
            Some(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_nested_dotted_path() {
        let root = parse(b"a.b.c 7");
        assert_eq!(query(&root, "a.b.c"), Some(&Value::Int(7)));
        assert_eq!(query(&root, "a.b.d"), None);
    }

    #[test]
    fn resolves_array_index() {
        let root = parse(b"items [[ 1 2 3 ]]");
        assert_eq!(query(&root, "items.1"), Some(&Value::Int(2)));
        assert_eq!(query(&root, "items.9"), None);
    }

    #[test]
    fn resolves_quoted_key_with_dots() {
        let root = parse(br#"a [ "b.c" 1 ]"#);
        assert_eq!(query(&root, r#"a."b.c""#), Some(&Value::Int(1)));
    }
}
