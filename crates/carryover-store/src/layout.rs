//! Reader for the migrated line layout
//!
//! Reads back exactly what the serializer writes: one `key: value` line per
//! dotted key at any indentation, `- 'item'` lines under a list key, and
//! `#` comment lines. Indentation carries no meaning because every key is
//! already a full dotted path.

use crate::document::YamlDocument;
use crate::error::DocumentError;
use carryover_core::ConfigValue;

/// Read text in the migrated layout
///
/// # Errors
/// - `DocumentError::Layout` for a line that is neither a comment, a
///   `key: value` pair, nor a list item following a list key
pub fn parse_migrated(text: &str) -> Result<YamlDocument, DocumentError> {
    let mut doc = YamlDocument::new();
    let mut open_list: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(item) = list_item(line) {
            let key = open_list
                .as_deref()
                .ok_or_else(|| DocumentError::layout(line_no, "list item without a list key"))?;
            let item = match parse_scalar(item, line_no)? {
                ConfigValue::Text(s) => s,
                ConfigValue::Number(n) => n.to_string(),
                ConfigValue::Boolean(b) => b.to_string(),
                ConfigValue::List(_) => {
                    return Err(DocumentError::layout(line_no, "nested list item"));
                }
            };
            doc.push_item(key, item);
            continue;
        }

        let (key, rest) = split_key(line)
            .ok_or_else(|| DocumentError::layout(line_no, format!("expected `key: value`, found '{line}'")))?;

        if rest.is_empty() {
            // Items, if any, follow on the next lines.
            doc.insert(key, None);
            open_list = Some(key.to_string());
        } else {
            doc.insert(key, Some(parse_scalar(rest, line_no)?));
            open_list = None;
        }
    }

    Ok(doc)
}

fn list_item(line: &str) -> Option<&str> {
    if line == "-" {
        Some("")
    } else {
        line.strip_prefix("- ").map(str::trim)
    }
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = match line.find(": ") {
        Some(at) => (&line[..at], line[at + 2..].trim()),
        None => (line.strip_suffix(':')?, ""),
    };
    let key = key.trim();
    (!key.is_empty()).then_some((key, rest))
}

fn parse_scalar(text: &str, line_no: usize) -> Result<ConfigValue, DocumentError> {
    if let Some(inner) = text.strip_prefix('\'') {
        let inner = inner
            .strip_suffix('\'')
            .ok_or_else(|| DocumentError::layout(line_no, "unterminated single-quoted value"))?;
        return Ok(ConfigValue::Text(inner.replace("''", "'")));
    }
    if let Some(inner) = text.strip_prefix('"') {
        let inner = inner
            .strip_suffix('"')
            .filter(|body| !ends_in_escape(body))
            .ok_or_else(|| DocumentError::layout(line_no, "unterminated double-quoted value"))?;
        return unescape(inner, line_no).map(ConfigValue::Text);
    }

    let value = match text {
        "[]" => ConfigValue::List(Vec::new()),
        "true" => ConfigValue::Boolean(true),
        "false" => ConfigValue::Boolean(false),
        _ => {
            if let Ok(n) = text.parse::<i64>() {
                ConfigValue::from(n)
            } else if looks_numeric(text) {
                text.parse::<f64>()
                    .map_or_else(|_| ConfigValue::from(text), ConfigValue::from)
            } else {
                ConfigValue::from(text)
            }
        }
    };
    Ok(value)
}

/// Whether the closing quote found is itself escaped, as in `"a\"`
fn ends_in_escape(body: &str) -> bool {
    body.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Resolve the backslash escapes of a double-quoted value
fn unescape(body: &str, line_no: usize) -> Result<String, DocumentError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('0') => '\0',
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some(' ') => ' ',
            Some('x') => hex_char(&mut chars, 2, line_no)?,
            Some('u') => hex_char(&mut chars, 4, line_no)?,
            Some('U') => hex_char(&mut chars, 8, line_no)?,
            Some(other) => {
                return Err(DocumentError::layout(line_no, format!("unknown escape '\\{other}'")));
            }
            None => return Err(DocumentError::layout(line_no, "dangling backslash")),
        };
        out.push(escaped);
    }

    Ok(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize, line_no: usize) -> Result<char, DocumentError> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return Err(DocumentError::layout(line_no, "truncated hex escape"));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| DocumentError::layout(line_no, format!("invalid hex escape '{hex}'")))
}

fn looks_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_scalars() {
        let doc = parse_migrated(
            "# c\nname: 'it''s'\ncount: 3\nratio: 2.0\nflag: false\nplain: hello\n",
        )
        .unwrap();

        assert_eq!(doc.get_dotted("name"), Some(&ConfigValue::from("it's")));
        assert_eq!(doc.get_dotted("count"), Some(&ConfigValue::from(3)));
        assert_eq!(doc.get_dotted("ratio"), Some(&ConfigValue::from(2.0)));
        assert_eq!(doc.get_dotted("flag"), Some(&ConfigValue::from(false)));
        assert_eq!(doc.get_dotted("plain"), Some(&ConfigValue::from("hello")));
    }

    #[test]
    fn reads_nested_lists() {
        let doc = parse_migrated("  x.y: \n    - 'a'\n    - 'b'\n\nz: 1").unwrap();
        assert_eq!(doc.get_dotted("x.y"), Some(&ConfigValue::from(vec!["a", "b"])));
        assert!(doc.contains("x"));
        assert_eq!(doc.get_dotted("z"), Some(&ConfigValue::from(1)));
    }

    #[test]
    fn empty_list_forms() {
        let doc = parse_migrated("a: []\nb: \n").unwrap();
        assert_eq!(doc.get_dotted("a"), Some(&ConfigValue::List(Vec::new())));
        assert_eq!(doc.get_dotted("b"), None);
        assert!(doc.contains("b"));
    }

    #[test]
    fn quoted_numbers_stay_text() {
        let doc = parse_migrated("a: '30'\nb: 'true'\n").unwrap();
        assert_eq!(doc.get_dotted("a"), Some(&ConfigValue::from("30")));
        assert_eq!(doc.get_dotted("b"), Some(&ConfigValue::from("true")));
    }

    #[test]
    fn reads_escaped_double_quotes() {
        let doc = parse_migrated(
            "msg: \"line1\\nline2\"\nquote: \"say \\\"hi\\\"\"\nbell: \"\\u0007\\t\\\\\"\n",
        )
        .unwrap();
        assert_eq!(doc.get_dotted("msg"), Some(&ConfigValue::from("line1\nline2")));
        assert_eq!(doc.get_dotted("quote"), Some(&ConfigValue::from("say \"hi\"")));
        assert_eq!(doc.get_dotted("bell"), Some(&ConfigValue::from("\u{7}\t\\")));
    }

    #[test]
    fn escaped_closing_quote_is_unterminated() {
        assert!(parse_migrated("a: \"open\\\"\n").is_err());
        assert!(parse_migrated("a: \"\\q\"\n").is_err());
    }

    #[test]
    fn item_without_list_key_fails() {
        let err = parse_migrated("a: 1\n  - 'x'\n").unwrap_err();
        assert!(matches!(err, DocumentError::Layout { line: 2, .. }));
    }

    #[test]
    fn unterminated_quote_fails() {
        assert!(parse_migrated("a: 'open\n").is_err());
    }

    #[test]
    fn line_without_separator_fails() {
        assert!(parse_migrated("just words\n").is_err());
    }
}
