//! Line-oriented `key=value` loading

use std::fs;
use std::path::Path;

use crate::core::{ConfigError, ConfigResult};

/// Whitespace as the C locale's `isspace` sees it: ASCII only, vertical tab included
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B
}

/// Reduce one raw line to a `(key, value)` pair.
///
/// All ASCII whitespace is stripped first, including whitespace inside the
/// key or value. Returns `None` for blank lines, `#` comments and lines
/// without `=`. Bytes that are not valid UTF-8 become U+FFFD.
///
/// ```
/// use reuse_config::parse_line;
///
/// assert_eq!(parse_line(b" db host = my server "), Some(("dbhost".into(), "myserver".into())));
/// assert_eq!(parse_line(b"url=a=b"), Some(("url".into(), "a=b".into())));
/// assert_eq!(parse_line(b"  # note"), None);
/// ```
pub fn parse_line(raw: &[u8]) -> Option<(String, String)> {
    let line: Vec<u8> = raw.iter().copied().filter(|&b| !is_space(b)).collect();
    if line.first().is_none_or(|&b| b == b'#') {
        return None;
    }
    let eq = line.iter().position(|&b| b == b'=')?;
    Some((
        String::from_utf8_lossy(&line[..eq]).into_owned(),
        String::from_utf8_lossy(&line[eq + 1..]).into_owned(),
    ))
}

/// Split `bytes` into lines at `\n`
pub(crate) fn lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split(|&b| b == b'\n')
}

/// Read the whole file at `path`
pub(crate) fn read_file(path: &Path) -> ConfigResult<Vec<u8>> {
    fs::read(path).map_err(|source| ConfigError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips() {
        assert_eq!(parse_line(b""), None);
        assert_eq!(parse_line(b" \t\r\x0B\x0C"), None);
        assert_eq!(parse_line(b"#host=x"), None);
        assert_eq!(parse_line(b"just words"), None);
    }

    #[test]
    fn test_empty_key_and_value() {
        assert_eq!(parse_line(b"=v"), Some((String::new(), "v".into())));
        assert_eq!(parse_line(b"k="), Some(("k".into(), String::new())));
    }

    #[test]
    fn test_hash_after_whitespace_is_comment() {
        // leading whitespace is gone before the comment check
        assert_eq!(parse_line(b"   #k=v"), None);
        assert_eq!(parse_line(b"k=v#x"), Some(("k".into(), "v#x".into())));
    }

    #[test]
    fn test_non_ascii_space_is_kept() {
        let line = "host=a\u{00A0}b";
        assert_eq!(
            parse_line(line.as_bytes()),
            Some(("host".into(), "a\u{00A0}b".into()))
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(
            parse_line(b"name=caf\xe9"),
            Some(("name".into(), "caf\u{FFFD}".into()))
        );
    }

    #[test]
    fn test_lines_split_on_newline_only() {
        let split: Vec<&[u8]> = lines(b"a=1\r\nb=2\n").collect();
        assert_eq!(split, vec![&b"a=1\r"[..], &b"b=2"[..], &b""[..]]);
    }
}
