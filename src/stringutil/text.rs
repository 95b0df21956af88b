//! Char-oriented text helpers

use std::collections::HashSet;

/// `count` copies of `s` joined by `sep`
pub fn repeat_concat(s: &str, count: usize, sep: &str) -> String {
    vec![s; count].join(sep)
}

pub fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

/// Characters `i..j` of `s`, indices clamped to the char count
pub fn utf8_slice(s: &str, i: usize, j: usize) -> String {
    let n = s.chars().count();
    let end = j.min(n);
    let start = i.min(end);
    s.chars().skip(start).take(end - start).collect()
}

/// Split on any character of `seps`.
///
/// Each separator ends a piece; with `include_separator` it stays at the end
/// of that piece. A trailing separator produces no empty tail. Empty input or
/// empty `seps` returns the input as the only piece.
pub fn split_any(s: &str, seps: &str, include_separator: bool) -> Vec<String> {
    if s.is_empty() || seps.is_empty() {
        return vec![s.to_string()];
    }

    let seps: HashSet<char> = seps.chars().collect();
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in s.chars() {
        if seps.contains(&ch) {
            if include_separator {
                current.push(ch);
            }
            pieces.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Decode `\uXXXX` escapes (surrogate pairs included) plus `\\`, `\"`,
/// `\n`, `\r`, `\t`. Malformed input is returned unchanged.
pub fn unicode_decode(text: &str) -> String {
    decode_escapes(text).unwrap_or_else(|| text.to_string())
}

fn decode_escapes(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'u' => {
                let high = read_hex4(&mut chars)?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = read_hex4(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code)?);
            }
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            _ => return None,
        }
    }
    Some(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repeat_concat() {
        assert_eq!(repeat_concat("?", 3, ","), "?,?,?");
        assert_eq!(repeat_concat("?", 1, ","), "?");
        assert_eq!(repeat_concat("?", 0, ","), "");
    }

    #[test]
    fn test_reverse() {
        assert_eq!(reverse("abc"), "cba");
        assert_eq!(reverse("中文"), "文中");
        assert_eq!(reverse(""), "");
    }

    #[test]
    fn test_utf8_slice() {
        assert_eq!(utf8_slice("你好世界", 1, 3), "好世");
        assert_eq!(utf8_slice("你好世界", 2, 10), "世界");
        assert_eq!(utf8_slice("你好", 5, 10), "");
        assert_eq!(utf8_slice("abc", 0, 3), "abc");
    }

    #[test]
    fn test_split_any() {
        let text = "第一句，第二句。第三句;";
        assert_eq!(split_any(text, "。;", false), vec!["第一句，第二句", "第三句"]);
        assert_eq!(
            split_any(text, "，。;", true),
            vec!["第一句，", "第二句。", "第三句;"]
        );
        assert_eq!(split_any("a,,b", ",", false), vec!["a", "", "b"]);
        assert_eq!(split_any("", ".", false), vec![""]);
        assert_eq!(split_any("no seps", "", false), vec!["no seps"]);
    }

    #[test]
    fn test_unicode_decode() {
        assert_eq!(unicode_decode(r"\u4e2d\u6587"), "中文");
        assert_eq!(unicode_decode(r"a\u0062c"), "abc");
        assert_eq!(unicode_decode(r"\ud83d\ude00"), "😀");
        assert_eq!(unicode_decode(r"line\nnext"), "line\nnext");
        assert_eq!(unicode_decode("plain"), "plain");
        assert_eq!(unicode_decode(r"\u12"), r"\u12");
        assert_eq!(unicode_decode(r"\q"), r"\q");
    }
}
