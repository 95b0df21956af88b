//! Chinese character to pinyin

use ::pinyin::ToPinyin;

/// Toneless pinyin for every Chinese character, joined without a
/// separator. Anything else is kept as is: `"hi中国"` → `"hizhongguo"`.
pub fn pinyin(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for ch in s.chars() {
        match ch.to_pinyin() {
            Some(py) => out.push_str(py.plain()),
            None => out.push(ch),
        }
    }
    out
}
