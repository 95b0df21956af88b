//! snake_case ⇄ CamelCase conversion
//!
//! Word splitting is `heck`'s. Known initialisms are title-cased before
//! splitting, so an initialism always ends up as one word.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;

/// Acronyms kept as a single word when splitting CamelCase
const COMMON_INITIALISMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TLS", "TTL", "UID", "UI",
    "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

/// (initialism, title-cased form), longest first so `HTTPS` beats `HTTP`
static INITIALISM_TABLE: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    let mut table: Vec<_> = COMMON_INITIALISMS
        .iter()
        .map(|&word| (word, title_word(&word.to_lowercase())))
        .collect();
    table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    table
});

fn title_word(word: &str) -> String {
    word.to_upper_camel_case()
}

/// `user_name_id` → `UserNameId`
pub fn underscore_to_upper_camel(s: &str) -> String {
    s.to_upper_camel_case()
}

/// `user_name_id` → `userNameId`
pub fn underscore_to_lower_camel(s: &str) -> String {
    s.to_lower_camel_case()
}

/// `OrgID` → `org_id`, `AtomicPerm` → `atomic_perm`
pub fn camel_to_underscore(s: &str) -> String {
    soften_initialisms(s).to_snake_case()
}

/// Rewrite known acronyms as title-cased words (`ID` → `Id`)
fn soften_initialisms(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    'scan: while let Some(ch) = rest.chars().next() {
        for (word, titled) in INITIALISM_TABLE.iter() {
            if rest.starts_with(word) {
                out.push_str(titled);
                rest = &rest[word.len()..];
                continue 'scan;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_underscore() {
        assert_eq!(camel_to_underscore("AtomicPerm"), "atomic_perm");
        assert_eq!(camel_to_underscore("OrgID"), "org_id");
        assert_eq!(camel_to_underscore("HTTPSProxy"), "https_proxy");
        assert_eq!(camel_to_underscore("userUUID"), "user_uuid");
        assert_eq!(camel_to_underscore(""), "");
        assert_eq!(camel_to_underscore("UUIDValue"), "uuid_value");
        assert_eq!(camel_to_underscore("parseJSONBody"), "parse_json_body");
    }

    #[test]
    fn test_underscore_to_camel() {
        assert_eq!(underscore_to_upper_camel("user_name"), "UserName");
        assert_eq!(underscore_to_upper_camel("API_key"), "ApiKey");
        assert_eq!(underscore_to_lower_camel("user_name"), "userName");
        assert_eq!(underscore_to_lower_camel(""), "");
    }
}
