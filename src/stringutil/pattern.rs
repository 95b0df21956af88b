//! Regex-based validators (phone, email, account name, character classes)

use once_cell::sync::Lazy;
use regex::Regex;

pub const PATTERN_PHONE: &str = r"^(0|\+?86)?[1-9]\d{10}$";
pub const PATTERN_PHONE_PART: &str = r"(0|\+?86)?[1-9]\d{10}";
pub const PATTERN_EMAIL: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
pub const PATTERN_ACCOUNT: &str = r"^[a-zA-Z0-9_]{4,20}$";

// Pre-compiled regex patterns (compiled once at first use)
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN_PHONE).unwrap());
static PHONE_PART_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN_PHONE_PART).unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN_EMAIL).unwrap());
static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN_ACCOUNT).unwrap());
static HAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Han}$").unwrap());
static NAME_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Han}A-Za-z\p{Nd}_]$").unwrap());
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Han}A-Za-z\p{Nd}_]+$").unwrap());

/// Every phone number in `input`; `max` caps the number of matches
pub fn find_all_phones(input: &str, max: Option<usize>) -> Vec<String> {
    PHONE_PART_RE
        .find_iter(input)
        .take(max.unwrap_or(usize::MAX))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn check_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn check_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 4-20 ASCII letters, digits or underscores
pub fn check_user_account(account: &str) -> bool {
    ACCOUNT_RE.is_match(account)
}

pub fn is_chinese(ch: char) -> bool {
    let mut buf = [0u8; 4];
    HAN_RE.is_match(ch.encode_utf8(&mut buf))
}

/// ASCII letter (a-z, A-Z)
pub fn is_english(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Chinese character, ASCII letter, decimal digit or underscore
pub fn is_char_valid(ch: char) -> bool {
    let mut buf = [0u8; 4];
    NAME_CHAR_RE.is_match(ch.encode_utf8(&mut buf))
}

/// Non-empty and made only of [`is_char_valid`] characters
pub fn is_name_valid(name: &str) -> bool {
    NAME_RE.is_match(name)
}
