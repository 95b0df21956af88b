//! String helpers
//!
//! - `case`: snake_case ⇄ CamelCase with common initialisms
//! - `pattern`: phone, email and account validators
//! - `similarity`: Levenshtein, Jaro, LCS
//! - `text`: char-indexed slicing, splitting, unicode escapes
//! - `builder`: chainable [`Builder`]
//! - `hanzi`: [`pinyin`] transliteration

mod builder;
mod case;
mod hanzi;
mod pattern;
mod similarity;
mod text;

pub use builder::Builder;
pub use hanzi::pinyin;
pub use case::{camel_to_underscore, underscore_to_lower_camel, underscore_to_upper_camel};
pub use pattern::{
    check_email, check_phone, check_user_account, find_all_phones, is_char_valid, is_chinese,
    is_english, is_name_valid, PATTERN_ACCOUNT, PATTERN_EMAIL, PATTERN_PHONE, PATTERN_PHONE_PART,
};
pub use similarity::{find_similarity_index, jaro, levenshtein, longest_common_subsequence, similarity};
pub use text::{repeat_concat, reverse, split_any, unicode_decode, utf8_slice};
