//! Copy behaviour across shapes, from the caller's side
//!
//! | Destination | Source  | Path                 |
//! |-------------|---------|----------------------|
//! | struct      | struct  | structural merge     |
//! | map         | map     | structural merge     |
//! | map         | struct  | serialize round trip |
//! | struct      | map     | serialize round trip |

use std::collections::{BTreeMap, HashMap};

use kitbag::copier::{copy, copy_with_options, CopyError, CopyOptions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// =============================================================================
// FIXTURES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
    age: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Profile {
    display_name: String,
    tree_ids: Vec<i64>,
    nickname: Option<String>,
    address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct LegacyPerson {
    name: String,
    age: String,
    retired: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Inner {
    a: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Sparse {
    name: Option<String>,
    inner: Option<Inner>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Filled {
    name: String,
    inner: Inner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Nested {
    name: String,
    inner: Inner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Wide {
    name: String,
    age: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Narrow {
    name: String,
    age: u8,
}

kitbag::impl_record!(Person, Profile, Address, LegacyPerson, Sparse, Filled, Nested, Wide, Narrow);

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_struct_into_empty_struct_of_same_shape() {
    let src = Person {
        name: "polaris".into(),
        age: 23,
    };
    let mut dst = Person::default();
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn test_map_into_empty_map() {
    let src: HashMap<String, Value> = [
        ("name".to_string(), json!("polaris")),
        ("age".to_string(), json!(12)),
    ]
    .into_iter()
    .collect();
    let mut dst: HashMap<String, Value> = HashMap::new();
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn test_struct_into_map_uses_declared_names() {
    let src = Profile {
        display_name: "x".into(),
        tree_ids: vec![1],
        nickname: None,
        address: Address::default(),
    };
    let mut dst: BTreeMap<String, Value> = BTreeMap::new();
    copy(&mut dst, &src).unwrap();

    assert_eq!(dst["displayName"], json!("x"));
    assert_eq!(dst["treeIds"], json!([1]));
    assert!(!dst.contains_key("display_name"));
}

#[test]
fn test_map_into_struct_drops_unknown_and_keeps_absent() {
    let mut dst = Person {
        name: "old".into(),
        age: 40,
    };
    let src = json!({"name": "new", "email": "ignored@example.com"});
    copy(&mut dst, &src).unwrap();
    assert_eq!(
        dst,
        Person {
            name: "new".into(),
            age: 40
        }
    );
}

#[test]
fn test_pointer_and_value_destinations_agree() {
    let src: HashMap<&str, Value> = [("name", json!("boxed")), ("age", json!(3))]
        .into_iter()
        .collect();

    let mut plain = Person::default();
    let mut boxed = Box::new(Person::default());
    copy(&mut plain, &src).unwrap();
    copy(&mut boxed, &src).unwrap();
    assert_eq!(plain, *boxed);
}

#[test]
fn test_nested_struct_merges_deep() {
    let mut dst = Profile {
        display_name: "keep".into(),
        tree_ids: vec![9, 9],
        nickname: Some("nick".into()),
        address: Address {
            city: "Paris".into(),
            zip: "75001".into(),
        },
    };
    let src = json!({"treeIds": [1, 2, 3], "address": {"zip": "75002"}});

    // A JSON object source into a record goes through the round trip, which
    // decodes into the existing nested record
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.address.city, "Paris");
    assert_eq!(dst.address.zip, "75002");
    assert_eq!(dst.tree_ids, vec![1, 2, 3]);
    assert_eq!(dst.display_name, "keep");

    // A record source merges nested records field by field
    let mut dst = Profile {
        address: Address {
            city: "Paris".into(),
            zip: "75001".into(),
        },
        ..Profile::default()
    };
    let mut src = dst.clone();
    src.address.zip = "75002".into();
    src.display_name = "new".into();
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.address.city, "Paris");
    assert_eq!(dst.address.zip, "75002");
}

#[test]
fn test_none_fields_leave_plain_fields_alone() {
    let src = Sparse {
        name: None,
        inner: None,
    };
    let mut dst = Filled {
        name: "keep".into(),
        inner: Inner { a: 5 },
    };
    copy(&mut dst, &src).unwrap();
    assert_eq!(
        dst,
        Filled {
            name: "keep".into(),
            inner: Inner { a: 5 }
        }
    );

    let src = Sparse {
        name: Some("set".into()),
        inner: None,
    };
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.name, "set");
    assert_eq!(dst.inner.a, 5);
}

#[test]
fn test_plain_fields_fill_option_fields() {
    let src = Filled {
        name: "n".into(),
        inner: Inner { a: 2 },
    };
    let mut dst = Sparse::default();
    copy(&mut dst, &src).unwrap();
    assert_eq!(
        dst,
        Sparse {
            name: Some("n".into()),
            inner: Some(Inner { a: 2 })
        }
    );
}

#[test]
fn test_partial_nested_map_keeps_nested_fields() {
    let mut dst = Nested {
        name: "n".into(),
        inner: Inner { a: 7 },
    };
    let src: HashMap<&str, Value> = [("inner", json!({}))].into_iter().collect();
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.name, "n");
    assert_eq!(dst.inner.a, 7);

    let src: HashMap<&str, Value> = [("inner", json!({"a": 8}))].into_iter().collect();
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.inner.a, 8);
}

#[test]
fn test_null_map_value_keeps_struct_field() {
    let mut dst = Nested {
        name: "n".into(),
        inner: Inner { a: 7 },
    };
    copy(&mut dst, &json!({"name": null, "inner": null})).unwrap();
    assert_eq!(dst.name, "n");
    assert_eq!(dst.inner.a, 7);
}

#[test]
fn test_out_of_range_number_is_skipped() {
    let src = Wide {
        name: "wide".into(),
        age: 300,
    };
    let mut dst = Narrow {
        name: "keep".into(),
        age: 1,
    };
    copy(&mut dst, &src).unwrap();
    assert_eq!(
        dst,
        Narrow {
            name: "wide".into(),
            age: 1
        }
    );

    let err = copy_with_options(
        &mut dst,
        &Wide {
            name: "neg".into(),
            age: -1,
        },
        &CopyOptions::default().with_strict(true),
    )
    .unwrap_err();
    match err {
        CopyError::StructuralCopy { path, .. } => assert_eq!(path, "age"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_incompatible_field_skipped_or_rejected() {
    let src = Person {
        name: "ada".into(),
        age: 36,
    };
    let mut dst = LegacyPerson {
        name: String::new(),
        age: "unknown".into(),
        retired: true,
    };
    copy(&mut dst, &src).unwrap();
    assert_eq!(dst.name, "ada");
    assert_eq!(dst.age, "unknown");
    assert!(dst.retired);

    let mut strict_dst = LegacyPerson::default();
    let err = copy_with_options(
        &mut strict_dst,
        &src,
        &CopyOptions::default().with_strict(true),
    )
    .unwrap_err();
    match err {
        CopyError::StructuralCopy {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, "age");
            assert_eq!(expected, "string");
            assert_eq!(found, "integer");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_ignore_empty_keeps_destination_values() {
    let src = Person {
        name: String::new(),
        age: 7,
    };
    let mut dst = Person {
        name: "kept".into(),
        age: 1,
    };
    copy_with_options(&mut dst, &src, &CopyOptions::default().with_ignore_empty(true)).unwrap();
    assert_eq!(dst.name, "kept");
    assert_eq!(dst.age, 7);
}

#[test]
fn test_copy_error_into_kit_error() {
    fn run() -> kitbag::Result<Person> {
        let mut dst = Person::default();
        copy(&mut dst, &json!({"age": "forty"}))?;
        Ok(dst)
    }
    let err = run().unwrap_err();
    assert_eq!(err.code(), "KIT-001");
}

#[test]
fn test_concurrent_copies_on_disjoint_destinations() {
    let src = Person {
        name: "shared".into(),
        age: 5,
    };
    let mut dsts = vec![Person::default(); 8];
    std::thread::scope(|s| {
        for dst in dsts.iter_mut() {
            let src = &src;
            s.spawn(move || copy(dst, src).unwrap());
        }
    });
    assert!(dsts.iter().all(|d| *d == src));
}

// =============================================================================
// PROPERTIES
// =============================================================================

prop_compose! {
    fn arb_profile()(
        display_name in "[a-zA-Z0-9 ]{0,16}",
        tree_ids in prop::collection::vec(any::<i64>(), 0..6),
        nickname in prop::option::of("[a-z]{1,8}"),
        city in "[A-Za-z]{0,10}",
        zip in "[0-9]{0,5}",
    ) -> Profile {
        Profile {
            display_name,
            tree_ids,
            nickname,
            address: Address { city, zip },
        }
    }
}

proptest! {
    /// Same-type copy into an empty destination reproduces the source
    #[test]
    fn prop_same_type_copy_is_equal(src in arb_profile()) {
        let mut dst = Profile::default();
        copy(&mut dst, &src).unwrap();
        prop_assert_eq!(dst, src);
    }

    /// Over a filled destination, only `None` source fields keep the old value
    #[test]
    fn prop_same_type_copy_over_existing(src in arb_profile(), start in arb_profile()) {
        let mut dst = start.clone();
        copy(&mut dst, &src).unwrap();
        let expected = Profile {
            nickname: src.nickname.clone().or(start.nickname),
            ..src
        };
        prop_assert_eq!(dst, expected);
    }

    /// Integers outside the destination's range never fail a default copy
    #[test]
    fn prop_narrowing_copy_never_fails(age in any::<i64>(), prior in any::<u8>()) {
        let src = Wide { name: "w".into(), age };
        let mut dst = Narrow { name: String::new(), age: prior };
        copy(&mut dst, &src).unwrap();
        let expected = u8::try_from(age).unwrap_or(prior);
        prop_assert_eq!(dst.age, expected);
        prop_assert_eq!(dst.name, "w");
    }

    /// Copying twice gives the same result as copying once
    #[test]
    fn prop_copy_is_idempotent(src in arb_profile(), start in arb_profile()) {
        let mut once = start.clone();
        copy(&mut once, &src).unwrap();
        let mut twice = start;
        copy(&mut twice, &src).unwrap();
        copy(&mut twice, &src).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Struct → map equals a name-preserving serialize/deserialize round trip
    #[test]
    fn prop_struct_to_map_matches_round_trip(src in arb_profile()) {
        let mut dst: BTreeMap<String, Value> = BTreeMap::new();
        copy(&mut dst, &src).unwrap();
        let expected: BTreeMap<String, Value> =
            serde_json::from_value(serde_json::to_value(&src).unwrap()).unwrap();
        prop_assert_eq!(dst, expected);
    }

    /// Map → struct → map gives back the same map
    #[test]
    fn prop_map_struct_map_is_lossless(src in arb_profile()) {
        let mut map: BTreeMap<String, Value> = BTreeMap::new();
        copy(&mut map, &src).unwrap();
        let mut back = Profile::default();
        copy(&mut back, &map).unwrap();
        prop_assert_eq!(back, src);
    }
}
