//! Slice helpers
//!
//! Set-style operations over slices plus projections that group or index a
//! slice by a key. Set operations keep the iteration order of their input
//! so results are deterministic.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{KitError, Result};

/// Join integers with a separator: `[1, 2, 3]` + `","` → `"1,2,3"`
pub fn join_ints<T: Display>(elems: &[T], sep: &str) -> String {
    elems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn map<T, R>(items: &[T], f: impl FnMut(&T) -> R) -> Vec<R> {
    items.iter().map(f).collect()
}

pub fn filter<T: Clone>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
    items.iter().filter(|e| predicate(*e)).cloned().collect()
}

/// Elements of `t` that are not in `r`
pub fn diff<T: Eq + Hash + Clone>(t: &[T], r: &[T]) -> Vec<T> {
    let exclude: HashSet<&T> = r.iter().collect();
    t.iter().filter(|e| !exclude.contains(e)).cloned().collect()
}

/// Distinct elements of `r` followed by those of `t` not already seen
pub fn union<T: Eq + Hash + Clone>(t: &[T], r: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(t.len() + r.len());
    r.iter()
        .chain(t.iter())
        .filter(|e| seen.insert(*e))
        .cloned()
        .collect()
}

/// Drop repeated elements, keeping the first occurrence
pub fn distinct<T: Eq + Hash + Clone>(t: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(t.len());
    t.iter().filter(|e| seen.insert(*e)).cloned().collect()
}

/// Elements of `t` that are also in `r`
pub fn inter<T: Eq + Hash + Clone>(t: &[T], r: &[T]) -> Vec<T> {
    let keep: HashSet<&T> = r.iter().collect();
    t.iter().filter(|e| keep.contains(e)).cloned().collect()
}

pub fn contains<T: PartialEq>(elems: &[T], item: &T) -> bool {
    elems.iter().any(|e| e == item)
}

/// Split into chunks of `size`; the last chunk holds the remainder.
/// A `size` of zero yields no chunks.
pub fn split_slice<T: Clone>(list: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    list.chunks(size).map(<[T]>::to_vec).collect()
}

/// Convert every integer to another integer type, failing on overflow
pub fn transfer_int_slice<K, V>(source: &[K]) -> Result<Vec<V>>
where
    K: Copy + Display,
    V: TryFrom<K>,
{
    source
        .iter()
        .map(|&v| {
            V::try_from(v).map_err(|_| KitError::IntOverflow {
                value: v.to_string(),
            })
        })
        .collect()
}

/// Project one field out of every element.
///
/// With `skip_default` set, projections equal to `S::default()` are dropped.
pub fn extract<T, S>(slice: &[T], field: impl Fn(&T) -> S, skip_default: bool) -> Vec<S>
where
    S: Default + PartialEq,
{
    slice
        .iter()
        .map(field)
        .filter(|v| !(skip_default && *v == S::default()))
        .collect()
}

/// Index elements by a key; later elements win on duplicate keys
pub fn index_by<T, S>(slice: &[T], key: impl Fn(&T) -> S, skip_default: bool) -> HashMap<S, T>
where
    T: Clone,
    S: Eq + Hash + Default,
{
    let mut out = HashMap::with_capacity(slice.len());
    for e in slice {
        let k = key(e);
        if skip_default && k == S::default() {
            continue;
        }
        out.insert(k, e.clone());
    }
    out
}

/// Group elements by a key, preserving order inside each group
pub fn group_by<T, S>(slice: &[T], key: impl Fn(&T) -> S, skip_default: bool) -> HashMap<S, Vec<T>>
where
    T: Clone,
    S: Eq + Hash + Default,
{
    let mut out: HashMap<S, Vec<T>> = HashMap::new();
    for e in slice {
        let k = key(e);
        if skip_default && k == S::default() {
            continue;
        }
        out.entry(k).or_default().push(e.clone());
    }
    out
}

/// Group maps by the value stored under `field`; maps lacking the field
/// are left out
pub fn group_maps_by<K, V>(slice: &[HashMap<K, V>], field: &K) -> HashMap<V, Vec<HashMap<K, V>>>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    let mut out: HashMap<V, Vec<HashMap<K, V>>> = HashMap::new();
    for m in slice {
        if let Some(v) = m.get(field) {
            out.entry(v.clone()).or_default().push(m.clone());
        }
    }
    out
}
