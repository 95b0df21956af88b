//! Copier Module - copy values between structs and maps
//!
//! Copies field/key values from a source into a destination whose type may
//! differ. The pair of [`Shape`]s decides the strategy:
//!
//! | destination | source  | strategy                |
//! |-------------|---------|-------------------------|
//! | Mapping     | Record  | serialize round trip    |
//! | Record      | Mapping | serialize round trip    |
//! | anything else         || structural merge        |
//!
//! Both strategies go through `serde_json::Value`, so field names follow
//! `#[serde(rename = "...")]` attributes.
//!
//! ```rust,ignore
//! #[derive(Serialize, Deserialize, Default)]
//! struct Person { name: String, age: u32 }
//! kitbag::impl_record!(Person);
//!
//! let src = Person { name: "polaris".into(), age: 23 };
//! let mut dst: HashMap<String, Value> = HashMap::new();
//! kitbag::copier::copy(&mut dst, &src)?;
//! assert_eq!(dst["name"], "polaris");
//! ```

mod merge;
mod shape;

pub use merge::{is_empty, kind, merge_values, overlay, KeyPolicy};
pub use shape::{Copyable, Shape};

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use thiserror::Error;
use tracing::{debug, trace};

/// Copy failures
#[derive(Error, Debug)]
pub enum CopyError {
    /// Source (or the destination's current state) could not be serialized
    #[error("copy source cannot be serialized: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Intermediate form could not populate the destination type
    #[error("copy destination cannot be populated: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Strict structural copy met a field with a different type
    #[error("field '{path}' expects {expected} but the source holds {found}")]
    StructuralCopy {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Copy behaviour switches. The default copies every field and skips
/// type-incompatible ones silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Source fields holding a zero value leave the destination untouched
    pub ignore_empty: bool,
    /// Incompatible fields fail the structural copy instead of being skipped
    pub strict: bool,
}

impl CopyOptions {
    pub fn with_ignore_empty(mut self, ignore_empty: bool) -> Self {
        self.ignore_empty = ignore_empty;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// How a copy is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Field-by-field merge of same-kind values
    Structural,
    /// Serialize the source, deserialize into the destination
    SerializeRoundTrip,
}

/// Pick the strategy for a (destination, source) shape pair
pub fn strategy(dst: Shape, src: Shape) -> Strategy {
    match (dst, src) {
        (Shape::Mapping, Shape::Record) | (Shape::Record, Shape::Mapping) => {
            Strategy::SerializeRoundTrip
        }
        _ => Strategy::Structural,
    }
}

/// Copy `src` into `dst` with default options
pub fn copy<D, S>(dst: &mut D, src: &S) -> Result<(), CopyError>
where
    D: Copyable + DeserializeOwned,
    S: Copyable + ?Sized,
{
    copy_with_options(dst, src, &CopyOptions::default())
}

/// Copy `src` into `dst`.
///
/// Destination fields the source does not carry keep their values; source
/// fields the destination record does not declare are dropped.
pub fn copy_with_options<D, S>(dst: &mut D, src: &S, opts: &CopyOptions) -> Result<(), CopyError>
where
    D: Copyable + DeserializeOwned,
    S: Copyable + ?Sized,
{
    let dst_shape = dst.shape();
    let plan = strategy(dst_shape, src.shape());
    trace!(?plan, ?dst_shape, "copying value");

    let original = serde_json::to_value(&*dst).map_err(CopyError::Serialization)?;
    let source = serde_json::to_value(src).map_err(CopyError::Serialization)?;
    let mut target = original.clone();

    match plan {
        Strategy::SerializeRoundTrip => {
            overlay(&mut target, source, opts);
            *dst = serde_json::from_value(target).map_err(CopyError::Deserialization)?;
        }
        Strategy::Structural => {
            let policy = match dst_shape {
                Shape::Record => KeyPolicy::Closed,
                Shape::Mapping | Shape::Other => KeyPolicy::Open,
            };
            merge_values(&mut target, &source, policy, opts)?;
            *dst = populate(target, &original, opts)?;
        }
    }
    Ok(())
}

/// Deserialize the merged tree, backing out fields the destination type
/// rejects (an integer out of range, a negative into an unsigned field).
///
/// Each rejected field is restored to its original value. A field the
/// destination did not hold is removed, or its nearest enclosing value is
/// restored. Decoding is then retried. Under
/// `strict` the first rejected field is reported instead.
fn populate<D: DeserializeOwned>(
    mut target: Value,
    original: &Value,
    opts: &CopyOptions,
) -> Result<D, CopyError> {
    loop {
        let err = match serde_path_to_error::deserialize::<_, D>(&target) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let segments: Vec<&Segment> = err.path().iter().collect();
        let path = err.path().to_string();

        let Some(current) = value_at(&target, &segments) else {
            return Err(CopyError::Deserialization(err.into_inner()));
        };
        let before = value_at(original, &segments);
        if segments.is_empty() || before == Some(current) {
            return Err(CopyError::Deserialization(err.into_inner()));
        }
        if opts.strict {
            return Err(CopyError::StructuralCopy {
                path,
                expected: before.map_or("nothing", kind),
                found: kind(current),
            });
        }

        debug!(field = %path, error = %err.inner(), "destination rejected field, keeping prior value");
        let restored = match before.cloned() {
            Some(prior) => replace_at(&mut target, &segments, prior),
            None => remove_at(&mut target, &segments)
                .or_else(|| restore_ancestor(&mut target, original, &segments)),
        };
        if restored.is_none() {
            return Err(CopyError::Deserialization(err.into_inner()));
        }
    }
}

fn value_at<'a>(root: &'a Value, segments: &[&Segment]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |value, segment| match segment {
        Segment::Map { key } => value.get(key.as_str()),
        Segment::Seq { index } => value.get(*index),
        _ => None,
    })
}

fn value_at_mut<'a>(root: &'a mut Value, segments: &[&Segment]) -> Option<&'a mut Value> {
    segments.iter().try_fold(root, |value, segment| match segment {
        Segment::Map { key } => value.get_mut(key.as_str()),
        Segment::Seq { index } => value.get_mut(*index),
        _ => None,
    })
}

fn replace_at(root: &mut Value, segments: &[&Segment], value: Value) -> Option<()> {
    value_at_mut(root, segments).map(|slot| *slot = value)
}

/// Restore the nearest enclosing value the original held
fn restore_ancestor(target: &mut Value, original: &Value, segments: &[&Segment]) -> Option<()> {
    (1..segments.len()).rev().find_map(|len| {
        let prior = value_at(original, &segments[..len])?.clone();
        replace_at(target, &segments[..len], prior)
    })
}

fn remove_at(root: &mut Value, segments: &[&Segment]) -> Option<()> {
    let (last, parent) = segments.split_last()?;
    let Segment::Map { key } = last else {
        return None;
    };
    value_at_mut(root, parent)?
        .as_object_mut()?
        .remove(key.as_str())
        .map(|_| ())
}
