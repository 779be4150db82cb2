//! Half-open bucketing of a continuous reading into a small ordered set of
//! labelled categories.
//!
//! A [`Scale`] is a list of [`Bucket`]s. Each bucket covers
//! `(previous upper, upper]`; the first bucket is unbounded below and the
//! last one is unbounded above, so every finite reading lands in exactly one
//! bucket.

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

/// One step of a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket<C> {
    /// Inclusive upper bound. `None` marks the open-ended last bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,

    /// Phrase used in the condition sentence. May be empty.
    pub phrase: String,

    /// Category handed to the icon table.
    pub category: C,
}

impl<C> Bucket<C> {
    pub fn upto(upper: f64, phrase: &str, category: C) -> Self {
        Self { upper: Some(upper), phrase: phrase.to_string(), category }
    }

    pub fn above(phrase: &str, category: C) -> Self {
        Self { upper: None, phrase: phrase.to_string(), category }
    }
}

/// A validated, ascending list of buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale<C> {
    name: String,
    buckets: Vec<Bucket<C>>,
}

impl<C> Scale<C> {
    /// Build a scale, checking that bounds strictly ascend and that only the
    /// last bucket is unbounded.
    pub fn new(name: impl Into<String>, buckets: Vec<Bucket<C>>) -> Result<Self, ScaleError> {
        let name = name.into();

        if buckets.is_empty() {
            return Err(ScaleError::Empty(name));
        }

        let last = buckets.len() - 1;
        let mut previous: Option<f64> = None;

        for (index, bucket) in buckets.iter().enumerate() {
            match bucket.upper {
                Some(upper) if !upper.is_finite() => {
                    return Err(ScaleError::NonFiniteBound { name, index });
                }
                Some(upper) => {
                    if previous.is_some_and(|p| upper <= p) {
                        return Err(ScaleError::NotAscending { name, index });
                    }
                    previous = Some(upper);
                }
                None if index != last => {
                    return Err(ScaleError::UnboundedBeforeEnd { name, index });
                }
                None => {}
            }
        }

        if buckets[last].upper.is_some() {
            return Err(ScaleError::BoundedTail(name));
        }

        Ok(Self { name, buckets })
    }

    /// Built-in presets skip validation; the feature tests re-check them.
    pub(crate) fn preset(name: &str, buckets: Vec<Bucket<C>>) -> Self {
        Self { name: name.to_string(), buckets }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buckets(&self) -> &[Bucket<C>] {
        &self.buckets
    }

    /// Bucket holding `value`: the first one whose upper bound is at least
    /// `value`. Callers reject non-finite readings before getting here.
    pub fn classify(&self, value: f64) -> &Bucket<C> {
        self.buckets
            .iter()
            .find(|b| b.upper.is_none_or(|upper| value <= upper))
            // validated: the last bucket is unbounded
            .unwrap_or(&self.buckets[self.buckets.len() - 1])
    }
}
