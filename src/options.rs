//! Construction options for [`crate::BloomFilter`] and
//! [`crate::ScalableBloomFilter`] (spec §6).
//!
//! Rather than a single mutable global default (the "global mutable
//! defaults" pattern flagged for redesign in spec §9), this module exposes
//! named constants and a `Default` impl; callers that want non-default
//! values construct a `FilterOptions` explicitly.

use std::path::PathBuf;
use std::sync::Arc;

use crate::store::Store;

/// Factor by which a [`crate::ScalableBloomFilter`]'s capacity grows with
/// each new generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthRate {
    /// Expect the set to grow slowly; tighter capacity steps.
    Small = 2,
    /// Expect the set to grow quickly; coarser capacity steps.
    Large = 4,
}

impl GrowthRate {
    pub(crate) fn factor(self) -> f64 {
        match self {
            GrowthRate::Small => 2.0,
            GrowthRate::Large => 4.0,
        }
    }
}

impl Default for GrowthRate {
    fn default() -> Self {
        GrowthRate::Small
    }
}

/// Default path used when [`FilterOptions::path`] is left empty.
pub const DEFAULT_PATH: &str = "bloom.db";
/// Default target false-positive rate.
pub const DEFAULT_ERR_RATE: f64 = 0.001;
/// Default capacity of the first generation.
pub const DEFAULT_CAPACITY: u64 = 100_000;
/// Default growth rate for scalable filters.
pub const DEFAULT_GROWTH_RATE: GrowthRate = GrowthRate::Small;
/// Per-generation tightening factor applied to the error rate of a scalable
/// filter (spec §3, §4.5).
pub const RATIO: f64 = 0.9;

/// Construction options for a filter.
#[derive(Clone)]
pub struct FilterOptions {
    /// Path to the backing file. Defaults to [`DEFAULT_PATH`] if empty.
    pub path: PathBuf,
    /// Target false-positive probability, in `(0, 1)`.
    pub err_rate: f64,
    /// Number of items the (first generation of the) filter is sized for.
    pub capacity: u64,
    /// An optional attached key→value store for `Put`/`Get`.
    pub database: Option<Arc<dyn Store>>,
    /// Growth rate for a [`crate::ScalableBloomFilter`]; ignored by a
    /// standalone [`crate::BloomFilter`].
    pub growth_rate: GrowthRate,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            err_rate: DEFAULT_ERR_RATE,
            capacity: DEFAULT_CAPACITY,
            database: None,
            growth_rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn err_rate(mut self, err_rate: f64) -> Self {
        self.err_rate = err_rate;
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn database(mut self, database: Arc<dyn Store>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn growth_rate(mut self, growth_rate: GrowthRate) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    pub(crate) fn resolved_path(&self) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_PATH)
        } else {
            self.path.clone()
        }
    }
}
