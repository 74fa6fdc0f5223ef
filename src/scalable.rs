//! The scalable Bloom filter: an ordered sequence of [`Filter`] generations
//! sharing one mapped backing file (spec §4.5).
//!
//! Only the last ("active") generation accepts inserts; earlier generations
//! are read-only and are addressed through the same shared mapping via
//! their own `page_offset`. Growth unmaps, extends, and remaps the whole
//! file rather than the filter's region alone — see [`crate::MappedFile`].
//!
//! Like [`crate::BloomFilter`], this type relies on `&mut self`/`&self` for
//! single-writer exclusivity rather than an internal mutex. A caller
//! sharing one across threads should hold it behind `Arc<RwLock<_>>` — a
//! `RwLock` rather than a plain `Mutex` because `Contains`/`Get` only need
//! read access to the generation list, while only `Add`/`Clear` mutate it
//! (spec §5's "scalable-level read-write lock around Clear").

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter::{Filter, Stats};
use crate::mapped_file::MappedFile;
use crate::options::{FilterOptions, GrowthRate, RATIO};
use crate::store::Store;

pub struct ScalableBloomFilter {
    mapped: MappedFile,
    filters: Vec<Filter>,
    err_rate0: f64,
    capacity0: u64,
    growth_rate: GrowthRate,
    ratio: f64,
    /// `m` of the first generation; the growth anchor for later capacities.
    m0: u64,
    store: Option<Arc<dyn Store>>,
}

impl ScalableBloomFilter {
    /// Create a scalable filter with a single initial generation sized per
    /// `opts`.
    pub fn new(opts: FilterOptions) -> Result<Self> {
        let path = opts.resolved_path();
        let mut mapped = MappedFile::open(&path)?;

        let page_offset = mapped.len();
        let filter = Filter::new(opts.err_rate, opts.capacity, page_offset)?;
        mapped.extend(filter.byte_width())?;
        let m0 = filter.m;

        info!(
            path = %path.display(),
            err_rate = opts.err_rate,
            capacity = opts.capacity,
            "created scalable bloom filter"
        );

        Ok(Self {
            mapped,
            filters: vec![filter],
            err_rate0: opts.err_rate,
            capacity0: opts.capacity,
            growth_rate: opts.growth_rate,
            ratio: RATIO,
            m0,
            store: opts.database,
        })
    }

    fn active(&self) -> &Filter {
        self.filters.last().expect("filters is never empty")
    }

    /// Number of generations created so far (1 plus the number of growths).
    pub fn generations(&self) -> usize {
        self.filters.len()
    }

    /// Insert `key` into the active generation, growing first if it is
    /// already at capacity.
    pub fn add(&mut self, key: &[u8]) -> Result<()> {
        if self.active().is_full() {
            self.grow()?;
        }
        let mem = self.mapped.mem_mut();
        self.filters
            .last_mut()
            .expect("filters is never empty")
            .add(mem, key)
    }

    /// Insert `key` and store `value` against it in the attached store.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let store = self.store.as_ref().ok_or(Error::NoStore)?.clone();
        self.add(key)?;
        store.put(key, value).map_err(Error::Store)
    }

    /// Test whether `key` may be a member of any generation. Terminates on
    /// the first generation that reports a hit.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        let mem = self.mapped.mem();
        for filter in &self.filters {
            if filter.contains(mem, key)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fetch `key` from the attached store, scanning generations oldest to
    /// newest and delegating to the store on the first hit.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let store = self.store.as_ref().ok_or(Error::NoStore)?;
        let mem = self.mapped.mem();
        for filter in &self.filters {
            if filter.contains(mem, key)? {
                return store.get(key).map_err(Error::Store);
            }
        }
        Ok(None)
    }

    /// Append a new generation: unmap, extend the file by the new
    /// generation's `byte_width`, remap, and push it onto `filters`. The
    /// new generation becomes active.
    fn grow(&mut self) -> Result<()> {
        // `gen_index` is this new generation's 0-based position once
        // pushed — equivalently, `filters.len()` *before* the push.
        let gen_index = self.filters.len();

        let err_rate = self.err_rate0 * self.ratio.powi(gen_index as i32);
        let capacity = self.new_capacity(gen_index);

        let page_offset = self.mapped.len();
        let new_filter = Filter::new(err_rate, capacity, page_offset)?;
        self.mapped.extend(new_filter.byte_width())?;

        debug!(
            path = %self.mapped.path().display(),
            generation = gen_index,
            err_rate,
            capacity,
            "grew scalable bloom filter"
        );

        self.filters.push(new_filter);
        Ok(())
    }

    /// `capacity_i = floor(m0 * growth_rate^(i-1) * ln 2)` — the "observed
    /// source formula" from spec §4.5 / §9, picked over the canonical
    /// Almeida exponent and documented in DESIGN.md.
    fn new_capacity(&self, gen_index: usize) -> u64 {
        let exp = (gen_index as f64) - 1.0;
        let capacity = (self.m0 as f64) * self.growth_rate.factor().powf(exp) * std::f64::consts::LN_2;
        capacity.floor() as u64
    }

    /// Total capacity across every generation. Non-decreasing across Adds
    /// (spec invariant 8): every growth only appends a generation, never
    /// removes one.
    pub fn capacity(&self) -> u64 {
        self.filters.iter().map(Filter::capacity).sum()
    }

    /// Total items inserted across every generation.
    pub fn count(&self) -> u64 {
        self.filters.iter().map(Filter::count).sum()
    }

    /// Effective false-positive probability: `1 - prod(1 - err_rate_i)`
    /// over every generation.
    fn prob(&self) -> f64 {
        let retained = self.filters.iter().fold(1.0, |acc, f| acc * (1.0 - f.err_rate));
        1.0 - retained
    }

    pub fn stats(&self) -> Stats {
        let active = self.active();
        Stats {
            capacity: self.capacity(),
            count: self.count(),
            size: active.byte_width(),
            m: active.m,
            k: active.k,
            prob: self.prob(),
        }
    }

    /// Close the active generation, discard every generation, and
    /// reconstruct a single fresh one at offset zero, truncating the file
    /// to its size.
    pub fn clear(&mut self) -> Result<()> {
        self.mapped.truncate_to(0)?;
        let filter = Filter::new(self.err_rate0, self.capacity0, 0)?;
        self.mapped.extend(filter.byte_width())?;
        self.filters = vec![filter];
        Ok(())
    }

    /// Flush and unmap the active generation, close the file, and release
    /// the advisory lock.
    pub fn close(&mut self) -> Result<()> {
        self.mapped.close()
    }
}
