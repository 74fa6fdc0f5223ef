//! The standalone fixed-capacity Bloom filter (spec §4.4).
//!
//! `BloomFilter` owns its backing file outright: one generation, one
//! mapping, `page_offset == 0`. [`crate::ScalableBloomFilter`] is built from
//! the same [`crate::Filter`] addressing logic but shares a single mapping
//! across many generations instead.
//!
//! This type is not internally synchronized. The scheduling model in
//! `SPEC_FULL.md` §5 calls for a single writer serialized by a mutex around
//! `Add`/`Merge`/`Clear`; in Rust that's the borrow checker's job — `&mut
//! self` already gives single-writer exclusivity for a single owner, and a
//! caller sharing a filter across threads should wrap it in
//! `Mutex<BloomFilter>` (or hold it behind an `Arc<Mutex<_>>`) rather than
//! rely on internal locking here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::filter::{Filter, Stats};
use crate::mapped_file::MappedFile;
use crate::options::FilterOptions;
use crate::store::Store;

pub struct BloomFilter {
    mapped: MappedFile,
    filter: Filter,
    store: Option<Arc<dyn Store>>,
}

impl BloomFilter {
    /// Create a new fixed-capacity filter per `opts`, opening (and
    /// truncating to size) its backing file and acquiring the advisory
    /// lock on it.
    pub fn new(opts: FilterOptions) -> Result<Self> {
        let path = opts.resolved_path();
        let mut mapped = MappedFile::open(&path)?;

        let page_offset = mapped.len();
        let filter = Filter::new(opts.err_rate, opts.capacity, page_offset)?;
        mapped.extend(filter.byte_width())?;

        info!(
            path = %path.display(),
            k = filter.k,
            m = filter.m,
            capacity = opts.capacity,
            "created fixed bloom filter"
        );

        Ok(Self {
            mapped,
            filter,
            store: opts.database,
        })
    }

    /// Insert `key`. Fails with [`Error::CapacityExceeded`] once `count`
    /// reaches `capacity` — fatal for a fixed filter.
    pub fn add(&mut self, key: &[u8]) -> Result<()> {
        self.filter.add(self.mapped.mem_mut(), key)
    }

    /// Test whether `key` may be a member.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        self.filter.contains(self.mapped.mem(), key)
    }

    /// Insert `key` and store `value` against it in the attached store.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let store = self.store.as_ref().ok_or(Error::NoStore)?.clone();
        self.add(key)?;
        store.put(key, value).map_err(Error::Store)
    }

    /// Fetch `key` from the attached store if the filter reports it may be
    /// present. A cache miss here is the expected Bloom false-positive
    /// case, not an error.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let store = self.store.as_ref().ok_or(Error::NoStore)?;
        if !self.contains(key)? {
            return Ok(None);
        }
        store.get(key).map_err(Error::Store)
    }

    /// OR `other`'s bits into this filter. Both must share `k` and
    /// `byte_width`. `count` is left unchanged.
    pub fn merge(&mut self, other: &BloomFilter) -> Result<()> {
        self.filter
            .merge(self.mapped.mem_mut(), &other.filter, other.mapped.mem())?;
        warn!(path = %self.mapped.path().display(), "merge increases the effective false-positive rate");
        Ok(())
    }

    /// Zero every bit and reset `count` to zero.
    pub fn clear(&mut self) -> Result<()> {
        self.filter.clear(self.mapped.mem_mut());
        self.mapped.flush()
    }

    pub fn stats(&self) -> Stats {
        self.filter.stats()
    }

    pub fn count(&self) -> u64 {
        self.filter.count()
    }

    pub fn capacity(&self) -> u64 {
        self.filter.capacity()
    }

    /// Flush the mapped region, unmap it, close the file, and release the
    /// advisory lock.
    pub fn close(&mut self) -> Result<()> {
        self.mapped.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn opts(dir: &std::path::Path) -> FilterOptions {
        FilterOptions::new()
            .path(dir.join("bloom.db"))
            .err_rate(0.01)
            .capacity(1000)
    }

    #[test]
    fn s1_basic_add_contains() {
        let dir = tempfile::tempdir().unwrap();
        let mut bf = BloomFilter::new(opts(dir.path())).unwrap();
        bf.add(b"foo").unwrap();
        assert!(bf.contains(b"foo").unwrap());
        assert!(!bf.contains(b"bar").unwrap());
        assert_eq!(bf.count(), 1);
    }

    #[test]
    fn s2_capacity_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let mut bf = BloomFilter::new(opts(dir.path())).unwrap();
        for i in 0u32..1000 {
            bf.add(&i.to_le_bytes()).unwrap();
        }
        let err = bf.add(&1000u32.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { .. }));
    }

    #[test]
    fn s4_merge() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = BloomFilter::new(opts(dir.path()).path(dir.path().join("a.db"))).unwrap();
        let mut b = BloomFilter::new(opts(dir.path()).path(dir.path().join("b.db"))).unwrap();

        b.add(b"foo").unwrap();
        a.merge(&b).unwrap();
        assert!(a.contains(b"foo").unwrap());

        let mut mismatched =
            BloomFilter::new(opts(dir.path()).path(dir.path().join("c.db")).capacity(2000)).unwrap();
        let err = a.merge(&mismatched).unwrap_err();
        assert!(matches!(err, Error::Mismatch { .. }));
        mismatched.close().unwrap();
    }

    #[test]
    fn s5_clear_then_readd() {
        let dir = tempfile::tempdir().unwrap();
        let mut bf = BloomFilter::new(opts(dir.path()).capacity(1000)).unwrap();
        let keys: Vec<Vec<u8>> = (0u32..500).map(|i| i.to_le_bytes().to_vec()).collect();
        for k in &keys {
            bf.add(k).unwrap();
        }
        bf.clear().unwrap();
        for k in &keys {
            assert!(!bf.contains(k).unwrap());
        }
        assert_eq!(bf.count(), 0);
        for k in &keys {
            bf.add(k).unwrap();
        }
        for k in &keys {
            assert!(bf.contains(k).unwrap());
        }
    }

    #[test]
    fn put_and_get_via_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryStore::new());
        let mut bf = BloomFilter::new(opts(dir.path()).database(store)).unwrap();

        bf.put(b"foo", b"bar").unwrap();
        assert_eq!(bf.get(b"foo").unwrap(), Some(b"bar".to_vec()));
        assert_eq!(bf.get(b"never-added").unwrap(), None);
    }

    #[test]
    fn put_without_store_is_no_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut bf = BloomFilter::new(opts(dir.path())).unwrap();
        let err = bf.put(b"foo", b"bar").unwrap_err();
        assert!(matches!(err, Error::NoStore));
    }
}
