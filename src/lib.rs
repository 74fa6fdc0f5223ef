//! `scalable-bloom` implements a persistent, memory-mapped, scalable Bloom
//! filter for probabilistic set membership over arbitrary byte-string keys.
//!
//! The filter can tell you with certainty that a key is **not** in the set
//! (no false negatives absent corruption), but may occasionally report a
//! key as present when it is not. It is designed to sit in front of a
//! durable key→value [`Store`], acting as a fast negative cache: check the
//! filter first, and only pay for a store lookup when it says "maybe".
//!
//! ## Fixed vs. scalable
//!
//! [`BloomFilter`] is a single, fixed-capacity filter: cheap, but it stops
//! accepting inserts once full. [`ScalableBloomFilter`] wraps a growing
//! sequence of fixed filters with geometrically increasing capacity and a
//! tightening per-generation error rate, so it never refuses an insert —
//! most users should reach for this one.
//!
//! ```rust,no_run
//! use scalable_bloom::{FilterOptions, ScalableBloomFilter};
//!
//! # fn main() -> Result<(), scalable_bloom::Error> {
//! let mut filter = ScalableBloomFilter::new(
//!     FilterOptions::new().path("/tmp/example.bloom").capacity(10_000),
//! )?;
//!
//! filter.add(b"hello")?;
//! assert!(filter.contains(b"hello")?);
//! assert!(!filter.contains(b"goodbye")?);
//!
//! filter.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Non-goals
//!
//! Deleting a previously-inserted key, exact (non-probabilistic)
//! membership, cryptographic hashing, multiple concurrent writer
//! processes, compression of the bit vector, and distributed replication
//! are all out of scope — see `SPEC_FULL.md` for the full rationale.

mod bloom_filter;
mod error;
mod filter;
mod filter_math;
mod hash;
mod mapped_file;
mod options;
mod page;
mod scalable;
mod store;

pub use bloom_filter::BloomFilter;
pub use error::{Error, Result};
pub use filter::Stats;
pub use mapped_file::MappedFile;
pub use options::{
    FilterOptions, GrowthRate, DEFAULT_CAPACITY, DEFAULT_ERR_RATE, DEFAULT_GROWTH_RATE, DEFAULT_PATH,
};
pub use scalable::ScalableBloomFilter;
pub use store::{InMemoryStore, Store};

// Exposed for callers building their own sizing/addressing tooling (e.g. a
// CLI reporting the bit width a given `(err_rate, capacity)` pair would
// reserve) without constructing a full filter.
pub use filter_math::{compute as filter_sizing, Sizing};
