use std::path::PathBuf;

/// Errors produced by a [`BloomFilter`](crate::BloomFilter) or
/// [`ScalableBloomFilter`](crate::ScalableBloomFilter).
///
/// Every fallible operation in this crate returns one of these kinds rather
/// than panicking — addressing overflows and I/O failures are reported to
/// the caller, who is expected to close and discard the affected filter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `err_rate` was not in `(0, 1)`, or `capacity` was at or below the
    /// minimum threshold.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Opening, truncating, mapping, flushing or unmapping the backing file
    /// failed.
    #[error("file error for {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The advisory lock on `path` is held by another filter instance.
    #[error("{path} is locked by another process")]
    FileLocked { path: PathBuf },

    /// `Add` was called on a fixed filter that has already reached
    /// `capacity`. A [`ScalableBloomFilter`](crate::ScalableBloomFilter)
    /// catches this internally and grows instead of surfacing it.
    #[error("filter has reached its capacity of {capacity}")]
    CapacityExceeded { capacity: u64 },

    /// `Put`/`Get` was called on a filter with no attached
    /// [`Store`](crate::Store).
    #[error("no store attached to this filter")]
    NoStore,

    /// `Merge` was attempted between filters with differing `k` or
    /// `byte_width`.
    #[error("cannot merge filters: k={self_k}/{other_k}, byte_width={self_width}/{other_width}")]
    Mismatch {
        self_k: u32,
        other_k: u32,
        self_width: u64,
        other_width: u64,
    },

    /// A computed `byte_offset` fell outside the filter's reserved region.
    /// This signals corruption or a sizing bug and is otherwise unreachable.
    #[error("addressing error: byte offset {offset} is out of bounds for a {byte_width}-byte filter")]
    Addressing { offset: u64, byte_width: u64 },

    /// An error surfaced from the attached [`Store`](crate::Store).
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
