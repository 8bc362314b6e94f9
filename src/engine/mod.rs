//! The shipment aggregation engine: pure, synchronous functions over an
//! already-materialized snapshot of normalized records. Nothing in this
//! module performs I/O, caches results, or holds state between calls;
//! every view is recomputed fresh from the snapshot it is given.

pub mod distribution;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod sort;

pub use distribution::{build_distribution, top_n, DistributionBucket};
pub use export::{flatten, FlatRecord};
pub use filter::{matches, FilterQuery};
pub use normalize::normalize;
pub use report::{status_distribution, summarize, top_destinations, ReportSummary};
pub use sort::{compare, sort_records, SortKey};
