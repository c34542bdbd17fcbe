//! Composite scoring
//!
//! Turns the per-dimension results of one run into a single
//! `CompositeReport`.
//!
//! # Scoring Formula
//!
//! ```text
//! Overall Score = Σ score(d) / |U|     for d in U
//!
//! Where:
//!   U = dimensions whose status is not `error`
//!   |U| = 0  →  Overall Score = 0, rating poor
//!   Rating: excellent ≥ 90, good ≥ 70, fair ≥ 50, else poor
//! ```
//!
//! Dimensions are unweighted. A failed dimension is excluded from the mean
//! rather than counted as zero, so one unreachable data source does not
//! drag the overall score down.
//!
//! # Recommendations
//!
//! Merged in dimension priority order (content, technical, links,
//! keywords, mobile, performance, ads, search console, analytics),
//! deduplicated by exact text keeping the first occurrence, then capped
//! (10 by default).
//!
//! # Example
//!
//! content 41.0 (ok), mobile 80.0 (ok), performance timed out (error):
//!
//! Overall = (41.0 + 80.0) / 2 = 60.5 → fair, dimension_count_used = 2

mod aggregator;
mod assembler;
mod recommendations;

pub use aggregator::{aggregate, explain, Aggregate};
pub use assembler::{assemble, assemble_at};
pub use recommendations::{merge, merge_with, MergeOptions, MergeOrder, DEFAULT_RECOMMENDATION_CAP};
