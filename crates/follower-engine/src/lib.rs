//! Follower Engine - Batched search-and-follow orchestration.
//!
//! This crate turns a list of raw names into follow requests. Names are
//! normalized and deduplicated, partitioned into batches, and each batch
//! runs a bounded pool of term workers behind a full barrier.
//!
//! # Features
//!
//! - ASCII-alphabetic name normalization with run-wide deduplication
//! - Fixed-size batches executed strictly in order
//! - Bounded concurrency within a batch, with throttled submission
//! - Worker failures contained to the term that caused them
//! - Cooperative cancellation that still yields a partial summary
//!
//! # Example
//!
//! ```rust,ignore
//! use follower_engine::{BatchScheduler, TermWorker};
//! use tokio_util::sync::CancellationToken;
//!
//! let worker = TermWorker::new(search, follow, follow_throttle);
//! let scheduler = BatchScheduler::new(worker, 30)
//!     .with_max_workers(2)
//!     .with_submit_throttle(submit_throttle);
//!
//! let report = scheduler.run(names, &CancellationToken::new()).await;
//! report.summary.log();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod input;
pub mod normalize;
pub mod registry;
pub mod scheduler;
pub mod summary;
pub mod throttle;
pub mod worker;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use input::{parse_names, read_names, shuffle_names};
pub use normalize::{normalize, CleanedName};
pub use registry::{DeduplicationRegistry, SearchTerm};
pub use scheduler::{partition, BatchScheduler, RunContext, RunReport};
pub use summary::{OutcomeTally, RunSummary};
pub use throttle::{FixedDelay, Throttle};
pub use worker::{TermResult, TermStatus, TermWorker};
