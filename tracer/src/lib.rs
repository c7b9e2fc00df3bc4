//! Provenance tracer for colored coins.
//!
//! Follows a colored unit of value from a designated root output, through
//! successive spending transactions, to the current set of unspent holder
//! outputs:
//!
//! - [`color::assign_colors`] — order-based assignment of a transaction's
//!   outputs to its input buckets;
//! - [`spend::find_spending_tx`] — locate the transaction consuming an
//!   outpoint, if any;
//! - [`relevance::relevant_outputs`] — which outputs of a spending
//!   transaction inherit the tracked color, with lost-track recovery;
//! - [`trace::Tracer`] — the walk itself.
//!
//! The coloring is a heuristic, not ledger-enforced: transactions with
//! multiple inputs make the flow ambiguous by construction, and the
//! lost-track merge is a best-effort repair. [`trace::TraceReport`] surfaces
//! any branches that stayed lost.

pub mod color;
pub mod error;
pub mod lost_track;
pub mod relevance;
pub mod spend;
pub mod trace;

pub use color::assign_colors;
pub use error::TraceError;
pub use lost_track::LostTrackSet;
pub use relevance::relevant_outputs;
pub use spend::find_spending_tx;
pub use trace::{TraceReport, Tracer, DEFAULT_MAX_DEPTH};
