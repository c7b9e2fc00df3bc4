//! Ledger Reader boundary for coinpaint.
//!
//! Everything above this crate depends only on the [`LedgerReader`] trait.
//! Two real data sources implement it — a trusted bitcoind node
//! ([`NodeReader`]) and a public Esplora-style explorer ([`ExplorerReader`])
//! — and two combinators compose them: [`FallbackReader`] falls through from
//! primary to secondary transparently, and [`CachedReader`] memoizes lookups
//! for the lifetime of one trace run.
//!
//! Floating-point amounts exist only inside this crate: every value crossing
//! the boundary is converted to integer satoshis.

pub mod cache;
pub mod error;
pub mod explorer;
pub mod fallback;
pub mod node;
pub mod reader;

pub use cache::CachedReader;
pub use error::ReaderError;
pub use explorer::ExplorerReader;
pub use fallback::FallbackReader;
pub use node::{NodeReader, NodeRpc};
pub use reader::LedgerReader;
