//! SQLite-backed implementation of `recall_core::traits::MemoryStore`
//! (spec §4.4, §5, §6.3).

pub mod convert;
pub mod pool;
pub mod pragmas;
pub mod queries;
pub mod schema;
pub mod store;

pub use pool::ConnectionPool;
pub use store::SqliteStore;
