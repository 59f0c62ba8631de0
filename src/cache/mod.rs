//! Translation caching.
//!
//! Session lookups use an in-memory map inside the resolver; the one-shot CLI
//! commands persist translations in `SQLite` so repeated runs skip the network.

mod key;
mod sqlite;
mod translator;

pub use key::make_cache_key;
pub use sqlite::CacheManager;
pub use translator::CachedTranslator;
