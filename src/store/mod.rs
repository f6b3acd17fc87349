//! Process-lifetime caches for balances and prices

pub mod balance;
pub mod memory;
pub mod price;

pub use balance::{BALANCE_TTL, BalanceCache, MAX_CACHE_SIZE};
pub use memory::MemoryCache;
pub use price::{PRICE_TTL, PriceCache};
