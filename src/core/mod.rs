//! Core domain types and abstractions

pub mod address;
pub mod balance;
pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use address::AddressType;
pub use balance::{BalanceProvider, BalanceRecord, Holdings};
pub use clock::{Clock, SystemClock};
pub use error::LookupError;
pub use price::PriceProvider;
