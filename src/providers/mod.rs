pub mod coingecko;
pub mod explorers;
pub mod util;

pub use coingecko::CoinGeckoProvider;
pub use explorers::ExplorerBalanceProvider;
