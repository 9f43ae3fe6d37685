pub mod aggregate;
pub mod balance;
pub mod reports;

pub use aggregate::{BalanceSource, ChainResult, MultiChainReport, analyze, analyze_wallet};
pub use balance::{NativeBalance, fetch_native_balance};
