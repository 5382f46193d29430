pub mod session;

pub use session::is_trading_day;
