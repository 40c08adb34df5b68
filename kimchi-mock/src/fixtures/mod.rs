pub mod prices;
pub mod signal;
pub mod wallet;
