pub mod app;
pub mod bet;
pub mod error;
pub mod filter;
pub mod game;
pub mod hits;
pub mod sampler;
pub mod storage;
pub mod store;

pub use app::{Action, AppSnapshot, AppState, BetRow};
pub use bet::{Bet, BetId};
pub use error::LotteryError;
pub use filter::GameFilter;
pub use game::GameType;
