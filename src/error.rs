use crate::bet::BetId;
use std::fmt;

pub type Result<T, E = LotteryError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum LotteryError {
    /// A stored snapshot exists but does not hold the expected structure.
    StorageRead { key: String, reason: String },
    /// The durable write of a snapshot failed.
    StorageWrite { key: String, reason: String },
    /// More unique numbers were requested than the range holds.
    InvalidRange { count: usize, min: u8, max: u8 },
    /// The number does not belong to the bet it was toggled on.
    ForeignNumber { bet: BetId, number: u8 },
    UnknownBet(BetId),
}

impl fmt::Display for LotteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotteryError::StorageRead { key, reason } => {
                write!(f, "Failed to read stored history '{key}': {reason}")
            }
            LotteryError::StorageWrite { key, reason } => {
                write!(f, "Failed to save history '{key}': {reason}")
            }
            LotteryError::InvalidRange { count, min, max } => write!(
                f,
                "Cannot draw {count} unique numbers from the range {min}..={max}"
            ),
            LotteryError::ForeignNumber { bet, number } => {
                write!(f, "Number {number} is not part of bet #{bet}")
            }
            LotteryError::UnknownBet(id) => write!(f, "No bet with id #{id}"),
        }
    }
}

impl std::error::Error for LotteryError {}
