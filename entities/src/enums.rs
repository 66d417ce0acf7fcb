use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the mint flow of a single drop page.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MintPhase {
    Disconnected,
    Loading,
    Idle,
    Minting,
    Success,
    Failed,
    SoldOut,
}

impl MintPhase {
    /// Whether the mint action may be triggered from this phase.
    pub fn is_mint_enabled(&self) -> bool {
        matches!(self, MintPhase::Idle | MintPhase::Success | MintPhase::Failed)
    }
}

impl fmt::Display for MintPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MintPhase::Disconnected => write!(f, "disconnected"),
            MintPhase::Loading => write!(f, "loading"),
            MintPhase::Idle => write!(f, "idle"),
            MintPhase::Minting => write!(f, "minting"),
            MintPhase::Success => write!(f, "success"),
            MintPhase::Failed => write!(f, "failed"),
            MintPhase::SoldOut => write!(f, "sold_out"),
        }
    }
}

/// Load state of one of the two independent drop status reads.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

/// Internal classification of a failed claim. Users always see the same
/// generic message, this is for logs and metrics.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MintFailureKind {
    UserRejected,
    InsufficientFunds,
    Reverted,
    Network,
    Other,
}

impl fmt::Display for MintFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MintFailureKind::UserRejected => write!(f, "user_rejected"),
            MintFailureKind::InsufficientFunds => write!(f, "insufficient_funds"),
            MintFailureKind::Reverted => write!(f, "reverted"),
            MintFailureKind::Network => write!(f, "network"),
            MintFailureKind::Other => write!(f, "other"),
        }
    }
}
