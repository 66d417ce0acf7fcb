use entities::enums::MintFailureKind;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContentStoreError {
    #[error("Content store request failed: {0}")]
    Request(String),
    #[error("Content store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Cannot decode content store response: {0}")]
    Decode(String),
    #[error("Invalid content store configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ContentStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContentStoreError::Decode(err.to_string())
        } else {
            ContentStoreError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentStoreError {
    fn from(err: serde_json::Error) -> Self {
        ContentStoreError::Decode(err.to_string())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ImageUrlError {
    #[error("Image has no asset reference")]
    MissingAsset,
    #[error("Malformed image asset reference: {0}")]
    MalformedReference(String),
    #[error("Invalid image base url: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum DropContractError {
    #[error("Transaction rejected by the wallet: {0}")]
    UserRejected(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Transaction reverted: {0}")]
    Reverted(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timed out waiting for transaction {0}")]
    Timeout(String),
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),
}

impl DropContractError {
    pub fn failure_kind(&self) -> MintFailureKind {
        match self {
            DropContractError::UserRejected(_) => MintFailureKind::UserRejected,
            DropContractError::InsufficientFunds(_) => MintFailureKind::InsufficientFunds,
            DropContractError::Reverted(_) => MintFailureKind::Reverted,
            DropContractError::Network(_) | DropContractError::Timeout(_) => {
                MintFailureKind::Network
            },
            DropContractError::InvalidResponse(_) | DropContractError::InvalidAddress(_) => {
                MintFailureKind::Other
            },
        }
    }

    /// Maps a gateway or node error message onto a variant.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowercase = message.to_lowercase();
        if lowercase.contains("user rejected")
            || lowercase.contains("user denied")
            || lowercase.contains("cancelled")
        {
            DropContractError::UserRejected(message)
        } else if lowercase.contains("insufficient funds") {
            DropContractError::InsufficientFunds(message)
        } else if lowercase.contains("revert") || lowercase.contains("execution failed") {
            DropContractError::Reverted(message)
        } else {
            DropContractError::InvalidResponse(message)
        }
    }
}

impl From<reqwest::Error> for DropContractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DropContractError::InvalidResponse(err.to_string())
        } else {
            DropContractError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WalletError {
    #[error("No wallet is configured")]
    NotConfigured,
    #[error("Wallet {0} is not available")]
    NotFound(String),
    #[error("Wallet connection rejected: {0}")]
    Rejected(String),
    #[error("Wallet network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        WalletError::Network(err.to_string())
    }
}
