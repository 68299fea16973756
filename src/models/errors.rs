use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Invalid block range: from_block {from} is past the resolved to_block {to}")]
    InvalidRange { from: u64, to: u64 },
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_transport::TransportError),
    #[error("Provider returned no block for number {number}")]
    MissingBlock { number: u64 },
    #[error("Block {number} carries an unrepresentable timestamp: {timestamp}")]
    InvalidTimestamp { number: u64, timestamp: u64 },
    #[error("Log is missing required field: {field}")]
    MissingField { field: String },
}

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("No events found for the given contract and block range; nothing to discover")]
    EmptyLog,
}
