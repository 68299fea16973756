use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub chain_name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: Option<String>,
    pub explorer_api_key: String,
    pub contract_address: String,
    pub start_block: Option<u64>,
    pub end_block: Option<u64>,
    pub block_count: Option<u64>,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Ethereum,
    Polygon,
}

impl Chain {
    pub fn from_chain_id(chain_id: u64) -> Result<Self> {
        match chain_id {
            1 => Ok(Self::Ethereum),
            137 => Ok(Self::Polygon),
            _ => Err(anyhow::anyhow!("Unsupported chain id: {}", chain_id)),
        }
    }

    /// Default Etherscan-style explorer endpoint for the chain. Overridable
    /// through `Config::explorer_url`.
    pub fn default_explorer_url(&self) -> &'static str {
        match self {
            Self::Ethereum => "https://api.etherscan.io/api",
            Self::Polygon => "https://api.polygonscan.com/api",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_from_chain_id() {
        assert_eq!(Chain::from_chain_id(1).unwrap(), Chain::Ethereum);
        assert_eq!(Chain::from_chain_id(137).unwrap(), Chain::Polygon);
        assert!(Chain::from_chain_id(324).is_err());
    }
}
