//! Thin provider wrappers for the log and block queries the pipeline needs.

use alloy_eips::BlockNumberOrTag;
use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::errors::RetrievalError;
use crate::models::logs::RawLogEntry;

/// Inclusive block range; `to = None` is the "current tip" sentinel.
#[derive(Debug, Clone, Copy)]
pub struct BlockRange {
    pub from: u64,
    pub to: Option<u64>,
}

impl BlockRange {
    /// The last `count` blocks up to the tip.
    pub fn last_blocks(tip: u64, count: u64) -> Self {
        Self {
            from: tip.saturating_sub(count),
            to: None,
        }
    }

    /// Resolve the tip sentinel and validate ordering.
    pub fn resolve(self, tip: u64) -> Result<(u64, u64), RetrievalError> {
        let to = self.to.unwrap_or(tip);
        if self.from > to {
            return Err(RetrievalError::InvalidRange {
                from: self.from,
                to,
            });
        }
        Ok((self.from, to))
    }
}

pub async fn get_latest_block_number<P>(provider: &P) -> Result<u64, RetrievalError>
where
    P: Provider<AnyNetwork>,
{
    let number = provider.get_block_number().await?;
    debug!("Latest block number: {number}");
    Ok(number)
}

/// Fetch every log the contract emitted in the range, in discovery order.
/// No topic filter: the decoder, not the node, decides what each log means.
pub async fn get_logs<P>(
    provider: &P,
    address: Address,
    from: u64,
    to: u64,
) -> Result<Vec<RawLogEntry>, RetrievalError>
where
    P: Provider<AnyNetwork>,
{
    let filter = Filter::new().address(address).from_block(from).to_block(to);
    let logs = provider.get_logs(&filter).await?;
    debug!(
        "Retrieved {} logs for {address} in blocks {from}..={to}",
        logs.len()
    );
    logs.into_iter().map(parse_log).collect()
}

fn parse_log(log: Log) -> Result<RawLogEntry, RetrievalError> {
    let block_number = log
        .block_number
        .ok_or_else(|| RetrievalError::MissingField {
            field: "blockNumber".into(),
        })?;
    Ok(RawLogEntry {
        address: log.inner.address,
        topics: log.inner.data.topics().to_vec(),
        data: log.inner.data.data.clone(),
        block_number,
    })
}

/// Resolve a block number to its timestamp (epoch seconds).
pub async fn get_block_timestamp<P>(
    provider: &P,
    number: u64,
) -> Result<DateTime<Utc>, RetrievalError>
where
    P: Provider<AnyNetwork>,
{
    let block = provider
        .get_block_by_number(BlockNumberOrTag::Number(number))
        .await?
        .ok_or(RetrievalError::MissingBlock { number })?;
    let timestamp = block.header.timestamp;
    DateTime::from_timestamp(timestamp as i64, 0)
        .ok_or(RetrievalError::InvalidTimestamp { number, timestamp })
}
