//! The analysis pipeline: fetch ABI, retrieve logs, decode, map, mine.
//!
//! One run processes one block range for one contract from start to finish,
//! strictly sequentially. All pipeline state lives in this call; nothing is
//! shared across runs.

pub mod decode;
pub mod mapping;
pub mod rpc;

use std::collections::HashMap;

use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::Provider;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::metadata::{AbiClient, AbiResolution};
use crate::mining::{self, DiscoveryEngine, ProcessModel};
use crate::models::records::EventLogTable;
use crate::pipeline::rpc::BlockRange;

/// Outcome of one analysis run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub from_block: u64,
    pub to_block: u64,
    pub log_count: usize,
    pub abi_resolved: bool,
    pub model: ProcessModel,
}

pub async fn run_analysis<P, E>(
    provider: &P,
    abi_client: &AbiClient,
    engine: &E,
    contract_address: Address,
    range: BlockRange,
) -> Result<AnalysisReport>
where
    P: Provider<AnyNetwork>,
    E: DiscoveryEngine,
{
    // Resolve the block range against the current tip.
    let tip = rpc::get_latest_block_number(provider)
        .await
        .context("failed to resolve chain tip")?;
    let (from_block, to_block) = range.resolve(tip)?;
    info!("Analyzing {contract_address} over blocks {from_block}..={to_block}");

    // An unavailable ABI is not fatal: every log degrades to the fallback
    // mapping.
    let resolution = abi_client.fetch_event_definitions(contract_address).await;
    if let AbiResolution::Unavailable(reason) = &resolution {
        warn!("Proceeding without event definitions: {reason}");
    }
    let definitions = resolution.event_definitions();

    let logs = rpc::get_logs(provider, contract_address, from_block, to_block)
        .await
        .context("failed to retrieve logs")?;
    info!("Retrieved {} logs", logs.len());

    // Decode and map each log. Block timestamps are immutable, so lookups
    // are memoized within the run.
    let mut block_times: HashMap<u64, DateTime<Utc>> = HashMap::new();
    let mut table = EventLogTable::new();
    for log in &logs {
        let block_time = match block_times.get(&log.block_number) {
            Some(time) => *time,
            None => {
                let time = rpc::get_block_timestamp(provider, log.block_number)
                    .await
                    .context("failed to resolve block timestamp")?;
                block_times.insert(log.block_number, time);
                time
            }
        };
        let decoded = decode::decode_log(log, definitions);
        table.push(mapping::map_log(
            log,
            decoded.as_ref(),
            contract_address,
            block_time,
        ));
    }

    let model = mining::discover(&table, engine)?;

    Ok(AnalysisReport {
        from_block,
        to_block,
        log_count: logs.len(),
        abi_resolved: matches!(resolution, AbiResolution::Resolved(_)),
        model,
    })
}
