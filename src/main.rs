use alloy_network::AnyNetwork;
use alloy_primitives::Address;
use alloy_provider::ProviderBuilder;
use anyhow::{Result, anyhow};
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use chain_process_mining::metadata::AbiClient;
use chain_process_mining::mining::{AlphaMinerEngine, dot};
use chain_process_mining::models::common::Chain;
use chain_process_mining::pipeline::{self, rpc::BlockRange};
use chain_process_mining::utils::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!();
    info!("=========================== INITIALIZING ===========================");

    // Load config
    let config = match load_config("config.yml") {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow!(e));
        }
    };

    let chain = Chain::from_chain_id(config.chain_id)?;
    info!("Chain: {} (id {})", config.chain_name, config.chain_id);

    let contract_address: Address = config
        .contract_address
        .parse()
        .map_err(|e| anyhow!("Invalid contract address {}: {e}", config.contract_address))?;

    let explorer_url = config
        .explorer_url
        .clone()
        .unwrap_or_else(|| chain.default_explorer_url().to_string());
    let abi_client = AbiClient::new(explorer_url, config.explorer_api_key.clone())?;

    // Create RPC provider
    let rpc_url: Url = config.rpc_url.parse()?;
    info!("RPC URL: {:?}", config.rpc_url);
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(rpc_url);

    // Resolve the requested range: explicit bounds win over tip-relative.
    let range = match (config.start_block, config.end_block, config.block_count) {
        (Some(from), to, _) => BlockRange { from, to },
        (None, _, Some(count)) => {
            let tip = pipeline::rpc::get_latest_block_number(&provider).await?;
            BlockRange::last_blocks(tip, count)
        }
        (None, _, None) => return Err(anyhow!("config must set start_block or block_count")),
    };

    println!();
    info!("========================= STARTING ANALYSIS ========================");

    let engine = AlphaMinerEngine;
    let report =
        pipeline::run_analysis(&provider, &abi_client, &engine, contract_address, range).await?;

    info!(
        "Processed {} logs from blocks {}..={}",
        report.log_count, report.from_block, report.to_block
    );
    if !report.abi_resolved {
        warn!("Contract ABI was unavailable; activities are raw topic hashes");
    }

    let dfg = &report.model.dfg;
    info!(
        "Start activities: {:?}",
        dfg.start_activities.keys().collect::<Vec<_>>()
    );
    info!(
        "End activities: {:?}",
        dfg.end_activities.keys().collect::<Vec<_>>()
    );
    for ((from, to), count) in &dfg.edges {
        info!("  {from} -> {to} ({count})");
    }
    if let Some(net) = &report.model.petri_net {
        info!(
            "Petri net: {} transitions, {} places",
            net.transitions.len(),
            net.places.len() + 2
        );
    }

    if let Some(path) = &config.output_path {
        dot::write_dfg(dfg, path)?;
        info!("DFG visualization written to {path}");
    }

    Ok(())
}
