//! Contract metadata retrieval from Etherscan-style explorer APIs.

use std::time::Duration;

use alloy_json_abi::{Event, JsonAbi};
use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

/// Outcome of an ABI lookup. A contract with no published ABI is a valid,
/// expected result, not an error: the pipeline degrades every log to the
/// fallback mapping.
#[derive(Debug, Clone)]
pub enum AbiResolution {
    Resolved(Vec<Event>),
    Unavailable(String),
}

impl AbiResolution {
    /// Known event definitions; empty when the ABI is unavailable.
    pub fn event_definitions(&self) -> &[Event] {
        match self {
            Self::Resolved(events) => events,
            Self::Unavailable(_) => &[],
        }
    }
}

/// Explorer `getabi` response envelope: `status == "1"` means `result` holds
/// the ABI JSON string.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    result: String,
}

/// Client for one Etherscan-compatible explorer endpoint.
pub struct AbiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AbiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the contract's event definitions. One outbound call; every
    /// negative outcome (unverified contract, HTTP failure, rate limit,
    /// unparsable ABI) maps to `AbiResolution::Unavailable`.
    pub async fn fetch_event_definitions(&self, address: Address) -> AbiResolution {
        let address = address.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("ABI fetch failed: {e}");
                return AbiResolution::Unavailable(format!("explorer request failed: {e}"));
            }
        };

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("ABI fetch rate limited by explorer");
            return AbiResolution::Unavailable("rate limited by explorer".into());
        }

        match response.json::<ExplorerResponse>().await {
            Ok(body) => parse_abi_response(body),
            Err(e) => {
                warn!("Malformed explorer response: {e}");
                AbiResolution::Unavailable(format!("malformed explorer response: {e}"))
            }
        }
    }
}

fn parse_abi_response(body: ExplorerResponse) -> AbiResolution {
    if body.status != "1" {
        return AbiResolution::Unavailable(format!("no ABI available: {}", body.message));
    }
    match serde_json::from_str::<JsonAbi>(&body.result) {
        Ok(abi) => {
            let events: Vec<Event> = abi.events().cloned().collect();
            info!("Resolved ABI with {} event definitions", events.len());
            AbiResolution::Resolved(events)
        }
        Err(e) => AbiResolution::Unavailable(format!("invalid ABI JSON: {e}")),
    }
}
