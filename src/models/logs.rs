use std::fmt;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, Bytes, U256};

/// One raw on-chain log entry, as returned by `eth_getLogs`. The first topic
/// (when present) is the event signature hash.
#[derive(Debug, Clone)]
pub struct RawLogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
}

/// A decoded event argument, narrowed to the scalar shapes the case-mapping
/// heuristic understands.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Address(Address),
    Uint(U256),
    Str(String),
    Bytes(Bytes),
}

impl From<DynSolValue> for DecodedValue {
    fn from(value: DynSolValue) -> Self {
        match value {
            DynSolValue::Address(address) => Self::Address(address),
            DynSolValue::Uint(value, _) => Self::Uint(value),
            DynSolValue::Int(value, _) => Self::Uint(value.into_raw()),
            DynSolValue::Bool(value) => Self::Uint(U256::from(value as u8)),
            DynSolValue::String(value) => Self::Str(value),
            DynSolValue::Bytes(value) => Self::Bytes(value.into()),
            DynSolValue::FixedBytes(word, size) => Self::Bytes(Bytes::copy_from_slice(&word[..size])),
            // Compound values are carried as their ABI encoding; the mapping
            // heuristic treats them as opaque.
            other => Self::Bytes(other.abi_encode().into()),
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::Bytes(value) => write!(f, "{value}"),
        }
    }
}

/// A log matched to an event definition: argument values in
/// indexed-then-non-indexed order, with a parallel list of argument names.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub event_name: String,
    pub args: Vec<DecodedValue>,
    pub arg_names: Vec<String>,
}

impl DecodedEvent {
    pub fn arg_by_name(&self, name: &str) -> Option<&DecodedValue> {
        self.arg_names
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| &self.args[index])
    }
}
