//! Matches raw logs against event definitions and decodes their arguments.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::Event;
use alloy_primitives::{Address, B256, U256};
use tracing::trace;

use crate::models::logs::{DecodedEvent, DecodedValue, RawLogEntry};

/// Try each candidate definition in order and return the first successful
/// decode. The match key is the signature hash: keccak256 of the canonical
/// signature string against `topics[0]`. A malformed payload rules the
/// candidate out, it never aborts the run.
pub fn decode_log(log: &RawLogEntry, definitions: &[Event]) -> Option<DecodedEvent> {
    let signature_topic = log.topics.first()?;
    for definition in definitions {
        if definition.selector() != *signature_topic {
            continue;
        }
        match try_decode(log, definition) {
            Ok(decoded) => return Some(decoded),
            Err(reason) => {
                trace!("Log did not decode as {}: {reason}", definition.signature());
            }
        }
    }
    None
}

fn try_decode(log: &RawLogEntry, definition: &Event) -> Result<DecodedEvent, String> {
    let indexed: Vec<_> = definition.inputs.iter().filter(|input| input.indexed).collect();
    let non_indexed: Vec<_> = definition
        .inputs
        .iter()
        .filter(|input| !input.indexed)
        .collect();

    // Indexed arguments occupy topics[1..], one 32-byte word each, in
    // declaration order. An address is the low 20 bytes of the word; every
    // other indexed type is read as an unsigned big-endian integer.
    let mut args = Vec::with_capacity(definition.inputs.len());
    for (position, input) in indexed.iter().enumerate() {
        let topic = log
            .topics
            .get(position + 1)
            .ok_or_else(|| format!("missing topic for indexed input `{}`", input.name))?;
        args.push(decode_indexed_word(topic, &input.ty));
    }

    // Non-indexed arguments are a standard ABI-encoded parameter sequence in
    // the data payload.
    if !non_indexed.is_empty() {
        let types = non_indexed
            .iter()
            .map(|input| input.resolve())
            .collect::<Result<Vec<DynSolType>, _>>()
            .map_err(|e| format!("unresolvable input type: {e}"))?;
        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(&log.data)
            .map_err(|e| format!("data payload did not decode: {e}"))?;
        let values = match decoded {
            DynSolValue::Tuple(values) => values,
            single => vec![single],
        };
        if values.len() != non_indexed.len() {
            return Err(format!(
                "expected {} non-indexed values, decoded {}",
                non_indexed.len(),
                values.len()
            ));
        }
        args.extend(values.into_iter().map(DecodedValue::from));
    }

    // Names follow the same indexed-then-non-indexed split as the values.
    let arg_names = indexed
        .iter()
        .chain(non_indexed.iter())
        .map(|input| input.name.clone())
        .collect();

    Ok(DecodedEvent {
        event_name: definition.name.clone(),
        args,
        arg_names,
    })
}

fn decode_indexed_word(topic: &B256, ty: &str) -> DecodedValue {
    if ty == "address" {
        DecodedValue::Address(Address::from_word(*topic))
    } else {
        DecodedValue::Uint(U256::from_be_bytes(topic.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address, b256, keccak256};

    fn transfer_event() -> Event {
        serde_json::from_str(
            r#"{"type":"event","name":"Transfer","anonymous":false,"inputs":[
                {"name":"from","type":"address","indexed":true},
                {"name":"to","type":"address","indexed":true},
                {"name":"value","type":"uint256","indexed":false}
            ]}"#,
        )
        .unwrap()
    }

    fn step_executed_event() -> Event {
        serde_json::from_str(
            r#"{"type":"event","name":"StepExecuted","anonymous":false,"inputs":[
                {"name":"user","type":"address","indexed":true},
                {"name":"step","type":"string","indexed":false},
                {"name":"timestamp","type":"uint256","indexed":false}
            ]}"#,
        )
        .unwrap()
    }

    fn erc20_transfer_log() -> RawLogEntry {
        let mut data = vec![0u8; 32];
        data[24..].copy_from_slice(&1_000_000_000_000_000_000u64.to_be_bytes());
        RawLogEntry {
            address: address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            topics: vec![
                b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"),
                b256!("000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045"),
                b256!("000000000000000000000000ab5801a7d398351b8be11c439e05c5b3259aec9b"),
            ],
            data: data.into(),
            block_number: 19_000_000,
        }
    }

    #[test]
    fn signature_hash_matches_canonical_signature() {
        let event = transfer_event();
        assert_eq!(event.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            event.selector(),
            keccak256("Transfer(address,address,uint256)".as_bytes())
        );
    }

    #[test]
    fn decodes_indexed_and_non_indexed_arguments() {
        let decoded = decode_log(&erc20_transfer_log(), &[transfer_event()]).unwrap();
        assert_eq!(decoded.event_name, "Transfer");
        assert_eq!(decoded.arg_names, ["from", "to", "value"]);
        assert_eq!(
            decoded.args[0],
            DecodedValue::Address(address!("d8da6bf26964af9d7eed9e03e53415d37aa96045"))
        );
        assert_eq!(
            decoded.args[1],
            DecodedValue::Address(address!("ab5801a7d398351b8be11c439e05c5b3259aec9b"))
        );
        assert_eq!(
            decoded.args[2],
            DecodedValue::Uint(U256::from(1_000_000_000_000_000_000u64))
        );
    }

    #[test]
    fn round_trips_every_supported_type() {
        let event: Event = serde_json::from_str(
            r#"{"type":"event","name":"Everything","anonymous":false,"inputs":[
                {"name":"id","type":"uint256","indexed":true},
                {"name":"who","type":"address","indexed":false},
                {"name":"amount","type":"uint256","indexed":false},
                {"name":"label","type":"string","indexed":false},
                {"name":"payload","type":"bytes","indexed":false}
            ]}"#,
        )
        .unwrap();

        let who = address!("ab5801a7d398351b8be11c439e05c5b3259aec9b");
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Address(who),
            DynSolValue::Uint(U256::from(7u64), 256),
            DynSolValue::String("Checkout".into()),
            DynSolValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        ])
        .abi_encode_params();

        let log = RawLogEntry {
            address: Address::ZERO,
            topics: vec![event.selector(), B256::with_last_byte(9)],
            data: data.into(),
            block_number: 1,
        };

        let decoded = decode_log(&log, &[event]).unwrap();
        assert_eq!(decoded.arg_names, ["id", "who", "amount", "label", "payload"]);
        assert_eq!(
            decoded.args,
            vec![
                DecodedValue::Uint(U256::from(9u64)),
                DecodedValue::Address(who),
                DecodedValue::Uint(U256::from(7u64)),
                DecodedValue::Str("Checkout".into()),
                DecodedValue::Bytes(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef])),
            ]
        );
    }

    #[test]
    fn unknown_signature_is_undecoded() {
        let mut log = erc20_transfer_log();
        log.topics[0] = B256::with_last_byte(1);
        assert!(decode_log(&log, &[transfer_event()]).is_none());
        assert!(decode_log(&log, &[]).is_none());
    }

    #[test]
    fn log_without_topics_is_undecoded() {
        let mut log = erc20_transfer_log();
        log.topics.clear();
        assert!(decode_log(&log, &[transfer_event()]).is_none());
    }

    #[test]
    fn malformed_payload_rules_the_candidate_out() {
        let event = step_executed_event();
        let log = RawLogEntry {
            address: Address::ZERO,
            topics: vec![event.selector(), B256::with_last_byte(5)],
            // Too short to hold an offset-encoded string and a uint256.
            data: Bytes::from_static(&[0x01, 0x02]),
            block_number: 1,
        };
        assert!(decode_log(&log, &[event]).is_none());
    }

    #[test]
    fn non_address_indexed_types_decode_as_big_endian_integers() {
        // An indexed string arrives as the keccak hash of its contents; the
        // word is still surfaced as an unsigned integer.
        let event: Event = serde_json::from_str(
            r#"{"type":"event","name":"Tagged","anonymous":false,"inputs":[
                {"name":"tag","type":"string","indexed":true}
            ]}"#,
        )
        .unwrap();
        let hash = keccak256(b"hello");
        let log = RawLogEntry {
            address: Address::ZERO,
            topics: vec![event.selector(), hash],
            data: Bytes::new(),
            block_number: 1,
        };
        let decoded = decode_log(&log, &[event]).unwrap();
        assert_eq!(decoded.args, vec![DecodedValue::Uint(U256::from_be_bytes(hash.0))]);
    }
}
