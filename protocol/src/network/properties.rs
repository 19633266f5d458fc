//! Network-wide constants read from a node.
//!
//! `GET /network/properties` returns a document of the form
//!
//! ```json
//! {
//!   "network": {
//!     "epochAdjustment": "1637848847s",
//!     "generationHashSeed": "49D6E1CE276A85B70EAFE52349AACCA389302E7A9754BCF1221E79494FC665A4"
//!   },
//!   "chain": { "currencyMosaicId": "0x72C0'212E'67A0'8BCE" }
//! }
//! ```
//!
//! Numbers come back as strings with unit suffixes and digit-group quotes,
//! which are stripped before parsing.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::NETWORK_PROPERTIES_PATH;
use crate::crypto::hash::Hash256;
use crate::transaction::types::MosaicId;

use super::error::NetworkQueryError;
use super::transport::NodeTransport;

const EPOCH_ADJUSTMENT_FIELD: &str = "network.epochAdjustment";
const CURRENCY_MOSAIC_ID_FIELD: &str = "chain.currencyMosaicId";
const GENERATION_HASH_SEED_FIELD: &str = "network.generationHashSeed";

/// Everything a builder and submitter need from the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProperties {
    /// Seconds between the Unix epoch and the network epoch.
    pub epoch_adjustment: u32,
    /// The network currency (e.g. `symbol.xym`).
    pub currency_mosaic_id: MosaicId,
    /// The node's generation hash seed, when it reports one.
    pub generation_hash_seed: Option<Hash256>,
}

/// Reads network properties. One round trip per call, no retries.
#[derive(Clone)]
pub struct NetworkPropertiesClient {
    transport: Arc<dyn NodeTransport>,
}

impl NetworkPropertiesClient {
    pub fn new(transport: Arc<dyn NodeTransport>) -> Self {
        Self { transport }
    }

    /// The epoch adjustment in seconds.
    pub async fn get_epoch_adjustment(&self) -> Result<u32, NetworkQueryError> {
        parse_epoch_adjustment(&self.fetch_document().await?)
    }

    /// The id of the network currency mosaic.
    pub async fn get_currency_mosaic_id(&self) -> Result<MosaicId, NetworkQueryError> {
        parse_currency_mosaic_id(&self.fetch_document().await?)
    }

    /// All properties from a single request.
    pub async fn fetch(&self) -> Result<NetworkProperties, NetworkQueryError> {
        let document = self.fetch_document().await?;
        let properties = NetworkProperties {
            epoch_adjustment: parse_epoch_adjustment(&document)?,
            currency_mosaic_id: parse_currency_mosaic_id(&document)?,
            generation_hash_seed: parse_generation_hash_seed(&document)?,
        };
        debug!(
            epoch_adjustment = properties.epoch_adjustment,
            currency_mosaic_id = %properties.currency_mosaic_id,
            "fetched network properties"
        );
        Ok(properties)
    }

    async fn fetch_document(&self) -> Result<Value, NetworkQueryError> {
        let response = self.transport.get(NETWORK_PROPERTIES_PATH).await?;
        if !response.is_success() {
            return Err(NetworkQueryError::Status {
                status: response.status,
            });
        }
        serde_json::from_str(&response.body)
            .map_err(|e| NetworkQueryError::MalformedBody(e.to_string()))
    }
}

fn string_field<'a>(
    document: &'a Value,
    section: &str,
    key: &str,
    field: &'static str,
) -> Result<&'a str, NetworkQueryError> {
    document[section][key]
        .as_str()
        .ok_or_else(|| NetworkQueryError::MalformedField {
            field,
            reason: "missing or not a string".to_string(),
        })
}

/// `"1637848847s"` -> `1637848847`.
pub fn parse_epoch_adjustment(document: &Value) -> Result<u32, NetworkQueryError> {
    let raw = string_field(document, "network", "epochAdjustment", EPOCH_ADJUSTMENT_FIELD)?;
    let digits: String = raw.chars().filter(|c| *c != 's' && *c != '\'').collect();
    digits
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| NetworkQueryError::MalformedField {
            field: EPOCH_ADJUSTMENT_FIELD,
            reason: format!("{:?}: {}", raw, e),
        })
}

/// `"0x72C0'212E'67A0'8BCE"` -> `0x72C0212E67A08BCE`.
pub fn parse_currency_mosaic_id(document: &Value) -> Result<MosaicId, NetworkQueryError> {
    let raw = string_field(document, "chain", "currencyMosaicId", CURRENCY_MOSAIC_ID_FIELD)?;
    raw.parse().map_err(|e: std::num::ParseIntError| NetworkQueryError::MalformedField {
        field: CURRENCY_MOSAIC_ID_FIELD,
        reason: format!("{:?}: {}", raw, e),
    })
}

/// Optional. Absent on some node versions.
pub fn parse_generation_hash_seed(document: &Value) -> Result<Option<Hash256>, NetworkQueryError> {
    match document["network"]["generationHashSeed"].as_str() {
        None => Ok(None),
        Some(raw) => Hash256::from_hex(raw.trim())
            .map(Some)
            .map_err(|e| NetworkQueryError::MalformedField {
                field: GENERATION_HASH_SEED_FIELD,
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "network": {
                "epochAdjustment": "1637848847s",
                "generationHashSeed": "49D6E1CE276A85B70EAFE52349AACCA389302E7A9754BCF1221E79494FC665A4"
            },
            "chain": { "currencyMosaicId": "0x72C0'212E'67A0'8BCE" }
        })
    }

    #[test]
    fn parses_epoch_adjustment() {
        assert_eq!(parse_epoch_adjustment(&document()).unwrap(), 1_637_848_847);
    }

    #[test]
    fn parses_quoted_currency_id() {
        assert_eq!(
            parse_currency_mosaic_id(&document()).unwrap(),
            MosaicId(0x72C0212E67A08BCE)
        );
    }

    #[test]
    fn parses_optional_seed() {
        let seed = parse_generation_hash_seed(&document()).unwrap().unwrap();
        assert_eq!(
            seed.to_hex(),
            "49D6E1CE276A85B70EAFE52349AACCA389302E7A9754BCF1221E79494FC665A4"
        );
        assert_eq!(parse_generation_hash_seed(&json!({})).unwrap(), None);
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_epoch_adjustment(&json!({ "network": {} })).unwrap_err();
        assert!(matches!(
            err,
            NetworkQueryError::MalformedField { field: EPOCH_ADJUSTMENT_FIELD, .. }
        ));
    }

    #[test]
    fn non_numeric_is_malformed() {
        let bad = json!({
            "network": { "epochAdjustment": "soon" },
            "chain": { "currencyMosaicId": "0xZZ" }
        });
        assert!(parse_epoch_adjustment(&bad).is_err());
        assert!(matches!(
            parse_currency_mosaic_id(&bad),
            Err(NetworkQueryError::MalformedField { field: CURRENCY_MOSAIC_ID_FIELD, .. })
        ));
    }
}
