// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Payloads of the gateway's JSON-RPC methods that are not plain model types.

use std::str::FromStr;

use safekart_core::timeline::{OrderLookup, TimelineView};
use safekart_model::{EncodedPayload, ScanResult};
use serde::{Deserialize, Serialize};
use strum::{self, IntoEnumIterator};

/// The JSON-RPC methods served by the gateway
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum RpcMethod {
    ApiInfo,
    VerifyProduct,
    LookupOrder,
    GenerateCode,
    SearchProducts,
    ScanImage,
}

// Serialized through the strum names so that the listing in `api_info` is
// exactly what a client has to call.

impl Serialize for RpcMethod {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let name: &'static str = self.into();
        serializer.serialize_str(name)
    }
}

impl<'de> Deserialize<'de> for RpcMethod {
    fn deserialize<D>(deserializer: D) -> std::result::Result<RpcMethod, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RpcMethod::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub methods: Vec<RpcMethod>,
}

pub fn api_info() -> ApiInfo {
    ApiInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        methods: RpcMethod::iter().collect(),
    }
}

/// Answer of `lookup_order`. A found order comes with its rendered timeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderReply {
    pub lookup: OrderLookup,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeline: Option<TimelineView>,
}

/// Answer of `generate_code`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub payload: EncodedPayload,
    /// The payload as a `data:` URI, ready to be used as an image source
    pub data_uri: String,
}

impl From<EncodedPayload> for GeneratedCode {
    fn from(payload: EncodedPayload) -> Self {
        GeneratedCode {
            data_uri: payload.data_uri(),
            payload,
        }
    }
}

/// Answer of `scan_image`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanReply {
    pub result: ScanResult,
    /// Whether the payload looks like a link a client may offer to open
    pub is_link: bool,
}

impl From<ScanResult> for ScanReply {
    fn from(result: ScanResult) -> Self {
        ScanReply {
            is_link: result.is_link(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_serialize_as_their_rpc_names() {
        let serialized = serde_json::to_string(&RpcMethod::VerifyProduct).unwrap();
        assert_eq!(serialized, "\"verify_product\"");

        let deserialized: RpcMethod = serde_json::from_str("\"scan_image\"").unwrap();
        assert_eq!(deserialized, RpcMethod::ScanImage);
    }

    #[test]
    fn api_info_lists_every_method() {
        let info = api_info();
        assert_eq!(info.name, "safekart_gateway");
        assert_eq!(info.methods.len(), 6);
        assert!(info.methods.contains(&RpcMethod::LookupOrder));
    }
}
