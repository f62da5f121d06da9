// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Opaque encoding of a piece of text, e.g. a rendered QR symbol.
///
/// It is a pure function of `source_text`: encoding the same text twice must
/// produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPayload {
    pub source_text: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl EncodedPayload {
    pub fn new(source_text: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source_text: source_text.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Returns the payload as a `data:` URI, ready to be used as an image source
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}
