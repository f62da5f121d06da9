// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use safekart_model::EncodedPayload;

/// Turns text into an opaque encoded payload (e.g. a rendered QR symbol).
///
/// Implementations must be pure: the same text always yields byte-identical
/// output.
pub trait PayloadEncoder {
    fn encode(&self, text: &str) -> EncodedPayload;
}
