// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Session timing configuration
//!
//! Every delay a session waits on is a named value of [`SessionTimings`]. The
//! defaults pace the demo flows; tests use [`SessionTimings::immediate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Camera detection window before the demo decoder reports a code
pub const DETECTION_WINDOW: Duration = Duration::from_secs(3);
/// Pacing of an uploaded image decode
pub const IMAGE_DECODE: Duration = Duration::from_millis(1_500);
/// Interval modelling the remote authenticity check
pub const VERIFICATION_SETTLE: Duration = Duration::from_secs(2);
/// How long a `Verified` outcome stays before the session decays to idle
pub const VERIFIED_DISPLAY: Duration = Duration::from_secs(3);
/// Artificial encoder latency
pub const ENCODE_DELAY: Duration = Duration::from_secs(1);
/// Pacing of an order lookup, so callers can render progress
pub const ORDER_LOOKUP: Duration = Duration::from_secs(1);
/// Upper bound on the order store answering
pub const ORDER_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
/// Pacing of a catalog search
pub const CATALOG_SEARCH: Duration = Duration::from_secs(1);

/// Payload reported by the demo camera
pub const DEMO_CAMERA_PAYLOAD: &str = "https://safekart.example.com/product/ABC123";
/// Payload reported by the demo image decoder
pub const DEMO_UPLOAD_PAYLOAD: &str = "https://safekart.example.com/product/XYZ789";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionTimings {
    #[serde(with = "millis")]
    pub detection_window: Duration,
    #[serde(with = "millis")]
    pub image_decode: Duration,
    #[serde(with = "millis")]
    pub verification_settle: Duration,
    #[serde(with = "millis")]
    pub verified_display: Duration,
    #[serde(with = "millis")]
    pub encode_delay: Duration,
    #[serde(with = "millis")]
    pub order_lookup: Duration,
    #[serde(with = "millis")]
    pub order_lookup_timeout: Duration,
    #[serde(with = "millis")]
    pub catalog_search: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            detection_window: DETECTION_WINDOW,
            image_decode: IMAGE_DECODE,
            verification_settle: VERIFICATION_SETTLE,
            verified_display: VERIFIED_DISPLAY,
            encode_delay: ENCODE_DELAY,
            order_lookup: ORDER_LOOKUP,
            order_lookup_timeout: ORDER_LOOKUP_TIMEOUT,
            catalog_search: CATALOG_SEARCH,
        }
    }
}

impl SessionTimings {
    /// No pacing at all. The lookup timeout keeps its default so a slow store
    /// is still bounded.
    pub fn immediate() -> Self {
        Self {
            detection_window: Duration::ZERO,
            image_decode: Duration::ZERO,
            verification_settle: Duration::ZERO,
            verified_display: Duration::ZERO,
            encode_delay: Duration::ZERO,
            order_lookup: Duration::ZERO,
            order_lookup_timeout: ORDER_LOOKUP_TIMEOUT,
            catalog_search: Duration::ZERO,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_deserialize_from_millis_with_defaults() {
        let timings: SessionTimings =
            serde_json::from_str(r#"{"verification_settle": 250, "encode_delay": 0}"#).unwrap();
        assert_eq!(timings.verification_settle, Duration::from_millis(250));
        assert_eq!(timings.encode_delay, Duration::ZERO);
        assert_eq!(timings.detection_window, DETECTION_WINDOW);
        assert_eq!(timings.verified_display, VERIFIED_DISPLAY);
    }
}
