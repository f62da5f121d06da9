// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a scanned payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScanSource {
    Camera,
    FileUpload,
}

/// Payload extracted by a scan attempt.
///
/// Immutable once produced: the fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    payload: String,
    source: ScanSource,
    captured_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(payload: impl Into<String>, source: ScanSource, captured_at: DateTime<Utc>) -> Self {
        Self {
            payload: payload.into(),
            source,
            captured_at,
        }
    }

    /// Returns a result stamped with the current wall clock time
    pub fn captured_now(payload: impl Into<String>, source: ScanSource) -> Self {
        Self::new(payload, source, Utc::now())
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn source(&self) -> ScanSource {
        self.source
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Whether the UI should offer to open the payload as a link.
    ///
    /// This is a prefix test only, the payload is never parsed as a URL.
    pub fn is_link(&self) -> bool {
        self.payload.starts_with("http")
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::https("https://safekart.example.com/product/ABC123", true)]
    #[case::plain_http("http://example.com", true)]
    #[case::bare_prefix("httpfoo", true)]
    #[case::text("ABC123", false)]
    #[case::leading_space(" https://example.com", false)]
    fn link_detection_is_a_prefix_test(#[case] payload: &str, #[case] expected: bool) {
        let result = ScanResult::captured_now(payload, ScanSource::Camera);
        assert_eq!(result.is_link(), expected);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let result = ScanResult::captured_now("XYZ", ScanSource::FileUpload);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "file_upload");
        assert!(json.get("capturedAt").is_some());
    }
}
