// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod error_codes;
pub mod jsonrpsee_helpers;
pub mod metrics;
pub mod server;
