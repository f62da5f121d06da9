// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Context implementations.
//!
//! A context implements the [`crate::adapters`] a session needs. The only
//! implementation shipped is [`memory::InMemoryContext`], which serves the
//! demo data set from memory and is meant for demos, development and tests.
pub mod memory;
