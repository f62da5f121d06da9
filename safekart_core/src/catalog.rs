// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Search over the trusted product catalog

use std::sync::Arc;

use log::{debug, warn};
use safekart_model::Product;
use safekart_session::{epoch::Epoch, machine::Machine, settlement, state::SessionState};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{adapters::ProductCatalog, config::SessionTimings, Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Searching { query: String },
    Found { query: String, results: Vec<Product> },
}

impl SessionState for SearchState {
    fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Searching { .. } => "searching",
            SearchState::Found { .. } => "found",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Found { .. })
    }
}

pub struct CatalogSearch<E> {
    shared: Arc<Shared<E>>,
}

struct Shared<E> {
    catalog: E,
    timings: SessionTimings,
    machine: Machine<SearchState>,
}

impl<E> CatalogSearch<E>
where
    E: ProductCatalog + Send + Sync + 'static,
{
    pub fn new(catalog: E, timings: SessionTimings) -> Self {
        Self {
            shared: Arc::new(Shared {
                catalog,
                timings,
                machine: Machine::new("catalog search", SearchState::Idle),
            }),
        }
    }

    pub fn state(&self) -> SearchState {
        self.shared.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.machine.subscribe()
    }

    /// Returns every product whose name, brand, category or description
    /// contains `query`, ignoring case. A newer search supersedes a pending one.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `query` is blank.
    /// - [`Error::AdapterError`] if the catalog fails; the search goes back to `Idle`.
    /// - [`Error::Superseded`] if a newer search or a reset came first.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Err(Error::EmptyInput);
        }

        let epoch = {
            let mut machine = self.shared.machine.lock();
            let epoch = machine.advance();
            machine.transition(SearchState::Searching {
                query: query.clone(),
            });
            epoch
        };

        let shared = self.shared.clone();
        settlement::spawn(async move {
            tokio::time::sleep(shared.timings.catalog_search).await;
            let products = shared.catalog.products().await;
            shared.finish(epoch, query, products)
        })
        .outcome()
        .await?
    }

    pub fn reset(&self) {
        let mut machine = self.shared.machine.lock();
        machine.advance();
        machine.transition(SearchState::Idle);
    }
}

impl<E> Shared<E>
where
    E: ProductCatalog,
{
    fn finish(
        &self,
        epoch: Epoch,
        query: String,
        products: std::result::Result<Vec<Product>, E::AdapterError>,
    ) -> Option<Result<Vec<Product>>> {
        let mut machine = self.machine.lock();
        if !machine.is_current(epoch) {
            warn!("Discarding stale search for {query:?}");
            return None;
        }
        let products = match products {
            Ok(products) => products,
            Err(err) => {
                machine.transition(SearchState::Idle);
                return Some(Err(Error::adapter(err)));
            }
        };
        let needle = query.to_lowercase();
        let results: Vec<Product> = products
            .into_iter()
            .filter(|product| product.matches(&needle))
            .collect();
        debug!("Search for {query:?} matched {} products", results.len());
        machine.transition(SearchState::Found {
            query,
            results: results.clone(),
        });
        Some(Ok(results))
    }
}
