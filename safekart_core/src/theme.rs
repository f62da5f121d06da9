// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Persisted theme preference
//!
//! Read once on startup, written on every change. Preference failures never
//! reach the caller: an unreadable preference falls back to the default theme
//! and a failing write is logged.

use std::{str::FromStr, sync::Mutex};

use log::{debug, warn};
use safekart_model::{Theme, THEME_PREFERENCE_KEY};
use tokio::sync::watch;

use crate::adapters::PreferenceStore;

pub struct ThemePreference<E> {
    store: E,
    // serializes read-modify-write of the theme with its persistence
    current: Mutex<Theme>,
    watch: watch::Sender<Theme>,
}

impl<E> ThemePreference<E>
where
    E: PreferenceStore,
{
    /// Loads the persisted theme; missing or unknown values give the default.
    pub fn load(store: E) -> Self {
        let theme = match store.preference(THEME_PREFERENCE_KEY) {
            Ok(Some(value)) => Theme::from_str(&value).unwrap_or_else(|_| {
                warn!("Unknown theme {value:?}, using the default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("Could not read the theme preference: {err}");
                Theme::default()
            }
        };
        let (watch, _) = watch::channel(theme);
        Self {
            store,
            current: Mutex::new(theme),
            watch,
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock().unwrap()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.watch.subscribe()
    }

    /// Switches to the other theme and persists it
    pub fn toggle(&self) -> Theme {
        let mut current = self.current.lock().unwrap();
        let next = current.toggled();
        self.apply(&mut current, next);
        next
    }

    pub fn set(&self, theme: Theme) {
        let mut current = self.current.lock().unwrap();
        self.apply(&mut current, theme);
    }

    fn apply(&self, current: &mut Theme, theme: Theme) {
        *current = theme;
        debug!("Theme set to {theme}");
        if let Err(err) = self
            .store
            .set_preference(THEME_PREFERENCE_KEY, &theme.to_string())
        {
            warn!("Could not persist the theme preference: {err}");
        }
        self.watch.send_replace(theme);
    }
}
