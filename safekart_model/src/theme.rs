// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Preference key under which the theme is persisted
pub const THEME_PREFERENCE_KEY: &str = "app-theme";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Futuristic,
    Corporate,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Futuristic => Theme::Corporate,
            Theme::Corporate => Theme::Futuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn themes_round_trip_through_their_persisted_name() {
        for theme in Theme::iter() {
            assert_eq!(Theme::from_str(&theme.to_string()).unwrap(), theme);
        }
        assert!(Theme::from_str("dark").is_err());
    }

    #[test]
    fn toggling_twice_is_identity() {
        assert_eq!(Theme::Futuristic.toggled(), Theme::Corporate);
        assert_eq!(Theme::Corporate.toggled().toggled(), Theme::Corporate);
    }
}
