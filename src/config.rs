use std::{collections::BTreeSet, env};

use crate::category::CATEGORIES;

pub const INSTANCE_VAR: &str = "SPONSORBLOCK_INSTANCE";
pub const CATEGORIES_VAR: &str = "SPONSORBLOCK_CATEGORIES";
pub const DEFAULT_INSTANCE: &str = "https://sponsor.ajay.app";

/// Which instance to ask and which categories to ask it for.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the SponsorBlock instance. Empty disables fetching.
    pub instance: String,
    pub categories: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var(INSTANCE_VAR).ok(), env::var(CATEGORIES_VAR).ok())
    }

    fn from_vars(instance: Option<String>, categories: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(instance) = instance {
            config.instance = instance.trim().to_string();
        }
        if let Some(categories) = categories {
            config.categories = parse_categories(&categories);
        }

        config
    }
}

/// Splits a comma separated category list, ignoring blank entries.
pub fn parse_categories(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}
