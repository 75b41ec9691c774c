use crate::template::TemplateEngine;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of filter/icon slots in the header.
pub const SLOTS: usize = 3;

pub const OPT_HIDE_EMPTY_LINES: &str = "hide_empty_lines";
pub const OPT_SHOW_ICONS: &str = "show_icons";
pub const OPT_REPLACE_DEFAULT_METADATA: &str = "replace_default_metadata";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_filters")]
    pub filters: [String; SLOTS],
    #[serde(default = "default_icons")]
    pub icons: [String; SLOTS],
    /// Named display switches. Names this crate does not know are kept as-is.
    #[serde(default = "default_options")]
    pub options: BTreeMap<String, bool>,
}

fn default_filters() -> [String; SLOTS] {
    [
        "$release_date$".into(),
        "$tracks$, $discs$ [$disc_ratio$]".into(),
        "$length$".into(),
    ]
}

fn default_icons() -> [String; SLOTS] {
    ["calendar".into(), "album".into(), "clock".into()]
}

fn default_options() -> BTreeMap<String, bool> {
    [
        (OPT_HIDE_EMPTY_LINES, true),
        (OPT_SHOW_ICONS, true),
        (OPT_REPLACE_DEFAULT_METADATA, true),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: default_filters(),
            icons: default_icons(),
            options: default_options(),
        }
    }
}

/// A single edit to the settings record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    SetFilter { slot: usize, template: String },
    SetIcon { slot: usize, icon: String },
    SetOption { name: String, value: bool },
    RemoveOption { name: String },
    Reset,
}

fn check_slot(slot: usize) -> anyhow::Result<()> {
    if slot >= SLOTS {
        bail!("slot {} out of range (expected 0..{})", slot, SLOTS);
    }
    Ok(())
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("loading settings from {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("parsing settings TOML")
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serializing settings TOML")
    }

    /// Apply one update and hand back the resulting config. The input value
    /// is consumed; callers persist the result through a store.
    pub fn apply(mut self, update: ConfigUpdate) -> anyhow::Result<Self> {
        match update {
            ConfigUpdate::SetFilter { slot, template } => {
                check_slot(slot)?;
                self.filters[slot] = template;
            }
            ConfigUpdate::SetIcon { slot, icon } => {
                check_slot(slot)?;
                self.icons[slot] = icon;
            }
            ConfigUpdate::SetOption { name, value } => {
                if name.trim().is_empty() {
                    bail!("option name must not be empty");
                }
                self.options.insert(name, value);
            }
            ConfigUpdate::RemoveOption { name } => {
                self.options.remove(&name);
            }
            ConfigUpdate::Reset => return Ok(Config::default()),
        }
        Ok(self)
    }

    /// Value of a named option; unset options read as `false`.
    pub fn option(&self, name: &str) -> bool {
        self.options.get(name).copied().unwrap_or(false)
    }

    /// Warnings for filters that reference tokens outside the engine's
    /// vocabulary. Empty when every filter is clean.
    pub fn validate(&self, engine: &TemplateEngine) -> Vec<String> {
        let mut warnings = Vec::new();
        for (slot, filter) in self.filters.iter().enumerate() {
            for name in engine.unknown_tokens(filter) {
                warnings.push(format!("filter {}: unknown token ${}$", slot, name));
            }
        }
        warnings
    }
}
