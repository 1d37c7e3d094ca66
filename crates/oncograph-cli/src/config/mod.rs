//! Configuration loading for oncograph.
//! Reads oncograph.toml from the current directory, the path in the
//! ONCOGRAPH_CONFIG env var, or an explicit `--config` path. Files ending in
//! `.yaml` / `.yml` are parsed as YAML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use oncograph_kg::adapters::{ClinicalSettings, CopyNumberSettings, OncoKbSettings, OncodashSettings, VariantsSettings};
use oncograph_kg::MergePolicy;

pub const CONFIG_ENV: &str = "ONCOGRAPH_CONFIG";
pub const DEFAULT_CONFIG: &str = "oncograph.toml";

/// A source section that is absent disables that adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    pub variants: Option<SourceConfig<VariantsSettings>>,
    pub copy_number: Option<SourceConfig<CopyNumberSettings>>,
    pub clinical: Option<SourceConfig<ClinicalSettings>>,
    pub oncokb: Option<SourceConfig<OncoKbSettings>>,
    pub oncodash: Option<OncodashConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

fn default_output_dir() -> PathBuf { PathBuf::from("./graph") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir(), merge_policy: MergePolicy::default() }
    }
}

/// Input file plus adapter settings. Omitted settings select everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub struct SourceConfig<S> {
    pub path: PathBuf,
    #[serde(default)]
    pub settings: S,
}

/// The oncodash export comes as a process file and a gene link file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OncodashConfig {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    #[serde(default)]
    pub settings: OncodashSettings,
}

impl Config {
    /// `explicit` wins, then ONCOGRAPH_CONFIG, then ./oncograph.toml.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(p) => p.to_path_buf(),
            None => std::env::var(CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG)),
        }
    }

    /// Load and parse the configuration file. Relative source paths are
    /// taken relative to the file's directory.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = Self::resolve_path(explicit);
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy oncograph.example.toml to {} and edit it, or point {} at one.",
                path.display(),
                DEFAULT_CONFIG,
                CONFIG_ENV
            );
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config = Self::parse(&content, &path)?;
        if let Some(base) = path.parent() {
            config.rebase_sources(base);
        }
        Ok(config)
    }

    /// Parse `content` as YAML or TOML, chosen by the extension of `path`.
    pub fn parse(content: &str, path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(content).with_context(|| format!("parsing YAML config {}", path.display()))
            }
            _ => toml::from_str(content).with_context(|| format!("parsing TOML config {}", path.display())),
        }
    }

    /// Names of the configured sources, in streaming order.
    pub fn enabled_sources(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.variants.is_some() { names.push("variants"); }
        if self.copy_number.is_some() { names.push("copy_number"); }
        if self.clinical.is_some() { names.push("clinical"); }
        if self.oncokb.is_some() { names.push("oncokb"); }
        if self.oncodash.is_some() { names.push("oncodash"); }
        names
    }

    fn rebase_sources(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(s) = &mut self.variants { rebase(&mut s.path); }
        if let Some(s) = &mut self.copy_number { rebase(&mut s.path); }
        if let Some(s) = &mut self.clinical { rebase(&mut s.path); }
        if let Some(s) = &mut self.oncokb { rebase(&mut s.path); }
        if let Some(s) = &mut self.oncodash {
            rebase(&mut s.nodes);
            rebase(&mut s.edges);
        }
    }
}

mod tests;
