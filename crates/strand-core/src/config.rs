use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "strand.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandConfig {
    #[serde(default)]
    pub fuse: FuseConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseConfig {
    /// What to do with a cycle of degree-2 nodes that touches nothing else.
    #[serde(default)]
    pub isolated_cycles: IsolatedCycles,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolatedCycles {
    /// Keep the first node of the cycle and replace the rest with one self-loop.
    #[default]
    Collapse,
    /// Leave isolated cycles untouched.
    Preserve,
}

/// Load a config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<StrandConfig> {
    if !path.exists() {
        return Ok(StrandConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<StrandConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_config(&dir.path().join(DEFAULT_CONFIG_FILE)).expect("load should succeed");
        assert_eq!(cfg, StrandConfig::default());
        assert_eq!(cfg.fuse.isolated_cycles, IsolatedCycles::Collapse);
    }

    #[test]
    fn fuse_section_without_policy_collapses() {
        let cfg: StrandConfig = toml::from_str("[fuse]\n").expect("parse");
        assert_eq!(cfg.fuse, FuseConfig::default());
        assert_eq!(FuseConfig::default().isolated_cycles, IsolatedCycles::Collapse);
    }

    #[test]
    fn isolated_cycle_policy_parses() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[fuse]\nisolated_cycles = \"preserve\"\n").expect("write config");
        let cfg = load_config(&path).expect("load should succeed");
        assert_eq!(cfg.fuse.isolated_cycles, IsolatedCycles::Preserve);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "").expect("write config");
        assert_eq!(load_config(&path).expect("load"), StrandConfig::default());
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[fuse]\nisolated_cycles = \"explode\"\n").expect("write config");
        let err = load_config(&path).expect_err("bad policy must fail");
        assert!(err.to_string().contains("Failed to parse"));
    }
}
