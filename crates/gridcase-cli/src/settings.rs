//! Layered configuration: built-in defaults, then the optional TOML file,
//! then command-line flags. Later layers win per field.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use gridcase_convert::{CaseConfig, CostOutput, DispatchMode};

use crate::cli::Cli;

/// The TOML face of [`CaseConfig`]; every field optional so a file only
/// pins what it mentions.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub base_mva: Option<f64>,
    pub base_kv: Option<f64>,
    pub max_angle: Option<f64>,
    pub rate_b_factor: Option<f64>,
    pub rate_c_factor: Option<f64>,
    pub dispatch: Option<DispatchMode>,
    pub cost_output: Option<CostOutput>,
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Build the effective [`CaseConfig`] from defaults, the optional config
/// file, and the flags.
pub fn resolve(cli: &Cli) -> Result<CaseConfig> {
    let file = match &cli.config {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };

    let mut cfg = CaseConfig::default();

    if let Some(v) = file.base_mva {
        cfg.base_mva = v;
    }
    if let Some(v) = file.base_kv {
        cfg.base_kv = v;
    }
    if let Some(v) = file.max_angle {
        cfg.max_angle = v;
    }
    if let Some(v) = file.rate_b_factor {
        cfg.rate_b_factor = v;
    }
    if let Some(v) = file.rate_c_factor {
        cfg.rate_c_factor = v;
    }
    if let Some(v) = file.dispatch {
        cfg.dispatch = v;
    }
    if let Some(v) = file.cost_output {
        cfg.cost_output = v;
    }

    if let Some(v) = cli.base_mva {
        cfg.base_mva = v;
    }
    if let Some(v) = cli.base_kv {
        cfg.base_kv = v;
    }
    if let Some(v) = cli.max_angle {
        cfg.max_angle = v;
    }
    if let Some(v) = cli.rate_b_factor {
        cfg.rate_b_factor = v;
    }
    if let Some(v) = cli.rate_c_factor {
        cfg.rate_c_factor = v;
    }
    if cli.full_dispatch {
        cfg.dispatch = DispatchMode::FullDispatch;
    } else if cli.net_demand {
        cfg.dispatch = DispatchMode::NetDemand;
    }
    if cli.cost_file {
        cfg.cost_output = CostOutput::SeparateFile;
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["gridcase", "network"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = resolve(&cli(&[])).unwrap();
        assert_eq!(cfg.base_mva, 100.0);
        assert_eq!(cfg.base_kv, 380.0);
        assert_eq!(cfg.dispatch, DispatchMode::NetDemand);
        assert_eq!(cfg.cost_output, CostOutput::Inline);
    }

    #[test]
    fn test_file_overrides_defaults_flags_override_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gridcase.toml");
        std::fs::write(
            &path,
            "base-mva = 200.0\nmax-angle = 45.0\ndispatch = \"full-dispatch\"\n",
        )
        .unwrap();

        let mut args_cli = cli(&["--max-angle", "60"]);
        args_cli.config = Some(path);
        let cfg = resolve(&args_cli).unwrap();

        assert_eq!(cfg.base_mva, 200.0);
        assert_eq!(cfg.max_angle, 60.0);
        assert_eq!(cfg.dispatch, DispatchMode::FullDispatch);
        // untouched fields keep the defaults
        assert_eq!(cfg.rate_b_factor, 1.25);
    }

    #[test]
    fn test_net_demand_flag_overrides_file_dispatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gridcase.toml");
        std::fs::write(&path, "dispatch = \"full-dispatch\"\n").unwrap();

        let mut args_cli = cli(&["--net-demand"]);
        args_cli.config = Some(path);
        let cfg = resolve(&args_cli).unwrap();
        assert_eq!(cfg.dispatch, DispatchMode::NetDemand);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gridcase.toml");
        std::fs::write(&path, "base-nva = 200.0\n").unwrap();

        let mut args_cli = cli(&[]);
        args_cli.config = Some(path);
        assert!(resolve(&args_cli).is_err());
    }
}
