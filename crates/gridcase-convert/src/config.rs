//! Run configuration for one conversion.
//!
//! The reference tool hardcoded these as process constants; here they are an
//! explicit value constructed once at startup (defaults, optionally a TOML
//! file, then CLI overrides) and passed to the pipeline. The two mutually
//! exclusive output-mode switches are tagged enums rather than booleans so a
//! builder can only observe one mode.

use gridcase_core::{CaseError, CaseResult, Degrees, Kilovolts, MegavoltAmperes, Ohms};
use serde::{Deserialize, Serialize};

/// How generator output is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Single static generator table; renewable output is folded into bus
    /// demand (net-injection convention). Cheaper, but distorts locational
    /// prices downstream.
    NetDemand,
    /// One generator table per snapshot with renewables as individual
    /// units whose Pmax tracks their realized output series.
    FullDispatch,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::NetDemand => write!(f, "net-demand"),
            DispatchMode::FullDispatch => write!(f, "full-dispatch"),
        }
    }
}

/// Where generator cost coefficients end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostOutput {
    /// c2/c1/c0 columns appended to the generator table
    Inline,
    /// Dedicated cost_data.csv, one row per generator-table row
    SeparateFile,
}

/// Constants and mode switches for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CaseConfig {
    /// System base power (MVA)
    pub base_mva: f64,
    /// System base voltage (kV); the bus table assumes a voltage-uniform
    /// network at this level
    pub base_kv: f64,
    /// Symmetric angle-difference envelope for every line (degrees)
    pub max_angle: f64,
    /// Short-term rating as a multiple of rateA
    pub rate_b_factor: f64,
    /// Emergency rating as a multiple of rateA
    pub rate_c_factor: f64,
    pub dispatch: DispatchMode,
    pub cost_output: CostOutput,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            base_mva: 100.0,
            base_kv: 380.0,
            max_angle: 30.0,
            rate_b_factor: 1.25,
            rate_c_factor: 1.75,
            dispatch: DispatchMode::NetDemand,
            cost_output: CostOutput::Inline,
        }
    }
}

impl CaseConfig {
    /// Base impedance used for per-unit normalization: `baseKV² / baseMVA`
    pub fn base_impedance(&self) -> Ohms {
        Kilovolts(self.base_kv).base_impedance(MegavoltAmperes(self.base_mva))
    }

    pub fn max_angle(&self) -> Degrees {
        Degrees(self.max_angle)
    }

    pub fn validate(&self) -> CaseResult<()> {
        for (name, value) in [
            ("base-mva", self.base_mva),
            ("base-kv", self.base_kv),
            ("max-angle", self.max_angle),
            ("rate-b-factor", self.rate_b_factor),
            ("rate-c-factor", self.rate_c_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CaseError::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let cfg = CaseConfig::default();
        assert_eq!(cfg.base_mva, 100.0);
        assert_eq!(cfg.base_kv, 380.0);
        assert_eq!(cfg.max_angle, 30.0);
        assert_eq!(cfg.rate_b_factor, 1.25);
        assert_eq!(cfg.rate_c_factor, 1.75);
        assert_eq!(cfg.dispatch, DispatchMode::NetDemand);
        assert_eq!(cfg.cost_output, CostOutput::Inline);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_base_impedance() {
        let cfg = CaseConfig::default();
        assert!((cfg.base_impedance().value() - 1444.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_nonpositive() {
        let cfg = CaseConfig {
            base_mva: 0.0,
            ..CaseConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("base-mva"));
    }
}
