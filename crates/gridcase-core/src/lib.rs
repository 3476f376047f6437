//! # gridcase-core: network snapshot model
//!
//! Domain model for a PyPSA-style network snapshot: flat component tables
//! (buses, loads, generators, storage units, lines) keyed by string
//! identifiers, plus an ordered snapshot sequence and wide time-series
//! frames for the time-varying attributes.
//!
//! The model is deliberately table-shaped rather than graph-shaped: the
//! conversion pipeline filters, remaps, and re-emits rows, and its island
//! selection works on an identifier label, not on edge connectivity.
//!
//! ## Modules
//!
//! - [`units`] - newtype wrappers for physical quantities
//! - [`diagnostics`] - warning/error collection for load and conversion
//! - [`error`] - unified [`CaseError`] / [`CaseResult`]

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod units;

pub use diagnostics::{Diagnostics, Issue, Severity};
pub use error::{CaseError, CaseResult};
pub use units::{
    Degrees, Kilovolts, Megavars, MegavoltAmperes, Megawatts, Ohms, PerUnit, Siemens,
};

/// Bus control mode as carried by the source model.
///
/// The output table encodes these as MATPOWER type codes (PQ=1, PV=2,
/// Slack=3); code 4 (isolated) exists in the table format but is never
/// produced, isolated buses are dropped before the bus table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusControl {
    /// Load bus: P and Q fixed
    Pq,
    /// Voltage-controlled bus: P and |V| fixed
    Pv,
    /// Reference (slack) bus: |V| and angle fixed
    Slack,
}

impl FromStr for BusControl {
    type Err = CaseError;

    fn from_str(s: &str) -> CaseResult<Self> {
        match s {
            "PQ" | "" => Ok(BusControl::Pq),
            "PV" => Ok(BusControl::Pv),
            "Slack" => Ok(BusControl::Slack),
            other => Err(CaseError::Parse(format!(
                "unknown bus control mode '{other}' (expected PQ, PV, or Slack)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub id: String,
    pub control: BusControl,
    /// Nominal voltage of the bus
    pub v_nom: Kilovolts,
}

/// Load attached to a bus. Demand values are time-indexed and live in the
/// network's series frames; many loads may share one bus and aggregate by
/// summation.
#[derive(Debug, Clone)]
pub struct Load {
    pub id: String,
    pub bus: String,
}

#[derive(Debug, Clone)]
pub struct Generator {
    pub id: String,
    pub bus: String,
    /// Fuel/technology tag ("CCGT", "nuclear", "solar", ...)
    pub carrier: String,
    /// Nominal capacity
    pub p_nom: Megawatts,
    /// Lower per-unit availability factor
    pub p_min_pu: PerUnit,
    /// Upper per-unit availability factor
    pub p_max_pu: PerUnit,
    /// Active power setpoint
    pub p_set: Megawatts,
    /// Reactive power setpoint
    pub q_set: Megavars,
    pub active: bool,
    /// Linear marginal cost coefficient ($/MWh)
    pub marginal_cost: f64,
    /// Quadratic marginal cost coefficient
    pub marginal_cost_quadratic: f64,
    pub start_up_cost: f64,
    pub shut_down_cost: f64,
}

/// Hydro storage unit, converted as a generator-like source. Storage energy
/// limits are not represented; acceptable for single-period optimization.
#[derive(Debug, Clone)]
pub struct StorageUnit {
    pub id: String,
    pub bus: String,
    pub carrier: String,
    pub p_nom: Megawatts,
    pub p_min_pu: PerUnit,
    pub p_max_pu: PerUnit,
    pub p_set: Megawatts,
    pub q_set: Megavars,
    pub active: bool,
    pub marginal_cost: f64,
    pub marginal_cost_quadratic: f64,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub id: String,
    /// Origin bus
    pub bus0: String,
    /// Destination bus
    pub bus1: String,
    /// Series resistance (physical ohms)
    pub r: Ohms,
    /// Series reactance (physical ohms)
    pub x: Ohms,
    /// Total shunt susceptance (physical siemens)
    pub b: Siemens,
    /// Nominal apparent-power capacity
    pub s_nom: MegavoltAmperes,
    pub active: bool,
}

/// One discrete point of the externally supplied time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub NaiveDateTime);

impl Snapshot {
    /// Label used in per-snapshot output file names: `YYYY-MM-DD_HH`
    pub fn file_label(&self) -> String {
        self.0.format("%Y-%m-%d_%H").to_string()
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Wide time-series table: one column per entity id, one row per snapshot.
///
/// Column lengths are validated on insertion, so `value` lookups cannot see
/// ragged data.
#[derive(Debug, Clone, Default)]
pub struct SeriesFrame {
    rows: usize,
    columns: BTreeMap<String, Vec<f64>>,
}

impl SeriesFrame {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: BTreeMap::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.columns.contains_key(id)
    }

    pub fn insert_column(&mut self, id: String, values: Vec<f64>) -> CaseResult<()> {
        if values.len() != self.rows {
            return Err(CaseError::Parse(format!(
                "series column '{}' has {} rows, expected {}",
                id,
                values.len(),
                self.rows
            )));
        }
        self.columns.insert(id, values);
        Ok(())
    }

    /// Value for a column at snapshot index `t`, or `None` when the column
    /// is absent from the frame.
    pub fn value(&self, id: &str, t: usize) -> Option<f64> {
        self.columns.get(id).and_then(|col| col.get(t)).copied()
    }
}

/// In-memory network snapshot produced by the loader.
#[derive(Debug, Default)]
pub struct Network {
    pub buses: Vec<Bus>,
    pub loads: Vec<Load>,
    pub generators: Vec<Generator>,
    pub storage_units: Vec<StorageUnit>,
    pub lines: Vec<Line>,
    pub snapshots: Vec<Snapshot>,
    /// Scheduled active demand, one column per load id (required)
    pub loads_p: SeriesFrame,
    /// Scheduled reactive demand (optional; missing defaults Qd to zero)
    pub loads_q: Option<SeriesFrame>,
    /// Realized active output, one column per generator id (required by
    /// net-demand subtraction and full-dispatch capacity)
    pub gens_p: Option<SeriesFrame>,
    /// Realized reactive output (optional)
    pub gens_q: Option<SeriesFrame>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads attached to a bus
    pub fn loads_at_bus<'a>(&'a self, bus: &'a str) -> impl Iterator<Item = &'a Load> + 'a {
        self.loads.iter().filter(move |l| l.bus == bus)
    }

    /// Generators attached to a bus
    pub fn generators_at_bus<'a>(
        &'a self,
        bus: &'a str,
    ) -> impl Iterator<Item = &'a Generator> + 'a {
        self.generators.iter().filter(move |g| g.bus == bus)
    }

    /// Basic sanity checks on the loaded model. Populates `diag`;
    /// only an entirely bus-less network is an error.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.buses.is_empty() {
            diag.error("structure", "network has no buses");
            return;
        }
        if self.loads.is_empty() {
            diag.warn("structure", "network has no loads");
        }
        if self.generators.is_empty() && self.storage_units.is_empty() {
            diag.warn("structure", "network has no generators or storage units");
        }
        if self.snapshots.is_empty() {
            diag.warn("structure", "network has no snapshots; no demand tables will be written");
        }
    }
}
