//! Optional cost table builder.
//!
//! Emitted only when the cost file is enabled; otherwise the coefficients
//! ride along as c2/c1/c0 columns on the generator table. Rows follow the
//! generator-table population and order so the two files correspond
//! positionally: dispatchables, hydro storage, then (in full-dispatch mode)
//! the renewable units that appear in every per-snapshot table. All rows
//! are polynomial (model 2) with coefficients highest degree first.

use gridcase_core::Network;

use crate::busmap::BusIndex;
use crate::config::{CaseConfig, DispatchMode};
use crate::gen::{renewable_units, static_sources};
use crate::tables::{CostRow, COST_MODEL_POLYNOMIAL};

fn polynomial_row(startup: f64, shutdown: f64, c2: f64, c1: f64) -> CostRow {
    CostRow {
        model: COST_MODEL_POLYNOMIAL,
        startup,
        shutdown,
        n: 3,
        coefficients: vec![c2, c1, 0.0],
    }
}

/// One cost row per generator-table row.
pub fn build_cost_table(network: &Network, index: &BusIndex, cfg: &CaseConfig) -> Vec<CostRow> {
    let mut rows: Vec<CostRow> = static_sources(network, index)
        .iter()
        .map(|src| polynomial_row(src.startup, src.shutdown, src.c2, src.c1))
        .collect();

    if cfg.dispatch == DispatchMode::FullDispatch {
        rows.extend(renewable_units(network, index).map(|g| {
            polynomial_row(
                g.start_up_cost,
                g.shut_down_cost,
                g.marginal_cost_quadratic,
                g.marginal_cost,
            )
        }));
    }
    rows
}
