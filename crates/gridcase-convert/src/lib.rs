//! # gridcase-convert: snapshot-to-case conversion pipeline
//!
//! Turns a loaded [`gridcase_core::Network`] into MATPOWER-style output
//! tables in five sequential stages:
//!
//! 1. island selection — keep the largest sub-network label partition
//! 2. bus indexing — dense 1-based integer ids for the retained buses
//! 3. bus tables — type codes, policy defaults, per-snapshot demand
//! 4. generator tables — dispatchable + hydro (+ renewables per snapshot)
//! 5. line table and optional cost table
//!
//! The bus index is the only cross-stage state; it is immutable and passed
//! by shared reference, so the table builders have no ordering dependency
//! among themselves.

use gridcase_core::{CaseError, CaseResult, Diagnostics, Network};
use tracing::debug;

pub mod busmap;
pub mod carriers;
pub mod config;
pub mod island;
pub mod tables;

mod bus;
mod cost;
mod gen;
mod line;

pub use busmap::BusIndex;
pub use config::{CaseConfig, CostOutput, DispatchMode};
pub use island::{select_main_island, subnetwork_key};
pub use tables::{
    status_code, BusRow, CaseTables, CostRow, GenRow, GeneratorTables, InlineCost, LineRow,
};

pub use bus::build_bus_tables;
pub use cost::build_cost_table;
pub use gen::build_generator_tables;
pub use line::build_line_table;

/// Run the whole pipeline with the default sub-network key extraction.
pub fn build_case(network: &Network, cfg: &CaseConfig) -> CaseResult<(CaseTables, Diagnostics)> {
    build_case_with_key(network, cfg, subnetwork_key)
}

/// Run the whole pipeline, partitioning buses with a caller-supplied key
/// extraction function.
pub fn build_case_with_key<K>(
    network: &Network,
    cfg: &CaseConfig,
    key: K,
) -> CaseResult<(CaseTables, Diagnostics)>
where
    K: Fn(&str) -> Option<String>,
{
    cfg.validate()?;
    let mut diag = Diagnostics::new();
    network.validate_into(&mut diag);

    // both modes read the realized output series: net-demand subtracts it
    // from demand, full-dispatch uses it as renewable capacity
    let needs_gens_p = !network.snapshots.is_empty()
        && (cfg.dispatch == DispatchMode::FullDispatch
            || network
                .generators
                .iter()
                .any(|g| carriers::is_renewable(&g.carrier)));
    if network.gens_p.is_none() && needs_gens_p {
        return Err(CaseError::Config(format!(
            "realized generator output series is required for {} output",
            cfg.dispatch
        )));
    }

    let retained = select_main_island(&network.buses, key, &mut diag)?;
    // duplicate identifiers would collapse in the index and break the
    // 1..=N bijection
    let mut seen = std::collections::HashSet::with_capacity(retained.len());
    for id in &retained {
        if !seen.insert(id.as_str()) {
            return Err(CaseError::Network(format!(
                "duplicate bus identifier '{id}'"
            )));
        }
    }
    let index = BusIndex::new(retained);
    debug!(buses = index.len(), snapshots = network.snapshots.len(), "island selected");

    let bus_series = build_bus_tables(network, &index, cfg, &mut diag);
    let generators = build_generator_tables(network, &index, cfg, &mut diag);
    let lines = build_line_table(network, &index, cfg, &mut diag);
    let costs = match cfg.cost_output {
        CostOutput::SeparateFile => Some(build_cost_table(network, &index, cfg)),
        CostOutput::Inline => None,
    };

    Ok((
        CaseTables {
            bus_series,
            generators,
            lines,
            costs,
            cost_output: cfg.cost_output,
        },
        diag,
    ))
}
