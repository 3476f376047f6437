//! Generator table builder.
//!
//! Two source populations share one output schema: dispatchable plants
//! (carrier allow-list) and hydro storage units, both restricted to the
//! retained island. In full-dispatch mode a third population is appended
//! per snapshot: variable renewables whose Pmax for that snapshot is their
//! realized output series value instead of a static bound.
//!
//! Reactive limits default to ±Pmax. The source model carries no usable
//! reactive capability data, so this is an approximation, same as the
//! reference tool.

use gridcase_core::{Diagnostics, Generator, Network, StorageUnit};

use crate::busmap::BusIndex;
use crate::carriers;
use crate::config::{CaseConfig, CostOutput, DispatchMode};
use crate::tables::{status_code, GenRow, GeneratorTables, InlineCost};

const VOLTAGE_SETPOINT_PU: f64 = 1.0;

/// Generator-like unit normalized from either source population.
pub(crate) struct GenSource {
    pub id: String,
    pub bus: u32,
    pub pg: f64,
    pub qg: f64,
    pub pmax: f64,
    pub pmin: f64,
    pub active: bool,
    pub c2: f64,
    pub c1: f64,
    pub startup: f64,
    pub shutdown: f64,
}

impl GenSource {
    fn from_generator(gen: &Generator, bus: u32) -> Self {
        Self {
            id: gen.id.clone(),
            bus,
            pg: gen.p_set.value(),
            qg: gen.q_set.value(),
            pmax: gen.p_nom.scaled(gen.p_max_pu).value(),
            pmin: gen.p_nom.scaled(gen.p_min_pu).value(),
            active: gen.active,
            c2: gen.marginal_cost_quadratic,
            c1: gen.marginal_cost,
            startup: gen.start_up_cost,
            shutdown: gen.shut_down_cost,
        }
    }

    fn from_storage(unit: &StorageUnit, bus: u32) -> Self {
        Self {
            id: unit.id.clone(),
            bus,
            pg: unit.p_set.value(),
            qg: unit.q_set.value(),
            pmax: unit.p_nom.scaled(unit.p_max_pu).value(),
            pmin: unit.p_nom.scaled(unit.p_min_pu).value(),
            active: unit.active,
            c2: unit.marginal_cost_quadratic,
            c1: unit.marginal_cost,
            // storage units carry no startup/shutdown costs in the source model
            startup: 0.0,
            shutdown: 0.0,
        }
    }
}

pub(crate) fn dispatchable_units<'a>(
    network: &'a Network,
    index: &'a BusIndex,
) -> impl Iterator<Item = &'a Generator> {
    network
        .generators
        .iter()
        .filter(move |g| carriers::is_dispatchable(&g.carrier) && index.contains(&g.bus))
}

pub(crate) fn hydro_units<'a>(
    network: &'a Network,
    index: &'a BusIndex,
) -> impl Iterator<Item = &'a StorageUnit> {
    network
        .storage_units
        .iter()
        .filter(move |s| carriers::is_hydro_storage(&s.carrier) && index.contains(&s.bus))
}

/// Renewables carried into full-dispatch output: retained bus and strictly
/// positive nominal capacity.
pub(crate) fn renewable_units<'a>(
    network: &'a Network,
    index: &'a BusIndex,
) -> impl Iterator<Item = &'a Generator> {
    network.generators.iter().filter(move |g| {
        carriers::is_renewable(&g.carrier) && index.contains(&g.bus) && g.p_nom.value() > 0.0
    })
}

/// Static population in output order: dispatchables, then hydro.
pub(crate) fn static_sources(network: &Network, index: &BusIndex) -> Vec<GenSource> {
    let mut sources: Vec<GenSource> = dispatchable_units(network, index)
        .filter_map(|g| {
            index
                .id(&g.bus)
                .map(|bus| GenSource::from_generator(g, bus))
        })
        .collect();
    sources.extend(hydro_units(network, index).filter_map(|s| {
        index.id(&s.bus).map(|bus| GenSource::from_storage(s, bus))
    }));
    sources
}

fn row_from_source(src: &GenSource, cfg: &CaseConfig, inline_cost: bool) -> GenRow {
    GenRow {
        gen_id: src.id.clone(),
        bus: src.bus,
        pg: src.pg,
        qg: src.qg,
        qmax: src.pmax,
        qmin: -src.pmax,
        vg: VOLTAGE_SETPOINT_PU,
        mbase: cfg.base_mva,
        status: status_code(src.active),
        pmax: src.pmax,
        pmin: src.pmin,
        cost: inline_cost.then_some(InlineCost {
            c2: src.c2,
            c1: src.c1,
            c0: 0.0,
        }),
    }
}

/// Build the generator output for the configured dispatch mode.
pub fn build_generator_tables(
    network: &Network,
    index: &BusIndex,
    cfg: &CaseConfig,
    diag: &mut Diagnostics,
) -> GeneratorTables {
    let inline_cost = cfg.cost_output == CostOutput::Inline;
    let static_rows: Vec<GenRow> = static_sources(network, index)
        .iter()
        .map(|src| row_from_source(src, cfg, inline_cost))
        .collect();

    match cfg.dispatch {
        DispatchMode::NetDemand => GeneratorTables::Static(static_rows),
        DispatchMode::FullDispatch => {
            let mut missing_output = 0usize;
            let mut per_snapshot = Vec::with_capacity(network.snapshots.len());
            for (t, snapshot) in network.snapshots.iter().enumerate() {
                let mut rows = static_rows.clone();
                for gen in renewable_units(network, index) {
                    let Some(bus) = index.id(&gen.bus) else {
                        continue;
                    };
                    let realized = network
                        .gens_p
                        .as_ref()
                        .and_then(|frame| frame.value(&gen.id, t));
                    if realized.is_none() {
                        missing_output += 1;
                    }
                    let mut src = GenSource::from_generator(gen, bus);
                    // available capacity for this snapshot is the realized
                    // output, not the static p_nom * p_max_pu bound
                    src.pmax = realized.unwrap_or(0.0);
                    rows.push(row_from_source(&src, cfg, inline_cost));
                }
                per_snapshot.push((*snapshot, rows));
            }
            if missing_output > 0 {
                diag.warn(
                    "series",
                    format!(
                        "{missing_output} renewable output value(s) missing from the realized series, Pmax treated as 0"
                    ),
                );
            }
            GeneratorTables::PerSnapshot(per_snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcase_core::{Megavars, Megawatts, PerUnit};

    fn generator(id: &str, bus: &str, carrier: &str, p_nom: f64) -> Generator {
        Generator {
            id: id.into(),
            bus: bus.into(),
            carrier: carrier.into(),
            p_nom: Megawatts(p_nom),
            p_min_pu: PerUnit(0.2),
            p_max_pu: PerUnit(0.9),
            p_set: Megawatts(10.0),
            q_set: Megavars(1.0),
            active: true,
            marginal_cost: 40.0,
            marginal_cost_quadratic: 0.05,
            start_up_cost: 500.0,
            shut_down_cost: 100.0,
        }
    }

    fn fixture() -> (Network, BusIndex) {
        let mut network = Network::new();
        network.generators.push(generator("nuke", "ES1 1", "nuclear", 1000.0));
        network.generators.push(generator("pv", "ES1 1", "solar", 50.0));
        network.generators.push(generator("off-island", "ES0 1", "coal", 100.0));
        network.storage_units.push(StorageUnit {
            id: "dam".into(),
            bus: "ES1 2".into(),
            carrier: "hydro".into(),
            p_nom: Megawatts(200.0),
            p_min_pu: PerUnit(0.0),
            p_max_pu: PerUnit(1.0),
            p_set: Megawatts(0.0),
            q_set: Megavars(0.0),
            active: false,
            marginal_cost: 5.0,
            marginal_cost_quadratic: 0.0,
        });
        let index = BusIndex::new(vec!["ES1 1".to_string(), "ES1 2".to_string()]);
        (network, index)
    }

    #[test]
    fn test_static_population_and_order() {
        let (network, index) = fixture();
        let sources = static_sources(&network, &index);

        // solar is not dispatchable, off-island coal is filtered out
        let ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["nuke", "dam"]);
    }

    #[test]
    fn test_capacity_bounds_from_availability_factors() {
        let (network, index) = fixture();
        let sources = static_sources(&network, &index);

        assert_eq!(sources[0].pmax, 900.0); // 1000 * 0.9
        assert_eq!(sources[0].pmin, 200.0); // 1000 * 0.2
    }

    #[test]
    fn test_row_defaults() {
        let (network, index) = fixture();
        let cfg = CaseConfig::default();
        let sources = static_sources(&network, &index);
        let row = row_from_source(&sources[0], &cfg, true);

        assert_eq!(row.qmax, row.pmax);
        assert_eq!(row.qmin, -row.pmax);
        assert_eq!(row.vg, 1.0);
        assert_eq!(row.mbase, 100.0);
        let cost = row.cost.unwrap();
        assert_eq!(cost.c2, 0.05);
        assert_eq!(cost.c1, 40.0);
        assert_eq!(cost.c0, 0.0);
    }

    #[test]
    fn test_inactive_unit_status() {
        let (network, index) = fixture();
        let cfg = CaseConfig::default();
        let sources = static_sources(&network, &index);
        let dam = row_from_source(&sources[1], &cfg, false);

        assert_eq!(dam.status, 0);
        assert!(dam.cost.is_none());
    }

    #[test]
    fn test_renewable_filter_requires_positive_capacity() {
        let (mut network, index) = fixture();
        network.generators.push(generator("ghost", "ES1 1", "onwind", 0.0));

        let ids: Vec<&str> = renewable_units(&network, &index)
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(ids, vec!["pv"]);
    }
}
