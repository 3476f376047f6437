//! Bus table builder.
//!
//! A static skeleton (type code + configuration-level defaults) is built
//! once for the retained island, then cloned per snapshot with the demand
//! columns filled in. The voltage-related defaults assume a
//! voltage-uniform network at the configured base level; that is a known
//! approximation carried over from the reference tool.

use std::collections::HashMap;

use gridcase_core::{BusControl, Diagnostics, Network, Snapshot};

use crate::busmap::BusIndex;
use crate::carriers;
use crate::config::{CaseConfig, DispatchMode};
use crate::tables::BusRow;

// Policy defaults applied uniformly to every bus
const SHUNT_G: f64 = 0.0;
const SHUNT_B: f64 = 0.0;
const AREA: u32 = 1;
const VOLTAGE_PU: f64 = 1.0;
const ANGLE_DEG: f64 = 0.0;
const ZONE: u32 = 1;
const VMAX_PU: f64 = 1.1;
const VMIN_PU: f64 = 0.9;

fn type_code(control: BusControl) -> u8 {
    match control {
        BusControl::Pq => 1,
        BusControl::Pv => 2,
        BusControl::Slack => 3,
    }
}

/// Static rows for the retained island, demand zeroed. Resolves reference
/// multiplicity: exactly one row keeps type 3, extras are demoted to PQ.
fn build_skeleton(
    network: &Network,
    index: &BusIndex,
    cfg: &CaseConfig,
    diag: &mut Diagnostics,
) -> Vec<BusRow> {
    let by_id: HashMap<&str, BusControl> = network
        .buses
        .iter()
        .map(|b| (b.id.as_str(), b.control))
        .collect();

    let mut rows: Vec<BusRow> = index
        .iter()
        .map(|(id, name)| BusRow {
            bus: id,
            bus_type: type_code(by_id.get(name).copied().unwrap_or(BusControl::Pq)),
            pd: 0.0,
            qd: 0.0,
            gs: SHUNT_G,
            bs: SHUNT_B,
            area: AREA,
            vm: VOLTAGE_PU,
            va: ANGLE_DEG,
            base_kv: cfg.base_kv,
            zone: ZONE,
            vmax: VMAX_PU,
            vmin: VMIN_PU,
        })
        .collect();

    let slack_count = rows.iter().filter(|r| r.bus_type == 3).count();
    if slack_count > 1 {
        diag.warn(
            "slack",
            format!("{slack_count} slack buses detected; keeping the first, demoting the rest to PQ"),
        );
        let mut seen = false;
        for row in &mut rows {
            if row.bus_type == 3 {
                if seen {
                    row.bus_type = 1;
                }
                seen = true;
            }
        }
    } else if slack_count == 0 && !rows.is_empty() {
        diag.warn("slack", "no slack bus found in the retained island");
    }

    rows
}

/// One bus table per snapshot, with Pd/Qd filled from the demand series.
/// In net-demand mode the realized output of renewable-carrier generators
/// at the bus is subtracted (net-injection convention).
pub fn build_bus_tables(
    network: &Network,
    index: &BusIndex,
    cfg: &CaseConfig,
    diag: &mut Diagnostics,
) -> Vec<(Snapshot, Vec<BusRow>)> {
    let skeleton = build_skeleton(network, index, cfg, diag);

    if network.loads_q.is_none() && !network.snapshots.is_empty() {
        diag.warn(
            "series",
            "no reactive demand series; Qd defaulted to 0 for all buses",
        );
    }

    let net_demand = cfg.dispatch == DispatchMode::NetDemand;

    // Pd and Qd must net consistently: with a reactive demand series but no
    // realized reactive output, Qd would stay raw while Pd is netted
    if net_demand
        && !network.snapshots.is_empty()
        && network.loads_q.is_some()
        && network.gens_q.is_none()
        && network
            .generators
            .iter()
            .any(|g| carriers::is_renewable(&g.carrier) && index.contains(&g.bus))
    {
        diag.warn(
            "series",
            "no realized reactive output series; Qd carries raw reactive demand while Pd is netted",
        );
    }

    let mut missing_load_columns = 0usize;

    let mut series = Vec::with_capacity(network.snapshots.len());
    for (t, snapshot) in network.snapshots.iter().enumerate() {
        let mut rows = skeleton.clone();
        for row in &mut rows {
            let Some(name) = index.name(row.bus) else {
                continue;
            };

            let mut pd = 0.0;
            let mut qd = 0.0;
            for load in network.loads_at_bus(name) {
                match network.loads_p.value(&load.id, t) {
                    Some(v) => pd += v,
                    None => missing_load_columns += 1,
                }
                if let Some(frame) = &network.loads_q {
                    qd += frame.value(&load.id, t).unwrap_or(0.0);
                }
            }

            if net_demand {
                for gen in network
                    .generators_at_bus(name)
                    .filter(|g| carriers::is_renewable(&g.carrier))
                {
                    if let Some(frame) = &network.gens_p {
                        pd -= frame.value(&gen.id, t).unwrap_or(0.0);
                    }
                    if network.loads_q.is_some() {
                        if let Some(frame) = &network.gens_q {
                            qd -= frame.value(&gen.id, t).unwrap_or(0.0);
                        }
                    }
                }
            }

            row.pd = pd;
            row.qd = qd;
        }
        series.push((*snapshot, rows));
    }

    if missing_load_columns > 0 {
        diag.warn(
            "series",
            format!(
                "{missing_load_columns} load value(s) missing from the active demand series, treated as 0"
            ),
        );
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gridcase_core::{
        Bus, BusControl, Generator, Kilovolts, Load, Megavars, Megawatts, PerUnit, SeriesFrame,
    };

    fn bus(id: &str, control: BusControl) -> Bus {
        Bus {
            id: id.into(),
            control,
            v_nom: Kilovolts(380.0),
        }
    }

    fn network_with(controls: &[BusControl]) -> (Network, BusIndex) {
        let mut network = Network::new();
        for (i, control) in controls.iter().enumerate() {
            network.buses.push(bus(&format!("ES1 {i}"), *control));
        }
        let index = BusIndex::new(network.buses.iter().map(|b| b.id.clone()));
        (network, index)
    }

    #[test]
    fn test_type_codes_and_defaults() {
        let (network, index) =
            network_with(&[BusControl::Slack, BusControl::Pv, BusControl::Pq]);
        let mut diag = Diagnostics::new();
        let rows = build_skeleton(&network, &index, &CaseConfig::default(), &mut diag);

        assert_eq!(rows[0].bus_type, 3);
        assert_eq!(rows[1].bus_type, 2);
        assert_eq!(rows[2].bus_type, 1);
        for row in &rows {
            assert_eq!(row.gs, 0.0);
            assert_eq!(row.bs, 0.0);
            assert_eq!(row.area, 1);
            assert_eq!(row.vm, 1.0);
            assert_eq!(row.va, 0.0);
            assert_eq!(row.base_kv, 380.0);
            assert_eq!(row.zone, 1);
            assert_eq!(row.vmax, 1.1);
            assert_eq!(row.vmin, 0.9);
        }
        assert!(diag.is_empty());
    }

    #[test]
    fn test_extra_slack_demoted() {
        let (network, index) =
            network_with(&[BusControl::Pq, BusControl::Slack, BusControl::Slack]);
        let mut diag = Diagnostics::new();
        let rows = build_skeleton(&network, &index, &CaseConfig::default(), &mut diag);

        let slack_rows: Vec<&BusRow> = rows.iter().filter(|r| r.bus_type == 3).collect();
        assert_eq!(slack_rows.len(), 1);
        assert_eq!(slack_rows[0].bus, 2);
        // the demoted one becomes PQ
        assert_eq!(rows[2].bus_type, 1);
        assert_eq!(diag.warning_count(), 1);
    }

    #[test]
    fn test_net_demand_without_reactive_output_warns() {
        let mut network = Network::new();
        network.buses.push(bus("ES1 1", BusControl::Slack));
        network.loads.push(Load {
            id: "demand-1".into(),
            bus: "ES1 1".into(),
        });
        network.generators.push(Generator {
            id: "pv".into(),
            bus: "ES1 1".into(),
            carrier: "solar".into(),
            p_nom: Megawatts(120.0),
            p_min_pu: PerUnit(0.0),
            p_max_pu: PerUnit(1.0),
            p_set: Megawatts(0.0),
            q_set: Megavars(0.0),
            active: true,
            marginal_cost: 0.1,
            marginal_cost_quadratic: 0.0,
            start_up_cost: 0.0,
            shut_down_cost: 0.0,
        });
        network.snapshots = vec![Snapshot(
            NaiveDate::from_ymd_opt(2013, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )];

        let mut loads_p = SeriesFrame::new(1);
        loads_p
            .insert_column("demand-1".into(), vec![100.0])
            .unwrap();
        network.loads_p = loads_p;
        let mut loads_q = SeriesFrame::new(1);
        loads_q.insert_column("demand-1".into(), vec![40.0]).unwrap();
        network.loads_q = Some(loads_q);
        let mut gens_p = SeriesFrame::new(1);
        gens_p.insert_column("pv".into(), vec![30.0]).unwrap();
        network.gens_p = Some(gens_p);

        let index = BusIndex::new(vec!["ES1 1".to_string()]);
        let mut diag = Diagnostics::new();
        let series = build_bus_tables(&network, &index, &CaseConfig::default(), &mut diag);

        let (_, rows) = &series[0];
        assert_eq!(rows[0].pd, 70.0);
        // reactive demand passes through unnetted, and says so
        assert_eq!(rows[0].qd, 40.0);
        assert!(diag
            .warnings()
            .any(|i| i.message.contains("reactive output")));
    }

    #[test]
    fn test_missing_slack_warns() {
        let (network, index) = network_with(&[BusControl::Pq, BusControl::Pv]);
        let mut diag = Diagnostics::new();
        let rows = build_skeleton(&network, &index, &CaseConfig::default(), &mut diag);

        assert!(rows.iter().all(|r| r.bus_type != 3));
        assert_eq!(diag.warning_count(), 1);
        assert!(diag.issues[0].message.contains("no slack bus"));
    }
}
