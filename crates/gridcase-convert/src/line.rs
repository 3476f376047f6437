//! Line table builder.
//!
//! Impedances arrive in physical units and leave normalized to the system
//! base: r and x divide by the base impedance, b multiplies by it. Rating
//! tiers B and C are fixed multiples of the nominal rating. Transformers
//! are not modelled; ratio and phase-shift angle are always 0.

use gridcase_core::{Diagnostics, Network};

use crate::busmap::BusIndex;
use crate::config::CaseConfig;
use crate::tables::{status_code, LineRow};

/// Build the line table for lines inside the retained island.
///
/// The reference tool filtered on the origin bus only, which can emit a
/// destination id that no bus row carries. Here both endpoints are
/// validated: a line whose origin is retained but whose destination was
/// discarded is skipped with a warning instead.
pub fn build_line_table(
    network: &Network,
    index: &BusIndex,
    cfg: &CaseConfig,
    diag: &mut Diagnostics,
) -> Vec<LineRow> {
    let z_base = cfg.base_impedance();
    let angmax = cfg.max_angle().value();

    let mut rows = Vec::new();
    for line in &network.lines {
        let Some(fbus) = index.id(&line.bus0) else {
            continue;
        };
        let Some(tbus) = index.id(&line.bus1) else {
            diag.warn_entity(
                "topology",
                format!(
                    "line skipped: destination bus '{}' is outside the retained island",
                    line.bus1
                ),
                &line.id,
            );
            continue;
        };

        let rate_a = line.s_nom.value();
        rows.push(LineRow {
            fbus,
            tbus,
            r: line.r.to_per_unit(z_base).value(),
            x: line.x.to_per_unit(z_base).value(),
            b: line.b.to_per_unit(z_base).value(),
            rate_a,
            rate_b: rate_a * cfg.rate_b_factor,
            rate_c: rate_a * cfg.rate_c_factor,
            ratio: 0.0,
            angle: 0.0,
            status: status_code(line.active),
            angmin: -angmax,
            angmax,
        });
    }
    rows
}
