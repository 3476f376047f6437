//! Output table row types.
//!
//! Rows mirror the MATPOWER-like column schemas one-to-one; the writer in
//! gridcase-io owns headers, delimiter, and number formatting. The PQ
//! capability and ramp columns of the generator schema (Pc1..apf) are part
//! of the declared format but never populated by this converter, so they do
//! not appear here; the writer emits them as empty cells.

use gridcase_core::Snapshot;

use crate::config::CostOutput;

/// Collapse an operational status flag to the signed convention of the
/// output format: strictly positive = active.
pub fn status_code(active: bool) -> i8 {
    if active {
        1
    } else {
        0
    }
}

/// One row of the bus table (`bus;type;Pd;Qd;Gs;Bs;area;Vm;Va;baseKV;zone;Vmax;Vmin`).
#[derive(Debug, Clone, PartialEq)]
pub struct BusRow {
    /// Dense 1-based bus id (table key, kept in the output)
    pub bus: u32,
    /// 1 = PQ, 2 = PV, 3 = reference; 4 (isolated) is never produced
    pub bus_type: u8,
    /// Active power demand (MW)
    pub pd: f64,
    /// Reactive power demand (Mvar)
    pub qd: f64,
    pub gs: f64,
    pub bs: f64,
    pub area: u32,
    pub vm: f64,
    pub va: f64,
    pub base_kv: f64,
    pub zone: u32,
    pub vmax: f64,
    pub vmin: f64,
}

/// Inlined polynomial cost coefficients (`c2;c1;c0` generator columns).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineCost {
    pub c2: f64,
    pub c1: f64,
    pub c0: f64,
}

/// One row of the generator table. Keyed by generator identifier during the
/// build; the identifier is dropped before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct GenRow {
    /// Identifier of the source unit (not serialized)
    pub gen_id: String,
    pub bus: u32,
    pub pg: f64,
    pub qg: f64,
    pub qmax: f64,
    pub qmin: f64,
    pub vg: f64,
    pub mbase: f64,
    pub status: i8,
    pub pmax: f64,
    pub pmin: f64,
    /// Present only when the cost file is disabled
    pub cost: Option<InlineCost>,
}

/// One row of the line table (`fbus;tbus;r;x;b;rateA;rateB;rateC;ratio;angle;status;angmin;angmax`).
#[derive(Debug, Clone, PartialEq)]
pub struct LineRow {
    pub fbus: u32,
    pub tbus: u32,
    /// Series resistance (pu)
    pub r: f64,
    /// Series reactance (pu)
    pub x: f64,
    /// Shunt susceptance (pu)
    pub b: f64,
    pub rate_a: f64,
    pub rate_b: f64,
    pub rate_c: f64,
    /// Transformer turn ratio; always 0, this converter does not model transformers
    pub ratio: f64,
    /// Transformer phase-shift angle; always 0
    pub angle: f64,
    pub status: i8,
    pub angmin: f64,
    pub angmax: f64,
}

/// Cost curve model code for [`CostRow`].
pub const COST_MODEL_PIECEWISE: u8 = 1;
pub const COST_MODEL_POLYNOMIAL: u8 = 2;

/// One row of the optional cost table (`model;startup;shutdown;n;c2;c1;c0`).
///
/// Coefficients are ordered highest-to-lowest degree for polynomial rows
/// (model 2) and low-to-high breakpoints for piecewise rows (model 1). The
/// converter only produces polynomial rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CostRow {
    pub model: u8,
    pub startup: f64,
    pub shutdown: f64,
    pub n: u8,
    pub coefficients: Vec<f64>,
}

/// Generator output, shaped by [`crate::config::DispatchMode`].
#[derive(Debug, Clone)]
pub enum GeneratorTables {
    /// Net-demand mode: one static table for the whole case
    Static(Vec<GenRow>),
    /// Full-dispatch mode: one table per snapshot
    PerSnapshot(Vec<(Snapshot, Vec<GenRow>)>),
}

/// Everything the pipeline produces for one case, ready to serialize.
#[derive(Debug, Clone)]
pub struct CaseTables {
    /// One bus table per snapshot (demand columns filled)
    pub bus_series: Vec<(Snapshot, Vec<BusRow>)>,
    pub generators: GeneratorTables,
    pub lines: Vec<LineRow>,
    /// Present iff `cost_output` is `SeparateFile`
    pub costs: Option<Vec<CostRow>>,
    pub cost_output: CostOutput,
}
