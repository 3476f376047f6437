//! Serialization of [`CaseTables`] to the `;`-delimited output layout.
//!
//! Layout under the case directory:
//!
//! ```text
//! <case>/
//!   series/bus_data_<date>_<hour>.csv      one per snapshot
//!   generator_data.csv                     net-demand mode
//!   series/generator_data_<date>_<hour>.csv  full-dispatch mode
//!   line_data.csv
//!   cost_data.csv                          only with a separate cost file
//! ```
//!
//! The bus table keeps its id column; generator and line tables do not.
//! The PQ capability and ramp columns of the generator schema (Pc1..apf)
//! are emitted as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use gridcase_convert::{BusRow, CaseTables, CostOutput, CostRow, GenRow, GeneratorTables, LineRow};
use gridcase_core::Snapshot;

const BUS_HEADER: [&str; 13] = [
    "bus", "type", "Pd", "Qd", "Gs", "Bs", "area", "Vm", "Va", "baseKV", "zone", "Vmax", "Vmin",
];

const GEN_HEADER: [&str; 21] = [
    "bus", "Pg", "Qg", "Qmax", "Qmin", "Vg", "mBase", "status", "Pmax", "Pmin", "Pc1", "Pc2",
    "Qc1min", "Qc1max", "Qc2min", "Qc2max", "Rfollow", "R10", "R30", "Rreact", "apf",
];

/// Pc1 through apf: declared by the format, never populated here.
const GEN_EMPTY_COLUMNS: usize = 11;

const GEN_COST_COLUMNS: [&str; 3] = ["c2", "c1", "c0"];

const LINE_HEADER: [&str; 13] = [
    "fbus", "tbus", "r", "x", "b", "rateA", "rateB", "rateC", "ratio", "angle", "status",
    "angmin", "angmax",
];

const COST_HEADER: [&str; 7] = ["model", "startup", "shutdown", "n", "c2", "c1", "c0"];

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))
}

fn write_bus_table(path: &Path, rows: &[BusRow]) -> Result<()> {
    let mut wtr = open_writer(path)?;
    wtr.write_record(BUS_HEADER).context("writing bus header")?;
    for row in rows {
        wtr.write_record([
            row.bus.to_string(),
            row.bus_type.to_string(),
            row.pd.to_string(),
            row.qd.to_string(),
            row.gs.to_string(),
            row.bs.to_string(),
            row.area.to_string(),
            row.vm.to_string(),
            row.va.to_string(),
            row.base_kv.to_string(),
            row.zone.to_string(),
            row.vmax.to_string(),
            row.vmin.to_string(),
        ])
        .context("writing bus record")?;
    }
    wtr.flush().context("flushing bus table")?;
    Ok(())
}

fn write_gen_table(path: &Path, rows: &[GenRow], cost_output: CostOutput) -> Result<()> {
    let mut wtr = open_writer(path)?;
    let inline = cost_output == CostOutput::Inline;

    let mut header: Vec<&str> = GEN_HEADER.to_vec();
    if inline {
        header.extend(GEN_COST_COLUMNS);
    }
    wtr.write_record(&header).context("writing generator header")?;

    for row in rows {
        let mut record = vec![
            row.bus.to_string(),
            row.pg.to_string(),
            row.qg.to_string(),
            row.qmax.to_string(),
            row.qmin.to_string(),
            row.vg.to_string(),
            row.mbase.to_string(),
            row.status.to_string(),
            row.pmax.to_string(),
            row.pmin.to_string(),
        ];
        record.extend(std::iter::repeat(String::new()).take(GEN_EMPTY_COLUMNS));
        if inline {
            // rows built for inline output always carry coefficients
            let cost = row.cost.unwrap_or(gridcase_convert::InlineCost {
                c2: 0.0,
                c1: 0.0,
                c0: 0.0,
            });
            record.push(cost.c2.to_string());
            record.push(cost.c1.to_string());
            record.push(cost.c0.to_string());
        }
        wtr.write_record(&record).context("writing generator record")?;
    }
    wtr.flush().context("flushing generator table")?;
    Ok(())
}

fn write_line_table(path: &Path, rows: &[LineRow]) -> Result<()> {
    let mut wtr = open_writer(path)?;
    wtr.write_record(LINE_HEADER).context("writing line header")?;
    for row in rows {
        wtr.write_record([
            row.fbus.to_string(),
            row.tbus.to_string(),
            row.r.to_string(),
            row.x.to_string(),
            row.b.to_string(),
            row.rate_a.to_string(),
            row.rate_b.to_string(),
            row.rate_c.to_string(),
            row.ratio.to_string(),
            row.angle.to_string(),
            row.status.to_string(),
            row.angmin.to_string(),
            row.angmax.to_string(),
        ])
        .context("writing line record")?;
    }
    wtr.flush().context("flushing line table")?;
    Ok(())
}

fn write_cost_table(path: &Path, rows: &[CostRow]) -> Result<()> {
    let mut wtr = open_writer(path)?;
    wtr.write_record(COST_HEADER).context("writing cost header")?;
    for row in rows {
        let mut record = vec![
            row.model.to_string(),
            row.startup.to_string(),
            row.shutdown.to_string(),
            row.n.to_string(),
        ];
        record.extend(row.coefficients.iter().map(|c| c.to_string()));
        wtr.write_record(&record).context("writing cost record")?;
    }
    wtr.flush().context("flushing cost table")?;
    Ok(())
}

fn series_path(series_dir: &Path, table: &str, snapshot: &Snapshot) -> PathBuf {
    series_dir.join(format!("{table}_{}.csv", snapshot.file_label()))
}

/// Write all tables for one case under `out_dir`, creating the directory
/// tree if needed. Returns the written file paths in write order.
pub fn write_case(out_dir: &Path, tables: &CaseTables) -> Result<Vec<PathBuf>> {
    let series_dir = out_dir.join("series");
    if out_dir.exists() {
        info!(path = %out_dir.display(), "output directory exists, overwriting tables");
    }
    fs::create_dir_all(&series_dir)
        .with_context(|| format!("creating {}", series_dir.display()))?;

    let mut written = Vec::new();

    for (snapshot, rows) in &tables.bus_series {
        let path = series_path(&series_dir, "bus_data", snapshot);
        write_bus_table(&path, rows)?;
        written.push(path);
    }

    match &tables.generators {
        GeneratorTables::Static(rows) => {
            let path = out_dir.join("generator_data.csv");
            write_gen_table(&path, rows, tables.cost_output)?;
            written.push(path);
        }
        GeneratorTables::PerSnapshot(series) => {
            for (snapshot, rows) in series {
                let path = series_path(&series_dir, "generator_data", snapshot);
                write_gen_table(&path, rows, tables.cost_output)?;
                written.push(path);
            }
        }
    }

    let line_path = out_dir.join("line_data.csv");
    write_line_table(&line_path, &tables.lines)?;
    written.push(line_path);

    if let Some(costs) = &tables.costs {
        let cost_path = out_dir.join("cost_data.csv");
        write_cost_table(&cost_path, costs)?;
        written.push(cost_path);
    }

    Ok(written)
}
