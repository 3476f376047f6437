//! PyPSA CSV-folder importer.
//!
//! PyPSA serializes a network as one CSV per component table (`buses.csv`,
//! `generators.csv`, ...) plus wide per-attribute series files
//! (`loads-p_set.csv`: one timestamp column, one column per load). This
//! importer maps those tables onto [`Network`], defaulting the columns the
//! export omits and collecting structural oddities in [`Diagnostics`].
//!
//! `buses.csv` is always required, and `loads-p_set.csv` whenever the
//! network carries snapshots. Other component files that are absent load
//! as empty collections with a warning; optional series files load as
//! `None` and the pipeline decides whether the selected output mode can
//! live without them.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use gridcase_core::{
    Bus, Diagnostics, Generator, Kilovolts, Line, Load, Megavars, MegavoltAmperes, Megawatts,
    Network, Ohms, PerUnit, SeriesFrame, Siemens, Snapshot, StorageUnit,
};

/// Network plus the diagnostics collected while loading it.
#[derive(Debug)]
pub struct ImportResult {
    pub network: Network,
    pub diagnostics: Diagnostics,
}

fn default_true() -> bool {
    true
}

/// PyPSA writes booleans as `True`/`False`; older exports use `1`/`0`.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "" | "True" | "true" | "1" | "1.0" => Ok(true),
        "False" | "false" | "0" | "0.0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value '{other}'"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct BusRecord {
    name: String,
    #[serde(default)]
    v_nom: Option<f64>,
    #[serde(default)]
    control: String,
}

#[derive(Debug, Deserialize)]
struct LoadRecord {
    name: String,
    bus: String,
}

#[derive(Debug, Deserialize)]
struct GeneratorRecord {
    name: String,
    bus: String,
    #[serde(default)]
    carrier: String,
    #[serde(default)]
    p_nom: Option<f64>,
    #[serde(default)]
    p_min_pu: Option<f64>,
    #[serde(default)]
    p_max_pu: Option<f64>,
    #[serde(default)]
    p_set: Option<f64>,
    #[serde(default)]
    q_set: Option<f64>,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    active: bool,
    #[serde(default)]
    marginal_cost: Option<f64>,
    #[serde(default)]
    marginal_cost_quadratic: Option<f64>,
    #[serde(default)]
    start_up_cost: Option<f64>,
    #[serde(default)]
    shut_down_cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StorageUnitRecord {
    name: String,
    bus: String,
    #[serde(default)]
    carrier: String,
    #[serde(default)]
    p_nom: Option<f64>,
    #[serde(default)]
    p_min_pu: Option<f64>,
    #[serde(default)]
    p_max_pu: Option<f64>,
    #[serde(default)]
    p_set: Option<f64>,
    #[serde(default)]
    q_set: Option<f64>,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    active: bool,
    #[serde(default)]
    marginal_cost: Option<f64>,
    #[serde(default)]
    marginal_cost_quadratic: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LineRecord {
    name: String,
    bus0: String,
    bus1: String,
    #[serde(default)]
    r: Option<f64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    b: Option<f64>,
    #[serde(default)]
    s_nom: Option<f64>,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    active: bool,
}

fn read_component<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record.with_context(|| format!("parsing {}", path.display()))?);
    }
    Ok(records)
}

fn read_optional_component<T: DeserializeOwned>(
    path: &Path,
    diag: &mut Diagnostics,
) -> Result<Vec<T>> {
    if !path.exists() {
        diag.warn(
            "input",
            format!("{} not found; continuing with an empty table", path.display()),
        );
        return Ok(Vec::new());
    }
    read_component(path)
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    bail!("unrecognized timestamp '{raw}'")
}

fn read_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers()?.clone();
    // the timestamp column is named "snapshot" or "name" depending on the
    // exporting PyPSA version; fall back to the first column
    let col = headers
        .iter()
        .position(|h| h == "snapshot" || h == "name")
        .unwrap_or(0);

    let mut snapshots = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        let raw = record.get(col).unwrap_or_default();
        let ts = parse_timestamp(raw).with_context(|| format!("parsing {}", path.display()))?;
        snapshots.push(Snapshot(ts));
    }
    Ok(snapshots)
}

/// Read a wide series file: first column timestamps, one further column per
/// entity id. Row count must match the snapshot sequence.
fn read_series(path: &Path, snapshots: &[Snapshot]) -> Result<SeriesFrame> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let ids: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(snapshots.len()); ids.len()];
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        rows += 1;
        for (i, cell) in record.iter().skip(1).enumerate() {
            let value = if cell.is_empty() {
                0.0
            } else {
                cell.parse::<f64>().with_context(|| {
                    format!("parsing value '{cell}' in {}", path.display())
                })?
            };
            if let Some(column) = columns.get_mut(i) {
                column.push(value);
            }
        }
    }

    if rows != snapshots.len() {
        bail!(
            "{} has {} rows but the network has {} snapshots",
            path.display(),
            rows,
            snapshots.len()
        );
    }

    let mut frame = SeriesFrame::new(snapshots.len());
    for (id, values) in ids.into_iter().zip(columns) {
        frame.insert_column(id, values)?;
    }
    Ok(frame)
}

fn read_optional_series(path: &Path, snapshots: &[Snapshot]) -> Result<Option<SeriesFrame>> {
    if !path.exists() {
        return Ok(None);
    }
    read_series(path, snapshots).map(Some)
}

/// Load a PyPSA CSV-folder export from `dir`.
pub fn load_csv_folder(dir: &Path) -> Result<ImportResult> {
    if !dir.is_dir() {
        bail!("input path {} is not a directory", dir.display());
    }
    let mut diag = Diagnostics::new();
    let mut network = Network::new();

    let mut seen_buses = std::collections::HashSet::new();
    for record in read_component::<BusRecord>(&dir.join("buses.csv"))? {
        if !seen_buses.insert(record.name.clone()) {
            bail!("duplicate bus '{}' in buses.csv", record.name);
        }
        let control = record
            .control
            .parse()
            .with_context(|| format!("bus '{}'", record.name))?;
        network.buses.push(Bus {
            id: record.name,
            control,
            v_nom: Kilovolts(record.v_nom.unwrap_or(0.0)),
        });
    }

    for record in read_optional_component::<LoadRecord>(&dir.join("loads.csv"), &mut diag)? {
        network.loads.push(Load {
            id: record.name,
            bus: record.bus,
        });
    }

    for record in
        read_optional_component::<GeneratorRecord>(&dir.join("generators.csv"), &mut diag)?
    {
        network.generators.push(Generator {
            id: record.name,
            bus: record.bus,
            carrier: record.carrier,
            p_nom: Megawatts(record.p_nom.unwrap_or(0.0)),
            p_min_pu: PerUnit(record.p_min_pu.unwrap_or(0.0)),
            p_max_pu: PerUnit(record.p_max_pu.unwrap_or(1.0)),
            p_set: Megawatts(record.p_set.unwrap_or(0.0)),
            q_set: Megavars(record.q_set.unwrap_or(0.0)),
            active: record.active,
            marginal_cost: record.marginal_cost.unwrap_or(0.0),
            marginal_cost_quadratic: record.marginal_cost_quadratic.unwrap_or(0.0),
            start_up_cost: record.start_up_cost.unwrap_or(0.0),
            shut_down_cost: record.shut_down_cost.unwrap_or(0.0),
        });
    }

    for record in
        read_optional_component::<StorageUnitRecord>(&dir.join("storage_units.csv"), &mut diag)?
    {
        network.storage_units.push(StorageUnit {
            id: record.name,
            bus: record.bus,
            carrier: record.carrier,
            p_nom: Megawatts(record.p_nom.unwrap_or(0.0)),
            p_min_pu: PerUnit(record.p_min_pu.unwrap_or(0.0)),
            p_max_pu: PerUnit(record.p_max_pu.unwrap_or(1.0)),
            p_set: Megawatts(record.p_set.unwrap_or(0.0)),
            q_set: Megavars(record.q_set.unwrap_or(0.0)),
            active: record.active,
            marginal_cost: record.marginal_cost.unwrap_or(0.0),
            marginal_cost_quadratic: record.marginal_cost_quadratic.unwrap_or(0.0),
        });
    }

    for record in read_optional_component::<LineRecord>(&dir.join("lines.csv"), &mut diag)? {
        network.lines.push(Line {
            id: record.name,
            bus0: record.bus0,
            bus1: record.bus1,
            r: Ohms(record.r.unwrap_or(0.0)),
            x: Ohms(record.x.unwrap_or(0.0)),
            b: Siemens(record.b.unwrap_or(0.0)),
            s_nom: MegavoltAmperes(record.s_nom.unwrap_or(0.0)),
            active: record.active,
        });
    }

    let snapshots_path = dir.join("snapshots.csv");
    if snapshots_path.exists() {
        network.snapshots = read_snapshots(&snapshots_path)?;
    } else {
        diag.warn(
            "input",
            "snapshots.csv not found; no per-snapshot tables will be produced",
        );
    }

    match read_optional_series(&dir.join("loads-p_set.csv"), &network.snapshots)? {
        Some(frame) => network.loads_p = frame,
        None if network.snapshots.is_empty() => {
            network.loads_p = SeriesFrame::new(0);
        }
        None => bail!(
            "loads-p_set.csv not found in {}; the active demand series is required",
            dir.display()
        ),
    }
    network.loads_q = read_optional_series(&dir.join("loads-q_set.csv"), &network.snapshots)?;
    network.gens_p = read_optional_series(&dir.join("generators-p.csv"), &network.snapshots)?;
    network.gens_q = read_optional_series(&dir.join("generators-q.csv"), &network.snapshots)?;

    Ok(ImportResult {
        network,
        diagnostics: diag,
    })
}
