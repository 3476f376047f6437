use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gridcase",
    author,
    version,
    about = "Convert a PyPSA CSV network export into MATPOWER-style case tables",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the PyPSA CSV export
    pub input: PathBuf,

    /// Directory to write the case under (tables land in <OUTPUT>/<case>/)
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// System base power (MVA)
    #[arg(long)]
    pub base_mva: Option<f64>,

    /// Default bus base voltage (kV)
    #[arg(long)]
    pub base_kv: Option<f64>,

    /// Voltage angle limit in degrees, applied symmetrically
    #[arg(long)]
    pub max_angle: Option<f64>,

    /// Short-term line rating as a multiple of the continuous rating
    #[arg(long)]
    pub rate_b_factor: Option<f64>,

    /// Emergency line rating as a multiple of the continuous rating
    #[arg(long)]
    pub rate_c_factor: Option<f64>,

    /// Subtract realized renewable output from demand (static generator table)
    #[arg(long, conflicts_with = "full_dispatch")]
    pub net_demand: bool,

    /// Emit per-snapshot generator tables with renewables at realized output
    #[arg(long)]
    pub full_dispatch: bool,

    /// Write cost curves to cost_data.csv instead of inline c2;c1;c0 columns
    #[arg(long)]
    pub cost_file: bool,

    /// Dump the collected diagnostics as JSON to this path
    #[arg(long)]
    pub diagnostics_json: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}
