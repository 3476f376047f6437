use std::fs;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use gridcase_convert::build_case;
use gridcase_core::Severity;
use gridcase_io::{case_name, load_csv_folder, write_case, ImportResult};

mod cli;
mod settings;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(&cli) {
        error!("conversion failed: {:?}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = settings::resolve(cli)?;
    cfg.validate()?;

    info!(
        input = %cli.input.display(),
        dispatch = %cfg.dispatch,
        "loading network"
    );
    let ImportResult {
        network,
        mut diagnostics,
    } = load_csv_folder(&cli.input)?;
    info!(
        buses = network.buses.len(),
        generators = network.generators.len(),
        lines = network.lines.len(),
        snapshots = network.snapshots.len(),
        "network loaded"
    );

    let (tables, convert_diag) = build_case(&network, &cfg)?;
    diagnostics.extend(convert_diag);

    for issue in &diagnostics.issues {
        match issue.severity {
            Severity::Warning => warn!("{issue}"),
            Severity::Error => error!("{issue}"),
        }
    }

    let case = case_name(&cli.input);
    let out_dir = cli.output.join(&case);
    let written = write_case(&out_dir, &tables)?;
    info!(
        files = written.len(),
        warnings = diagnostics.warning_count(),
        "case '{}' written to {}",
        case,
        out_dir.display()
    );

    if let Some(path) = &cli.diagnostics_json {
        let json =
            serde_json::to_string_pretty(&diagnostics).context("serializing diagnostics")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
