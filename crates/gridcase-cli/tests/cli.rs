use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Two-island network: three ES0 buses and seven ES1 buses; only the ES1
/// partition survives island selection.
fn write_network(dir: &Path) {
    let mut buses = String::from("name,v_nom,control\n");
    for i in 1..=3 {
        buses.push_str(&format!("ES0 {i},380.0,PQ\n"));
    }
    buses.push_str("ES1 1,380.0,Slack\n");
    for i in 2..=7 {
        buses.push_str(&format!("ES1 {i},380.0,PQ\n"));
    }
    fs::write(dir.join("buses.csv"), buses).unwrap();

    fs::write(dir.join("loads.csv"), "name,bus\ndemand-1,ES1 1\n").unwrap();
    fs::write(
        dir.join("generators.csv"),
        "name,bus,carrier,p_nom,p_max_pu,p_set,active,marginal_cost,marginal_cost_quadratic,start_up_cost\n\
         nuke,ES1 2,nuclear,1000.0,0.9,500.0,True,30.0,0.02,1000.0\n\
         pv,ES1 1,solar,120.0,1.0,0.0,True,0.1,0.0,0.0\n",
    )
    .unwrap();
    fs::write(
        dir.join("lines.csv"),
        "name,bus0,bus1,r,x,b,s_nom,active\nl-1-2,ES1 1,ES1 2,14.44,144.4,0.001,800.0,True\n",
    )
    .unwrap();
    fs::write(
        dir.join("snapshots.csv"),
        "snapshot\n2013-01-01 00:00:00\n2013-01-01 01:00:00\n",
    )
    .unwrap();
    fs::write(
        dir.join("loads-p_set.csv"),
        "snapshot,demand-1\n2013-01-01 00:00:00,100.0\n2013-01-01 01:00:00,80.0\n",
    )
    .unwrap();
    fs::write(
        dir.join("generators-p.csv"),
        "snapshot,nuke,pv\n2013-01-01 00:00:00,500.0,30.0\n2013-01-01 01:00:00,480.0,45.0\n",
    )
    .unwrap();
}

fn gridcase() -> Command {
    Command::cargo_bin("gridcase").unwrap()
}

#[test]
fn converts_a_network_folder() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");

    gridcase()
        .arg(&input)
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();

    let case = output.join("network");
    assert!(case.join("series/bus_data_2013-01-01_00.csv").exists());
    assert!(case.join("series/bus_data_2013-01-01_01.csv").exists());
    assert!(case.join("generator_data.csv").exists());
    assert!(case.join("line_data.csv").exists());
    assert!(!case.join("cost_data.csv").exists());

    // net-demand default: realized solar output is subtracted from demand
    let bus = fs::read_to_string(case.join("series/bus_data_2013-01-01_00.csv")).unwrap();
    assert!(bus.lines().nth(1).unwrap().starts_with("1;3;70;"));

    // solar is folded into demand, only the nuclear unit remains
    let gen = fs::read_to_string(case.join("generator_data.csv")).unwrap();
    assert_eq!(gen.lines().count(), 2);
}

#[test]
fn full_dispatch_writes_per_snapshot_generator_tables() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");

    gridcase()
        .arg(&input)
        .args(["--output", output.to_str().unwrap(), "--full-dispatch"])
        .assert()
        .success();

    let case = output.join("network");
    assert!(!case.join("generator_data.csv").exists());
    let gen =
        fs::read_to_string(case.join("series/generator_data_2013-01-01_00.csv")).unwrap();
    // nuclear plus the solar unit
    assert_eq!(gen.lines().count(), 3);
}

#[test]
fn cost_file_flag_moves_coefficients() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");

    gridcase()
        .arg(&input)
        .args(["--output", output.to_str().unwrap(), "--cost-file"])
        .assert()
        .success();

    let case = output.join("network");
    let cost = fs::read_to_string(case.join("cost_data.csv")).unwrap();
    assert_eq!(
        cost.lines().next().unwrap(),
        "model;startup;shutdown;n;c2;c1;c0"
    );
    assert_eq!(cost.lines().nth(1).unwrap(), "2;1000;0;3;0.02;30;0");

    let gen = fs::read_to_string(case.join("generator_data.csv")).unwrap();
    assert!(gen.lines().next().unwrap().ends_with("apf"));
}

#[test]
fn config_file_with_flag_override() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");
    let config = tmp.path().join("gridcase.toml");
    fs::write(&config, "max-angle = 45.0\nrate-b-factor = 1.5\n").unwrap();

    gridcase()
        .arg(&input)
        .args([
            "--output",
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--max-angle",
            "60",
        ])
        .assert()
        .success();

    let line = fs::read_to_string(output.join("network/line_data.csv")).unwrap();
    let row = line.lines().nth(1).unwrap();
    // rateB from the file (800 * 1.5), angle limit from the flag
    assert!(row.contains(";1200;"));
    assert!(row.ends_with(";-60;60"));
}

#[test]
fn diagnostics_json_dump() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");
    let dump = tmp.path().join("diagnostics.json");

    gridcase()
        .arg(&input)
        .args([
            "--output",
            output.to_str().unwrap(),
            "--diagnostics-json",
            dump.to_str().unwrap(),
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dump).unwrap()).unwrap();
    let issues = json["issues"].as_array().unwrap();
    // discarded ES0 island and absent optional inputs are reported
    assert!(!issues.is_empty());
    assert!(issues
        .iter()
        .all(|i| i["severity"] == "warning" || i["severity"] == "error"));
}

#[test]
fn rerun_is_byte_identical() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("network");
    fs::create_dir(&input).unwrap();
    write_network(&input);
    let output = tmp.path().join("out");

    gridcase()
        .arg(&input)
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();
    let first = fs::read_to_string(output.join("network/generator_data.csv")).unwrap();

    gridcase()
        .arg(&input)
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();
    let second = fs::read_to_string(output.join("network/generator_data.csv")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_input_folder_fails() {
    let tmp = tempdir().unwrap();
    gridcase()
        .arg(tmp.path().join("nowhere"))
        .args(["--output", tmp.path().join("out").to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("conversion failed"));
}
