extern crate diel_qy;

use approx::assert_abs_diff_eq;
use diel_qy::configuration::Configuration;
use diel_qy::flux_analysis::{pfba, FluxError};
use diel_qy::quantum_yield::{run, solve_pair, ModelVariant, QuantumYieldSetup};
use diel_qy::{ModelLp, QuantumYieldTable};
use good_lp::default_solver;
use std::path::PathBuf;
use std::str::FromStr;

const NON_DIEL: &str = include_str!("data/non_diel_toy.xml");
const DIEL: &str = include_str!("data/diel_toy.xml");

fn fixture(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
        .iter()
        .collect()
}

fn toy_setup(output: PathBuf) -> QuantumYieldSetup {
    QuantumYieldSetup {
        non_diel: ModelVariant {
            path: fixture("non_diel_toy.xml"),
            ..ModelVariant::non_diel()
        },
        diel: ModelVariant {
            path: fixture("diel_toy.xml"),
            ..ModelVariant::diel()
        },
        output,
    }
}

#[test]
fn read_toy_models() {
    ModelLp::from_str(NON_DIEL).unwrap();
    ModelLp::from_str(DIEL).unwrap();
}

#[test]
fn configured_models_solve() {
    let config = Configuration::default();
    let mut non_diel = ModelLp::from_str(NON_DIEL).unwrap();
    let mut diel = ModelLp::from_str(DIEL).unwrap();
    ModelVariant::non_diel().configure(&mut non_diel).unwrap();
    ModelVariant::diel().configure(&mut diel).unwrap();

    let (non_diel_fluxes, diel_fluxes) =
        solve_pair(&non_diel, &diel, default_solver, &config).unwrap();
    // 0.11 biomass * 10 carbons, 4 photons per carbon
    assert_abs_diff_eq!(non_diel_fluxes.get("RBPCh").unwrap(), 1.1, epsilon = 1e-6);
    assert_abs_diff_eq!(non_diel_fluxes.get("EX_photon_h").unwrap(), -4.4, epsilon = 1e-6);
    // 0.11 biomass * (6 day + 4 night) carbons, 5 photons per carbon
    assert_abs_diff_eq!(diel_fluxes.get("RBPCh_Day").unwrap(), 1.1, epsilon = 1e-6);
    assert_abs_diff_eq!(
        diel_fluxes.get("Transfer_Day_Night").unwrap(),
        0.44,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(diel_fluxes.get("EX_photon_h_Day").unwrap(), -5.5, epsilon = 1e-6);
}

#[test]
fn quantum_yield_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let setup = toy_setup(dir.path().join("QY_Tomato22.csv"));
    let table = run(&setup, &Configuration::default(), default_solver).unwrap();

    let labels: Vec<&str> = table.rows().iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, ["Original Model", "Created Diel Model"]);
    assert_eq!(table.column(), "Quantum Yield");
    assert_abs_diff_eq!(table.get("Original Model").unwrap(), 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(table.get("Created Diel Model").unwrap(), 0.2, epsilon = 1e-6);

    table.to_csv(&setup.output).unwrap();
    let read = QuantumYieldTable::from_csv(&setup.output).unwrap();
    assert_eq!(read.rows().len(), 2);
    for ((label, value), (read_label, read_value)) in table.rows().iter().zip(read.rows()) {
        assert_eq!(label, read_label);
        assert_abs_diff_eq!(*value, *read_value, epsilon = 1e-9);
    }
}

#[test]
fn repeated_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let setup = toy_setup(dir.path().join("QY_Tomato22.csv"));
    let config = Configuration::default();
    let first = run(&setup, &config, default_solver).unwrap();
    let second = run(&setup, &config, default_solver).unwrap();
    for ((_, a), (_, b)) in first.rows().iter().zip(second.rows()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn missing_photon_reaction_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut setup = toy_setup(dir.path().join("QY_Tomato22.csv"));
    setup.non_diel.photon_exchange = String::from("EX_photon_c");

    let err = run(&setup, &Configuration::default(), default_solver).unwrap_err();
    assert!(err.to_string().contains("EX_photon_c"));
    assert!(!setup.output.exists());
}

#[test]
fn missing_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut setup = toy_setup(dir.path().join("QY_Tomato22.csv"));
    setup.diel.path = dir.path().join("diel_tomato2022_model_wo_nitrate.xml");
    assert!(run(&setup, &Configuration::default(), default_solver).is_err());
    assert!(!setup.output.exists());
}

#[test]
fn infeasible_diel_model() {
    let mut diel = ModelLp::from_str(DIEL).unwrap();
    ModelVariant {
        fixed_bounds: (50., 50.),
        ..ModelVariant::diel()
    }
    .configure(&mut diel)
    .unwrap();
    assert!(matches!(
        pfba(&diel, default_solver, &Configuration::default()),
        Err(FluxError::Infeasible)
    ));
}
