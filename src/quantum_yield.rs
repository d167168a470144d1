//! Quantum yield of a non-diel and a diel model.
//!
//! Each [`ModelVariant`] carries the literals needed to set up one model: which
//! reaction to optimize, which reaction to pin and where, and which fluxes the
//! ratio is read from. [`run`] chains load, configuration, [`solve_pair`] and the
//! ratios into a [`QuantumYieldTable`].
use crate::configuration::Configuration;
use crate::flux_analysis::{pfba, FluxError, FluxMap};
use crate::model::{ModelLp, ObjectiveSense, SBMLError};
use crate::table::QuantumYieldTable;
use good_lp::{Solver, SolverModel};
use log::{debug, info, warn};

use std::error::Error;
use std::path::PathBuf;

/// Header of the single column of the result table
pub const QUANTUM_YIELD_COLUMN: &str = "Quantum Yield";
/// File the result table is written to
pub const OUTPUT_FILE: &str = "QY_Tomato22.csv";
/// Flux pinned on the biomass reaction of both models
pub const FIXED_BIOMASS_FLUX: f64 = 0.11;

const NON_DIEL_MODEL_PATH: &str = "../../../examples/models/tomato_Sl2183.xml";
const DIEL_MODEL_PATH: &str = "../../../examples/models/diel_tomato2022_model_wo_nitrate.xml";

/// Everything needed to set up one model and read its quantum yield.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelVariant {
    /// Row label in the result table
    pub label: String,
    /// SBML document of the model
    pub path: PathBuf,
    /// Reaction made the objective
    pub objective: String,
    /// Direction of the optimization
    pub sense: ObjectiveSense,
    /// Reaction whose bounds are pinned
    pub fixed_reaction: String,
    /// `(lower, upper)` bounds given to `fixed_reaction`
    pub fixed_bounds: (f64, f64),
    /// Carbon fixation reaction, numerator of the ratio
    pub carbon_fixation: String,
    /// Photon exchange reaction, negated denominator of the ratio
    pub photon_exchange: String,
}

impl ModelVariant {
    /// Steady-state tomato model.
    pub fn non_diel() -> Self {
        ModelVariant {
            label: String::from("Original Model"),
            path: PathBuf::from(NON_DIEL_MODEL_PATH),
            objective: String::from("EX_photon_h"),
            sense: ObjectiveSense::Maximize,
            fixed_reaction: String::from("BIOMASS_STEM"),
            fixed_bounds: (FIXED_BIOMASS_FLUX, FIXED_BIOMASS_FLUX),
            carbon_fixation: String::from("RBPCh"),
            photon_exchange: String::from("EX_photon_h"),
        }
    }

    /// Day/night tomato model.
    pub fn diel() -> Self {
        ModelVariant {
            label: String::from("Created Diel Model"),
            path: PathBuf::from(DIEL_MODEL_PATH),
            objective: String::from("EX_photon_h_Day"),
            sense: ObjectiveSense::Maximize,
            fixed_reaction: String::from("Biomass_Total"),
            fixed_bounds: (FIXED_BIOMASS_FLUX, FIXED_BIOMASS_FLUX),
            carbon_fixation: String::from("RBPCh_Day"),
            photon_exchange: String::from("EX_photon_h_Day"),
        }
    }

    /// Read the SBML document of this variant.
    pub fn load(&self, config: &Configuration) -> Result<ModelLp, SBMLError> {
        ModelLp::load(&self.path, config)
    }

    /// Set the objective, its direction and the pinned bounds on `model`.
    pub fn configure(&self, model: &mut ModelLp) -> Result<(), SBMLError> {
        model.set_objective(&self.objective, self.sense)?;
        let (lb, ub) = self.fixed_bounds;
        model.set_bounds(&self.fixed_reaction, lb, ub)
    }

    /// Quantum yield read from a solution of this variant.
    pub fn quantum_yield(&self, fluxes: &FluxMap) -> Result<f64, FluxError> {
        quantum_yield(fluxes, &self.carbon_fixation, &self.photon_exchange)
    }
}

/// `carbon_fixation / -photon_exchange`; photon uptake is a negative exchange flux.
///
/// # Example
/// ```
/// use diel_qy::{flux_analysis::FluxMap, quantum_yield::quantum_yield};
///
/// let fluxes: FluxMap = vec![("RBPCh", 10.), ("EX_photon_h", -20.)].into_iter().collect();
/// assert_eq!(quantum_yield(&fluxes, "RBPCh", "EX_photon_h").unwrap(), 0.5);
/// ```
pub fn quantum_yield(
    fluxes: &FluxMap,
    carbon_fixation: &str,
    photon_exchange: &str,
) -> Result<f64, FluxError> {
    let carbon = fluxes.get(carbon_fixation)?;
    let photons = fluxes.get(photon_exchange)?;
    if photons == 0. {
        warn!(
            "{} carries no flux, quantum yield is not finite",
            photon_exchange
        );
    }
    Ok(carbon / -photons)
}

/// Run pFBA on both models, non-diel first, and hand back their fluxes untouched.
pub fn solve_pair<S: Solver + Copy>(
    non_diel: &ModelLp,
    diel: &ModelLp,
    solver: S,
    config: &Configuration,
) -> Result<(FluxMap, FluxMap), FluxError>
where
    FluxError: From<<S::Model as SolverModel>::Error>,
{
    let non_diel_fluxes = pfba(non_diel, solver, config)?;
    let diel_fluxes = pfba(diel, solver, config)?;
    Ok((non_diel_fluxes, diel_fluxes))
}

/// The two models compared by a run and where their table goes.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumYieldSetup {
    /// Steady-state model, first row
    pub non_diel: ModelVariant,
    /// Day/night model, second row
    pub diel: ModelVariant,
    /// CSV file the table is written to
    pub output: PathBuf,
}

impl Default for QuantumYieldSetup {
    fn default() -> Self {
        QuantumYieldSetup {
            non_diel: ModelVariant::non_diel(),
            diel: ModelVariant::diel(),
            output: PathBuf::from(OUTPUT_FILE),
        }
    }
}

/// Load, configure and solve both models and tabulate their quantum yields.
///
/// Nothing is written here; the caller exports the table once every step succeeded.
pub fn run<S: Solver + Copy>(
    setup: &QuantumYieldSetup,
    config: &Configuration,
    solver: S,
) -> Result<QuantumYieldTable, Box<dyn Error>>
where
    FluxError: From<<S::Model as SolverModel>::Error>,
{
    let mut non_diel = setup.non_diel.load(config)?;
    let mut diel = setup.diel.load(config)?;
    setup.non_diel.configure(&mut non_diel)?;
    setup.diel.configure(&mut diel)?;

    let (non_diel_fluxes, diel_fluxes) = solve_pair(&non_diel, &diel, solver, config)?;

    let mut table = QuantumYieldTable::new(QUANTUM_YIELD_COLUMN);
    for (variant, fluxes) in [
        (&setup.non_diel, &non_diel_fluxes),
        (&setup.diel, &diel_fluxes),
    ] {
        let mut active: Vec<_> = fluxes
            .iter()
            .filter(|(_, flux)| flux.abs() > config.tolerance)
            .collect();
        active.sort_by(|a, b| a.0.cmp(b.0));
        debug!("{}: {} active reactions {:?}", variant.label, active.len(), active);
        let value = variant.quantum_yield(fluxes)?;
        info!(
            "{}: {} = {} (objective {:?})",
            variant.label,
            QUANTUM_YIELD_COLUMN,
            value,
            fluxes.objective_value()
        );
        table.push(&variant.label, value);
    }
    Ok(table)
}
