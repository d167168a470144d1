#![deny(unsafe_code)]
#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![warn(missing_docs)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_qualifications)]

//! Quantum yield of plant metabolic models with parsimonious Flux Balance Analysis.
//! It uses [rust_sbml](https://docs.rs/rust_sbml/) to read a
//! [SBML](http://sbml.org/Special/specifications/sbml-level-3/version-2/core/release-2/sbml-level-3-version-2-release-2-core.pdf)
//! document and translates it into a LP formulation solved with [good_lp](https://docs.rs/good_lp/).
//!
//! # COBRA methods available
//!
//! * [Flux Balance Analysis](https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3108565/).
//! * [Parsimonious Flux Balance Analysis](https://doi.org/10.1038/msb.2010.47).
//!
//! # Examples
//!
//! Fix the biomass of a model, maximize its photon exchange and read the quantum yield
//! ```
//! use diel_qy::{configuration::Configuration, flux_analysis::pfba, ModelLp, ObjectiveSense};
//! use diel_qy::quantum_yield::quantum_yield;
//! use good_lp::default_solver;
//! use std::str::FromStr;
//!
//! let mut model = ModelLp::from_str(include_str!("../tests/data/non_diel_toy.xml")).unwrap();
//! model.set_objective("EX_photon_h", ObjectiveSense::Maximize).unwrap();
//! model.set_bounds("BIOMASS_STEM", 0.11, 0.11).unwrap();
//! let fluxes = pfba(&model, default_solver, &Configuration::default()).unwrap();
//! println!("{}", quantum_yield(&fluxes, "RBPCh", "EX_photon_h").unwrap());
//! ```
//!
//! # Additional links
//!
//! * [rust_sbml](https://docs.rs/rust_sbml/): SBML parser in rust.
//! * [cobrapy](https://github.com/opencobra/cobrapy/): fully featured COBRA package written in Python.
pub mod configuration;
pub mod flux_analysis;
pub mod model;
pub mod quantum_yield;
pub mod table;

pub use flux_analysis::{fba, pfba, FluxMap};
pub use model::{ModelLp, ObjectiveSense, ReactionLp};
pub use table::QuantumYieldTable;
