//! Structs for the formulation of the LP problem from the SBML model
use crate::configuration::Configuration;
use custom_error::custom_error;
use log::{debug, info};
use rust_sbml::{Model, Parameter, Reaction, Species, SpeciesReference};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const REACTION_PREFIX: &str = "R_";
const METABOLITE_PREFIX: &str = "M_";
const DEFAULT_LB_PARAMETER: &str = "cobra_default_lb";
const DEFAULT_UB_PARAMETER: &str = "cobra_default_ub";

custom_error! {
    /// Error for inconsistencies on the SBML document or on the edits requested on the model
    pub SBMLError
    /// When the document cannot be read from disk
    Io{/// path of the document
        path: String,
        /// underlying I/O error
        source: std::io::Error} = "could not read {path}: {source}",
    /// When the document is not valid SBML
    Parse{/// reason given by the parser
        reason: String} = "could not parse the SBML document: {reason}",
    /// When a reaction uses an unknown parameter
    InconsistentModel{/// parameter name
        param: String} = "reaction points to {param} but it does not exist in model.parameters",
    /// When a parameter.value is accessed but None
    EmptyParameter{/// parameter name
        param: String} = "the parameter {param} exists but it holds no value",
    /// When the model.objective is not in model.reactions
    InconsistentObjective{/// objective name
        obj: String} = "model.objective points to {obj}, which could not be found in the model.",
    /// When an edit refers to a reaction that the model does not have
    UnknownReaction{/// reaction id
        id: String} = "reaction {id} could not be found in the model",
    /// When the requested lower bound is greater than the upper bound
    InvalidBounds{/// reaction id
        id: String,
        /// requested lower bound
        lb: f64,
        /// requested upper bound
        ub: f64} = "cannot set the bounds of {id} to ({lb}, {ub}): lower bound is greater than upper bound"
}

/// Direction of the optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Find the largest value of the objective
    Maximize,
    /// Find the smallest value of the objective
    Minimize,
}

/// LP problem as a Flux Balance Analysis formulation.
///
/// See: [What is flux balance analysis?, Orth et al., 2010](https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3108565/)
///
/// Being $f(\overrightarrow{z})$ a function to optimize (historically, biomass or ATPase), $S$ and
/// stoichimetry matrix and $\overrightarrow{v}$ the flux vector representing the reactions in the reconstruction:
///
/// $$ \text{Max.} f(\overrightarrow{z}) \newline \text{subject to}\medspace S\overrightarrow{v} = 0 \newline \text{where}\medspace lb_j \le v_j \le ub_j $$
#[derive(Clone)]
pub struct ModelLp {
    /// Id from SBML document
    pub id: String,
    /// Name from SBML document
    pub name: String,
    /// Metabolites from the SBML document, keyed by their (clipped) id
    pub metabolites: HashMap<String, Species>,
    /// Reactions from the SBML document, keyed by their (clipped) id
    pub reactions: HashMap<String, ReactionLp>,
    /// Parameters from the SBML document
    pub config: HashMap<String, Parameter>,
    /// Reaction ids used as the objective in the LP problem, with their coefficients
    pub objective: HashMap<String, f64>,
    /// Direction in which the objective is optimized
    pub sense: ObjectiveSense,
}

/// Reaction struct translated from a SBML Reaction for ease of use.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactionLp {
    /// Identifier of the reaction
    pub id: String,
    /// lower bound of the reaction
    pub lb: f64,
    /// upper bound of the reaction
    pub ub: f64,
    /// Stoichiometric coefficient of each metabolite; reactants are negative
    pub metabolites: HashMap<String, f64>,
}

impl ReactionLp {
    fn from_reaction(
        reaction: Reaction,
        parameters: &HashMap<String, Parameter>,
        config: &Configuration,
    ) -> Result<ReactionLp, SBMLError> {
        let lb = resolve_bound(
            reaction.lower_bound.as_deref(),
            DEFAULT_LB_PARAMETER,
            config.lower_bound,
            parameters,
        )?;
        let ub = resolve_bound(
            reaction.upper_bound.as_deref(),
            DEFAULT_UB_PARAMETER,
            config.upper_bound,
            parameters,
        )?;
        let mut metabolites = HashMap::new();
        add_species(
            &mut metabolites,
            &reaction.list_of_reactants.species_references,
            -1.,
            config,
        );
        add_species(
            &mut metabolites,
            &reaction.list_of_products.species_references,
            1.,
            config,
        );
        Ok(ReactionLp {
            id: clip(&reaction.id, REACTION_PREFIX, config),
            lb,
            ub,
            metabolites,
        })
    }

    /// Bounds of the variable carrying the forward part of the flux.
    pub(crate) fn forward_bounds(&self) -> (f64, f64) {
        (self.lb.max(0.), self.ub.max(0.))
    }

    /// Bounds of the variable carrying the reverse part of the flux.
    pub(crate) fn reverse_bounds(&self) -> (f64, f64) {
        ((-self.ub).max(0.), (-self.lb).max(0.))
    }
}

fn resolve_bound(
    reference: Option<&str>,
    default_parameter: &str,
    fallback: f64,
    parameters: &HashMap<String, Parameter>,
) -> Result<f64, SBMLError> {
    match reference {
        Some(s) => parameters
            .get(s)
            .ok_or(SBMLError::InconsistentModel {
                param: s.to_owned(),
            })?
            .value
            .ok_or(SBMLError::EmptyParameter {
                param: s.to_owned(),
            }),
        _ => match parameters.get(default_parameter) {
            Some(param) => param.value.ok_or(SBMLError::EmptyParameter {
                param: default_parameter.to_owned(),
            }),
            _ => Ok(fallback),
        },
    }
}

fn add_species(
    metabolites: &mut HashMap<String, f64>,
    references: &[SpeciesReference],
    direction: f64,
    config: &Configuration,
) {
    for sref in references {
        let coefficient = direction * sref.stoichiometry.unwrap_or(1.);
        *metabolites
            .entry(clip(&sref.species, METABOLITE_PREFIX, config))
            .or_insert(0.) += coefficient;
    }
}

fn clip(id: &str, prefix: &str, config: &Configuration) -> String {
    if config.strip_prefixes {
        id.strip_prefix(prefix).unwrap_or(id).to_owned()
    } else {
        id.to_owned()
    }
}

impl ModelLp {
    /// Translate a parsed SBML model.
    ///
    /// Reaction and metabolite ids are clipped of their `R_`/`M_` prefixes when
    /// [`Configuration::strip_prefixes`] is set.
    ///
    /// `rust_sbml` only exposes the reaction ids of the flux objectives, so every
    /// declared objective is read as a maximization with coefficient 1, whatever its
    /// `fbc:type` and `fbc:coefficient`. Call [`ModelLp::set_objective`] to minimize.
    pub fn new(input_sbml: Model, config: &Configuration) -> Result<Self, SBMLError> {
        let parameters = input_sbml.parameters;
        let reactions = input_sbml
            .reactions
            .into_values()
            .map(|reaction| {
                ReactionLp::from_reaction(reaction, &parameters, config)
                    .map(|reac| (reac.id.to_owned(), reac))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        let metabolites = input_sbml
            .species
            .into_iter()
            .map(|(id, species)| (clip(&id, METABOLITE_PREFIX, config), species))
            .collect();
        let objective = input_sbml
            .objectives
            .unwrap_or_default()
            .iter()
            .map(|id| (clip(id, REACTION_PREFIX, config), 1.))
            .collect::<HashMap<String, f64>>();
        if let Some(obj) = objective.keys().find(|id| !reactions.contains_key(*id)) {
            return Err(SBMLError::InconsistentObjective {
                obj: obj.to_owned(),
            });
        }

        Ok(ModelLp {
            id: input_sbml.id.unwrap_or_default(),
            name: input_sbml.name.unwrap_or_default(),
            metabolites,
            reactions,
            config: parameters,
            objective,
            sense: ObjectiveSense::Maximize,
        })
    }

    /// Parse a SBML document held in memory.
    ///
    /// # Example
    /// ```
    /// use diel_qy::{configuration::Configuration, ModelLp};
    ///
    /// let contents = include_str!("../tests/data/non_diel_toy.xml");
    /// let model = ModelLp::from_sbml_str(contents, &Configuration::default()).unwrap();
    /// assert!(model.reactions.contains_key("EX_photon_h"));
    /// ```
    pub fn from_sbml_str(input_sbml: &str, config: &Configuration) -> Result<Self, SBMLError> {
        let document = Model::parse(input_sbml).map_err(|e| SBMLError::Parse {
            reason: e.to_string(),
        })?;
        Self::new(document, config)
    }

    /// Read and translate the SBML document at `path`.
    pub fn load<P: AsRef<Path>>(path: P, config: &Configuration) -> Result<Self, SBMLError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SBMLError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_sbml_str(&contents, config)?;
        info!(
            "loaded model '{}' from {}: {} reactions, {} metabolites",
            model.id,
            path.display(),
            model.reactions.len(),
            model.metabolites.len()
        );
        Ok(model)
    }

    /// Get a reaction by id
    pub fn reaction(&self, id: &str) -> Result<&ReactionLp, SBMLError> {
        self.reactions
            .get(id)
            .ok_or_else(|| SBMLError::UnknownReaction { id: id.to_owned() })
    }

    fn reaction_mut(&mut self, id: &str) -> Result<&mut ReactionLp, SBMLError> {
        self.reactions
            .get_mut(id)
            .ok_or_else(|| SBMLError::UnknownReaction { id: id.to_owned() })
    }

    /// Make `reaction_id` the only term of the objective and optimize it in `sense`.
    pub fn set_objective(
        &mut self,
        reaction_id: &str,
        sense: ObjectiveSense,
    ) -> Result<(), SBMLError> {
        self.reaction(reaction_id)?;
        self.objective = HashMap::from([(reaction_id.to_owned(), 1.)]);
        self.sense = sense;
        debug!("{}: objective set to {:?} {}", self.id, sense, reaction_id);
        Ok(())
    }

    /// Replace both flux bounds of a reaction.
    pub fn set_bounds(&mut self, reaction_id: &str, lb: f64, ub: f64) -> Result<(), SBMLError> {
        if lb > ub {
            return Err(SBMLError::InvalidBounds {
                id: reaction_id.to_owned(),
                lb,
                ub,
            });
        }
        let model_id = self.id.to_owned();
        let reaction = self.reaction_mut(reaction_id)?;
        reaction.lb = lb;
        reaction.ub = ub;
        debug!("{}: bounds of {} set to ({}, {})", model_id, reaction_id, lb, ub);
        Ok(())
    }
}

impl FromStr for ModelLp {
    type Err = SBMLError;

    fn from_str(input_sbml: &str) -> Result<Self, SBMLError> {
        Self::from_sbml_str(input_sbml, &Configuration::default())
    }
}
