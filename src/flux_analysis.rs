//! COBRA methods that take a [`ModelLp`] and a Solver
use crate::configuration::Configuration;
use crate::model::{ModelLp, ObjectiveSense};
use custom_error::custom_error;
use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    Solver, SolverModel, Variable,
};
use log::{debug, info};

use std::collections::{BTreeMap, HashMap};

custom_error! {
    /// Error raised while optimizing a model or reading its fluxes
    pub FluxError
    /// When a flux is requested for a reaction that is not in the solution
    MissingReaction{/// reaction id
        id: String} = "no flux was computed for reaction {id}",
    /// When the model has no objective to optimize
    NoObjective = "the model has no objective reaction",
    /// When the objective points to a reaction that is not in the model
    UnknownObjective{/// reaction id
        id: String} = "objective reaction {id} is not part of the model",
    /// When no flux distribution satisfies the constraints
    Infeasible = "the optimization problem is infeasible",
    /// When the objective can grow without limit
    Unbounded = "the optimization problem is unbounded",
    /// Any other failure reported by the solver
    Solver{/// message from the solver
        reason: String} = "the solver failed: {reason}"
}

impl From<ResolutionError> for FluxError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => FluxError::Infeasible,
            ResolutionError::Unbounded => FluxError::Unbounded,
            other => FluxError::Solver {
                reason: other.to_string(),
            },
        }
    }
}

/// Net flux of every reaction in a solved model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxMap {
    fluxes: HashMap<String, f64>,
    objective_value: Option<f64>,
}

impl FluxMap {
    /// Flux through `reaction_id`, failing if the reaction is absent.
    pub fn get(&self, reaction_id: &str) -> Result<f64, FluxError> {
        self.fluxes
            .get(reaction_id)
            .copied()
            .ok_or_else(|| FluxError::MissingReaction {
                id: reaction_id.to_owned(),
            })
    }

    /// Value of the objective at the solution, if the map comes from a solve.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Number of reactions in the map
    pub fn len(&self) -> usize {
        self.fluxes.len()
    }

    /// Whether the map holds no flux
    pub fn is_empty(&self) -> bool {
        self.fluxes.is_empty()
    }

    /// Iterate over `(reaction id, flux)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.fluxes.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FluxMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        FluxMap {
            fluxes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            objective_value: None,
        }
    }
}

/// Every reaction split into a forward and a reverse non-negative variable.
struct Formulation {
    problem: ProblemVariables,
    fluxes: BTreeMap<String, (Variable, Variable)>,
}

impl Formulation {
    fn new(model: &ModelLp) -> Self {
        let mut problem = ProblemVariables::new();
        let mut reactions: Vec<_> = model.reactions.iter().collect();
        reactions.sort_by(|a, b| a.0.cmp(b.0));
        let fluxes = reactions
            .into_iter()
            .map(|(id, reaction)| {
                let (f_lb, f_ub) = reaction.forward_bounds();
                let (r_lb, r_ub) = reaction.reverse_bounds();
                let forward = problem.add(variable().min(f_lb).max(f_ub));
                let reverse = problem.add(variable().min(r_lb).max(r_ub));
                (id.to_owned(), (forward, reverse))
            })
            .collect();
        Formulation { problem, fluxes }
    }

    fn net(&self, reaction_id: &str) -> Option<Expression> {
        self.fluxes
            .get(reaction_id)
            .map(|(forward, reverse)| Expression::from(*forward) - Expression::from(*reverse))
    }

    fn objective(&self, model: &ModelLp) -> Result<Expression, FluxError> {
        if model.objective.is_empty() {
            return Err(FluxError::NoObjective);
        }
        model
            .objective
            .iter()
            .map(|(id, coef)| {
                self.net(id)
                    .map(|expr| expr * *coef)
                    .ok_or_else(|| FluxError::UnknownObjective { id: id.to_owned() })
            })
            .sum()
    }

    /// Steady state: one $\sum_j S_{ij} v_j = 0$ row per metabolite.
    fn mass_balance(&self, model: &ModelLp) -> Vec<Constraint> {
        let mut stoichiometry = BTreeMap::<&str, Vec<Expression>>::new();
        for reac_id in self.fluxes.keys() {
            let (reaction, net) = match (model.reactions.get(reac_id), self.net(reac_id)) {
                (Some(reaction), Some(net)) => (reaction, net),
                _ => continue,
            };
            for (met_id, coef) in reaction.metabolites.iter() {
                stoichiometry
                    .entry(met_id.as_str())
                    .or_insert_with(Vec::new)
                    .push(net.clone() * *coef);
            }
        }
        stoichiometry
            .into_values()
            .map(|terms| constraint::eq(terms.into_iter().sum::<Expression>(), 0.))
            .collect()
    }

    fn total_flux(&self) -> Expression {
        self.fluxes
            .values()
            .map(|(forward, reverse)| Expression::from(*forward) + Expression::from(*reverse))
            .sum()
    }

    fn solve<S: Solver>(
        self,
        objective: Expression,
        sense: ObjectiveSense,
        constraints: Vec<Constraint>,
        solver: S,
    ) -> Result<HashMap<String, f64>, FluxError>
    where
        FluxError: From<<S::Model as SolverModel>::Error>,
    {
        let Formulation { problem, fluxes } = self;
        let unsolved = match sense {
            ObjectiveSense::Maximize => problem.maximise(objective),
            ObjectiveSense::Minimize => problem.minimise(objective),
        };
        let solution = constraints
            .into_iter()
            .fold(unsolved.using(solver), |lp, cons| lp.with(cons))
            .solve()?;
        Ok(fluxes
            .into_iter()
            .map(|(id, (forward, reverse))| {
                (id, solution.value(forward) - solution.value(reverse))
            })
            .collect())
    }
}

fn evaluate_objective(model: &ModelLp, fluxes: &HashMap<String, f64>) -> f64 {
    model
        .objective
        .iter()
        .map(|(id, coef)| coef * fluxes.get(id).copied().unwrap_or(0.))
        .sum()
}

/// Optimize the model according to Flux Balance Analysis (FBA).
/// FBA: [https://pubmed.ncbi.nlm.nih.gov/20212490/](https://pubmed.ncbi.nlm.nih.gov/20212490/)
///
/// # Example
/// ```
/// use diel_qy::{flux_analysis::fba, ModelLp};
/// use good_lp::default_solver;
/// use std::str::FromStr;
///
/// let model = ModelLp::from_str(include_str!("../tests/data/non_diel_toy.xml")).unwrap();
/// let fluxes = fba(&model, default_solver).unwrap();
/// println!("{:?}", fluxes.objective_value());
/// ```
pub fn fba<S: Solver>(model: &ModelLp, solver: S) -> Result<FluxMap, FluxError>
where
    FluxError: From<<S::Model as SolverModel>::Error>,
{
    let formulation = Formulation::new(model);
    let objective = formulation.objective(model)?;
    let constraints = formulation.mass_balance(model);
    let fluxes = formulation.solve(objective, model.sense, constraints, solver)?;
    let objective_value = evaluate_objective(model, &fluxes);
    debug!("{}: FBA objective value {}", model.id, objective_value);
    Ok(FluxMap {
        fluxes,
        objective_value: Some(objective_value),
    })
}

/// Parsimonious FBA: among the optimal flux distributions, the one with the
/// smallest total absolute flux.
///
/// See: [Lewis et al., 2010](https://doi.org/10.1038/msb.2010.47)
///
/// The objective is first optimized with [`fba`]; a second problem then fixes
/// it at that optimum (within [`Configuration::tolerance`]) and minimizes
/// $\sum_j |v_j|$.
pub fn pfba<S: Solver + Copy>(
    model: &ModelLp,
    solver: S,
    config: &Configuration,
) -> Result<FluxMap, FluxError>
where
    FluxError: From<<S::Model as SolverModel>::Error>,
{
    let optimum = fba(model, solver)?
        .objective_value()
        .ok_or(FluxError::NoObjective)?;

    let formulation = Formulation::new(model);
    let objective = formulation.objective(model)?;
    let mut constraints = formulation.mass_balance(model);
    constraints.push(match model.sense {
        ObjectiveSense::Maximize => constraint::geq(objective, optimum - config.tolerance),
        ObjectiveSense::Minimize => constraint::leq(objective, optimum + config.tolerance),
    });
    debug!(
        "{}: minimizing total flux over {} reactions, {} constraints",
        model.id,
        formulation.fluxes.len(),
        constraints.len()
    );
    let total = formulation.total_flux();
    let fluxes = formulation.solve(total, ObjectiveSense::Minimize, constraints, solver)?;
    let objective_value = evaluate_objective(model, &fluxes);
    info!(
        "{}: pFBA objective value {} (FBA optimum {})",
        model.id, objective_value, optimum
    );
    Ok(FluxMap {
        fluxes,
        objective_value: Some(objective_value),
    })
}
