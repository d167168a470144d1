//! Defaults used when translating SBML documents and solving them.

/// Defaults for model loading and flux analysis.
///
/// # Example
/// ```
/// use diel_qy::configuration::Configuration;
///
/// let config = Configuration {
///     tolerance: 1e-9,
///     ..Configuration::default()
/// };
/// assert_eq!(config.upper_bound, 1000.);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Lower flux bound for reactions without `fbc:lowerFluxBound` nor `cobra_default_lb`
    pub lower_bound: f64,
    /// Upper flux bound for reactions without `fbc:upperFluxBound` nor `cobra_default_ub`
    pub upper_bound: f64,
    /// Slack allowed on the fixed objective during the parsimonious step
    pub tolerance: f64,
    /// Clip the `R_` and `M_` prefixes from SBML identifiers
    pub strip_prefixes: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-7,
            strip_prefixes: true,
        }
    }
}
