use std::time::Duration;

use crate::alignment::SearchBudget;
use crate::error::MeteorError;

#[derive(Debug, Clone)]
pub struct MeteorConfig {
    /// Weight of precision in the Fmean denominator, in (0, 1).
    pub alpha: f64,
    /// Reserved for the fragmentation penalty; carried but not used in scoring.
    pub beta: f64,
    /// Reserved for the fragmentation penalty; carried but not used in scoring.
    pub gamma: f64,
    /// Restrict stem and synonym matching to pure-ASCII words.
    pub ascii_only: bool,
    pub search_budget: SearchBudget,
    /// Wall-clock budget per scored pair, measured from the start of its search.
    pub pair_timeout: Option<Duration>,
}

impl MeteorConfig {
    pub const DEFAULT_ALPHA: f64 = 0.8;
    pub const DEFAULT_BETA: f64 = 0.8;
    pub const DEFAULT_GAMMA: f64 = 0.3;
    pub const DEFAULT_MAX_SEARCH_NODES: usize = 2_000_000;

    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MeteorError> {
        if !alpha_in_range(self.alpha) {
            return Err(MeteorError::invalid_config(format!(
                "alpha must lie strictly between 0 and 1, got {}",
                self.alpha
            )));
        }
        if !(self.beta >= 0.0) {
            return Err(MeteorError::invalid_config(format!(
                "beta must be non-negative, got {}",
                self.beta
            )));
        }
        if !(self.gamma >= 0.0) {
            return Err(MeteorError::invalid_config(format!(
                "gamma must be non-negative, got {}",
                self.gamma
            )));
        }
        if self.search_budget.max_nodes == Some(0) {
            return Err(MeteorError::invalid_config(
                "search budget must allow at least one node",
            ));
        }
        Ok(())
    }
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            beta: Self::DEFAULT_BETA,
            gamma: Self::DEFAULT_GAMMA,
            ascii_only: true,
            search_budget: SearchBudget::limited(Self::DEFAULT_MAX_SEARCH_NODES),
            pair_timeout: None,
        }
    }
}

pub(crate) fn alpha_in_range(alpha: f64) -> bool {
    alpha > 0.0 && alpha < 1.0
}
