use std::sync::Arc;

use crate::alignment::{best_alignment, Alignment, Deadline, SearchBudget};
use crate::config::{alpha_in_range, MeteorConfig};
use crate::error::{MeteorError, ScoreError};
use crate::lexicon::{default_resources, LexicalResources};
use crate::mapping::CandidateMapping;
use crate::matchers::Matcher;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorScore {
    /// Translation words aligned to a reference word.
    pub matched: usize,
    pub precision: f64,
    pub recall: f64,
    pub fmean: f64,
}

/// Weighted harmonic mean `P·R / (α·P + (1−α)·R)`; `None` when the
/// denominator vanishes.
pub fn fmean(precision: f64, recall: f64, alpha: f64) -> Option<f64> {
    let denominator = alpha * precision + (1.0 - alpha) * recall;
    if denominator == 0.0 {
        return None;
    }
    Some(precision * recall / denominator)
}

pub fn score_alignment(
    translation: &[String],
    reference: &[String],
    alignment: &Alignment<'_>,
    alpha: f64,
) -> Result<MeteorScore, ScoreError> {
    if translation.is_empty() {
        return Err(ScoreError::EmptyTranslation);
    }
    if reference.is_empty() {
        return Err(ScoreError::EmptyReference);
    }

    let matched = alignment.cardinality();
    let precision = matched as f64 / translation.len() as f64;
    let recall = matched as f64 / reference.len() as f64;

    let fmean = fmean(precision, recall, alpha).ok_or(ScoreError::Undefined {
        translation_len: translation.len(),
        reference_len: reference.len(),
    })?;

    Ok(MeteorScore {
        matched,
        precision,
        recall,
        fmean,
    })
}

/// Scoring engine: configuration plus the shared lexical resources.
#[derive(Clone)]
pub struct Meteor {
    config: MeteorConfig,
    resources: Arc<LexicalResources>,
}

impl Meteor {
    /// Engine backed by the process-wide default resources.
    pub fn new(config: MeteorConfig) -> Result<Self, MeteorError> {
        Self::with_resources(config, default_resources())
    }

    pub fn with_resources(
        config: MeteorConfig,
        resources: Arc<LexicalResources>,
    ) -> Result<Self, MeteorError> {
        config.validate()?;
        Ok(Self { config, resources })
    }

    pub fn config(&self) -> &MeteorConfig {
        &self.config
    }

    /// Aligns and scores one pair. The configured `pair_timeout` is measured
    /// from this call, so time spent waiting for a worker does not count.
    pub fn evaluate(
        &self,
        translation: &[String],
        reference: &[String],
    ) -> Result<MeteorScore, ScoreError> {
        if translation.is_empty() {
            return Err(ScoreError::EmptyTranslation);
        }
        if reference.is_empty() {
            return Err(ScoreError::EmptyReference);
        }

        let matcher = Matcher::new(&self.resources, self.config.ascii_only);
        let mapping = CandidateMapping::build(translation, reference, &matcher);
        let budget = self
            .config
            .search_budget
            .with_deadline(self.config.pair_timeout.and_then(Deadline::after));
        let alignment = best_alignment(translation, reference, &mapping, budget)?;
        score_alignment(translation, reference, &alignment, self.config.alpha)
    }

    /// Fmean of `translation` against `reference`.
    pub fn score(&self, translation: &[String], reference: &[String]) -> Result<f64, ScoreError> {
        self.evaluate(translation, reference).map(|s| s.fmean)
    }
}

/// Fmean with the default lexical resources and an unbounded search.
pub fn score(translation: &[String], reference: &[String], alpha: f64) -> Result<f64, ScoreError> {
    if !alpha_in_range(alpha) {
        return Err(ScoreError::InvalidAlpha { alpha });
    }
    let config = MeteorConfig {
        search_budget: SearchBudget::unbounded(),
        ..MeteorConfig::with_alpha(alpha)
    };
    let meteor = Meteor {
        config,
        resources: default_resources(),
    };
    meteor.score(translation, reference)
}
