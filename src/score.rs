use std::sync::Arc;

use crate::corpus::Triple;
use crate::error::ScoreError;
use crate::meteor::{Meteor, MeteorScore};
use crate::utils::Sequence;

pub type PairResult = Result<MeteorScore, ScoreError>;

/// Which of two hypotheses scored higher against the shared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    First,
    Tie,
    Second,
}

impl Preference {
    pub fn as_i8(self) -> i8 {
        match self {
            Preference::First => 1,
            Preference::Tie => 0,
            Preference::Second => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripleOutcome {
    pub first: PairResult,
    pub second: PairResult,
}

impl TripleOutcome {
    /// Compares Fmean; a hypothesis without a score ranks as 0.0.
    pub fn preference(&self) -> Preference {
        let first = fmean_or_zero(&self.first);
        let second = fmean_or_zero(&self.second);
        if first > second {
            Preference::First
        } else if first < second {
            Preference::Second
        } else {
            Preference::Tie
        }
    }
}

fn fmean_or_zero(result: &PairResult) -> f64 {
    result.as_ref().map(|s| s.fmean).unwrap_or(0.0)
}

/// Scores one pair on the blocking pool. The search itself enforces the
/// configured time budget once the worker picks the pair up.
pub async fn score_pair(meteor: Arc<Meteor>, pred: Sequence, gold: Sequence) -> PairResult {
    tokio::task::spawn_blocking(move || meteor.evaluate(&pred.word_vector, &gold.word_vector))
        .await
        .unwrap_or_else(|e| Err(ScoreError::worker(e)))
}

/// Scores both hypotheses of every triple concurrently. Outcomes keep input order.
pub async fn score_triples(meteor: Arc<Meteor>, triples: Vec<Triple>) -> Vec<TripleOutcome> {
    let tasks = triples.into_iter().map(|triple| {
        let meteor = Arc::clone(&meteor);
        async move {
            let (first, second) = tokio::join!(
                score_pair(Arc::clone(&meteor), triple.first, triple.reference.clone()),
                score_pair(meteor, triple.second, triple.reference),
            );
            TripleOutcome { first, second }
        }
    });
    futures::future::join_all(tasks).await
}

/// Scores `preds[i]` against `golds[i]`; the shorter input bounds the batch.
pub async fn score_batch(
    meteor: Arc<Meteor>,
    pred_batch: Vec<String>,
    gold_batch: Vec<String>,
) -> Vec<PairResult> {
    let zipped_contents = pred_batch.into_iter().zip(gold_batch);
    let tasks = zipped_contents.map(|(pred, gold)| {
        score_pair(
            Arc::clone(&meteor),
            Sequence::new(pred.as_str()),
            Sequence::new(gold.as_str()),
        )
    });
    futures::future::join_all(tasks).await
}
