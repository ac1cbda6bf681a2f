use std::io::Write;
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::corpus::Triple;
use crate::error::MeteorError;
use crate::meteor::Meteor;
use crate::score::{score_triples, PairResult, TripleOutcome};

pub const DEFAULT_BATCH_SIZE: usize = 100;
const PROGRESS_EVERY: usize = 100;

/// Per-run tally reported once the corpus is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    /// Triples read and compared.
    pub evaluated: usize,
    /// Hypotheses with no defined score (empty input or nothing aligned).
    pub undefined: usize,
    /// Hypotheses whose scoring failed (search truncated, timed out, worker error).
    pub failed: usize,
}

impl EvaluationSummary {
    fn record(&mut self, line: usize, outcome: &TripleOutcome) {
        self.evaluated += 1;
        for (hypothesis, result) in [(1, &outcome.first), (2, &outcome.second)] {
            self.record_pair(line, hypothesis, result);
        }
    }

    fn record_pair(&mut self, line: usize, hypothesis: u8, result: &PairResult) {
        match result {
            Ok(_) => {}
            Err(err) if err.is_undefined() => {
                self.undefined += 1;
                log::debug!("line {}, hypothesis {}: {}", line, hypothesis, err);
            }
            Err(err) => {
                self.failed += 1;
                log::warn!("line {}, hypothesis {}: {}", line, hypothesis, err);
            }
        }
    }
}

/// Scores up to `limit` triples and writes one preference (`1`, `0` or `-1`)
/// per line to `out`, in input order.
///
/// Triples are scored `batch_size` at a time on a multi-threaded runtime.
/// Per-hypothesis failures are counted and skipped; I/O errors and malformed
/// input lines abort the run.
pub fn evaluate_corpus<I, W>(
    meteor: Arc<Meteor>,
    triples: I,
    limit: Option<usize>,
    batch_size: usize,
    out: &mut W,
) -> Result<EvaluationSummary, MeteorError>
where
    I: IntoIterator<Item = Result<Triple, MeteorError>>,
    W: Write,
{
    if batch_size == 0 {
        return Err(MeteorError::invalid_config("batch size must be at least 1"));
    }
    let rt = Runtime::new().map_err(|e| MeteorError::runtime("starting async runtime", e))?;

    let mut summary = EvaluationSummary::default();
    let mut triples = triples.into_iter().take(limit.unwrap_or(usize::MAX));

    loop {
        let batch: Vec<Triple> = triples
            .by_ref()
            .take(batch_size)
            .collect::<Result<_, _>>()?;
        if batch.is_empty() {
            break;
        }

        let first_line = summary.evaluated + 1;
        let outcomes = rt.block_on(score_triples(Arc::clone(&meteor), batch));
        for (offset, outcome) in outcomes.iter().enumerate() {
            writeln!(out, "{}", outcome.preference().as_i8())
                .map_err(|e| MeteorError::io("writing results", e))?;
            summary.record(first_line + offset, outcome);
            if summary.evaluated % PROGRESS_EVERY == 0 {
                log::info!("{} finished", summary.evaluated);
            }
        }
    }

    out.flush()
        .map_err(|e| MeteorError::io("writing results", e))?;
    log::info!(
        "evaluated {} triples ({} undefined, {} failed hypothesis scores)",
        summary.evaluated,
        summary.undefined,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::SearchBudget;
    use crate::config::MeteorConfig;
    use crate::corpus::TripleReader;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    const SAMPLE: &str = "\
the cat sat on the mat ||| cat the mat on sat ||| the cat sat on the mat
a dog ||| the dogs ran ||| the dog runs
birds ||| fish ||| cows
";

    fn meteor() -> Arc<Meteor> {
        Arc::new(Meteor::new(MeteorConfig::default()).unwrap())
    }

    fn run(input: &str, limit: Option<usize>, batch_size: usize) -> (String, EvaluationSummary) {
        let mut out = Vec::new();
        let summary = evaluate_corpus(
            meteor(),
            TripleReader::new(Cursor::new(input)),
            limit,
            batch_size,
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_writes_one_preference_per_line() {
        let (out, summary) = run(SAMPLE, None, DEFAULT_BATCH_SIZE);
        assert_eq!(out, "1\n-1\n0\n");
        assert_eq!(
            summary,
            EvaluationSummary {
                evaluated: 3,
                undefined: 2,
                failed: 0,
            }
        );
    }

    #[test]
    fn test_small_batches_preserve_order() {
        let (out, summary) = run(SAMPLE, None, 1);
        assert_eq!(out, "1\n-1\n0\n");
        assert_eq!(summary.evaluated, 3);
    }

    #[test]
    fn test_limit_caps_the_run() {
        let (out, summary) = run(SAMPLE, Some(2), 1);
        assert_eq!(out, "1\n-1\n");
        assert_eq!(summary.evaluated, 2);
    }

    #[test]
    fn test_truncated_search_counts_as_failure() {
        let config = MeteorConfig {
            search_budget: SearchBudget::limited(2),
            ..MeteorConfig::default()
        };
        let meteor = Arc::new(Meteor::new(config).unwrap());
        let mut out = Vec::new();
        let summary = evaluate_corpus(
            meteor,
            TripleReader::new(Cursor::new("a b ||| a b ||| a b\n")),
            None,
            DEFAULT_BATCH_SIZE,
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\n");
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_pair_timeout_bounds_the_run() {
        let config = MeteorConfig {
            search_budget: SearchBudget::unbounded(),
            pair_timeout: Some(Duration::from_millis(5)),
            ..MeteorConfig::default()
        };
        let meteor = Arc::new(Meteor::new(config).unwrap());
        let sentence = vec!["x"; 24].join(" ");
        let line = format!("{0} ||| {0} ||| {0}\n", sentence);

        let started = Instant::now();
        let mut out = Vec::new();
        let summary = evaluate_corpus(
            meteor,
            TripleReader::new(Cursor::new(line)),
            None,
            DEFAULT_BATCH_SIZE,
            &mut out,
        )
        .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(String::from_utf8(out).unwrap(), "0\n");
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let mut out = Vec::new();
        let result = evaluate_corpus(
            meteor(),
            TripleReader::new(Cursor::new("a ||| b ||| c\nbroken line\n")),
            None,
            DEFAULT_BATCH_SIZE,
            &mut out,
        );
        assert!(matches!(
            result,
            Err(MeteorError::MalformedLine { line: 2, fields: 1 })
        ));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let mut out = Vec::new();
        let result = evaluate_corpus(meteor(), Vec::new(), None, 0, &mut out);
        assert!(matches!(result, Err(MeteorError::InvalidConfig { .. })));
    }
}
