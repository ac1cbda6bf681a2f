//! METEOR-style translation scoring: align a candidate translation to a
//! reference through exact, stemmed and synonym word matches, pick the
//! maximum-cardinality alignment with the fewest crossings, and report
//! precision, recall and their weighted harmonic mean (Fmean).

pub mod alignment;
pub mod config;
pub mod corpus;
pub mod driver;
pub mod error;
pub mod lexicon;
pub mod mapping;
pub mod matchers;
pub mod meteor;
pub mod score;
pub mod utils;

// TODO: the fragmentation (chunk) penalty driven by beta and gamma is not
//       computed yet; Fmean is the final score until it is rebuilt from the
//       published METEOR definition.

pub use crate::alignment::{Alignment, SearchBudget, WordMapping};
pub use crate::config::MeteorConfig;
pub use crate::error::{MeteorError, ScoreError};
pub use crate::lexicon::{
    LexicalResources, SnowballStemmer, Stemmer, SynonymLexicon, SynonymTable,
};
pub use crate::meteor::{score, Meteor, MeteorScore};

#[cfg(feature = "python")]
mod python {
    use std::sync::Arc;

    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;
    use tokio::runtime::Runtime;

    use crate::config::MeteorConfig;
    use crate::meteor::Meteor;
    use crate::score::score_batch as score_pairs;
    use crate::utils::str_to_word_vec;

    fn engine(alpha: f64) -> PyResult<Meteor> {
        Meteor::new(MeteorConfig::with_alpha(alpha))
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Fmean of one whitespace-tokenised translation; `None` when undefined.
    #[pyfunction]
    #[pyo3(signature = (translation, reference, alpha = MeteorConfig::DEFAULT_ALPHA))]
    fn score(
        py: Python,
        translation: &str,
        reference: &str,
        alpha: f64,
    ) -> PyResult<Option<f64>> {
        let meteor = engine(alpha)?;
        let translation = str_to_word_vec(translation);
        let reference = str_to_word_vec(reference);

        match py.allow_threads(|| meteor.score(&translation, &reference)) {
            Ok(fmean) => Ok(Some(fmean)),
            Err(e) if e.is_undefined() => Ok(None),
            Err(e) => Err(PyRuntimeError::new_err(e.to_string())),
        }
    }

    #[pyfunction]
    #[pyo3(signature = (preds, golds, alpha = MeteorConfig::DEFAULT_ALPHA))]
    fn score_batch(
        py: Python,
        preds: Vec<String>,
        golds: Vec<String>,
        alpha: f64,
    ) -> PyResult<Vec<Option<f64>>> {
        if preds.len() != golds.len() {
            return Err(PyValueError::new_err(format!(
                "got {} predictions but {} references",
                preds.len(),
                golds.len()
            )));
        }
        let meteor = Arc::new(engine(alpha)?);

        let results = py.allow_threads(|| {
            let rt = Runtime::new().map_err(|e| e.to_string())?;
            Ok::<_, String>(rt.block_on(score_pairs(meteor, preds, golds)))
        });
        let results = results.map_err(PyRuntimeError::new_err)?;

        results
            .into_iter()
            .map(|result| match result {
                Ok(score) => Ok(Some(score.fmean)),
                Err(e) if e.is_undefined() => Ok(None),
                Err(e) => Err(PyRuntimeError::new_err(e.to_string())),
            })
            .collect()
    }

    #[pymodule]
    fn meteor(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(score, m)?)?;
        m.add_function(wrap_pyfunction!(score_batch, m)?)?;
        Ok(())
    }

}
