use crate::lexicon::{LexicalResources, Stemmer, SynonymLexicon};
use crate::utils::is_ascii_word;

/// The three independent matching rules between a translation word and the
/// words of a reference. Each rule yields reference words lazily; callers
/// union the results.
pub struct Matcher<'a> {
    stemmer: &'a dyn Stemmer,
    synonyms: &'a dyn SynonymLexicon,
    ascii_only: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(resources: &'a LexicalResources, ascii_only: bool) -> Self {
        Self {
            stemmer: resources.stemmer.as_ref(),
            synonyms: resources.synonyms.as_ref(),
            ascii_only,
        }
    }

    /// Yields `word` itself when it occurs verbatim in the reference.
    pub fn exact<'w>(
        &self,
        word: &'w str,
        reference: &[String],
    ) -> impl Iterator<Item = &'w str> {
        reference
            .iter()
            .any(|r| r == word)
            .then_some(word)
            .into_iter()
    }

    /// Yields every reference word whose stem equals the stem of `word`.
    pub fn stem(
        &self,
        word: &str,
        reference: &'a [String],
    ) -> impl Iterator<Item = &'a str> + 'a {
        let stemmer = self.stemmer;
        let ascii_only = self.ascii_only;
        let stemmed = eligible(ascii_only, word).then(|| stemmer.stem(word));

        stemmed.into_iter().flat_map(move |stemmed| {
            reference
                .iter()
                .filter(move |r| eligible(ascii_only, r) && stemmer.stem(r) == stemmed)
                .map(String::as_str)
        })
    }

    /// Yields every reference word sharing at least one sense grouping with `word`.
    pub fn synonym(
        &self,
        word: &str,
        reference: &'a [String],
    ) -> impl Iterator<Item = &'a str> + 'a {
        let synonyms = self.synonyms;
        let ascii_only = self.ascii_only;
        let senses = eligible(ascii_only, word)
            .then(|| synonyms.synonym_sets(word))
            .filter(|senses| !senses.is_empty());

        senses.into_iter().flat_map(move |senses| {
            reference
                .iter()
                .filter(move |r| {
                    eligible(ascii_only, r) && !synonyms.synonym_sets(r).is_disjoint(&senses)
                })
                .map(String::as_str)
        })
    }
}

fn eligible(ascii_only: bool, word: &str) -> bool {
    !ascii_only || is_ascii_word(word)
}
