use std::collections::HashMap;

use crate::matchers::Matcher;

/// Admissible reference words for every distinct translation word.
///
/// Duplicate translation words share one candidate list. Candidates are
/// unique and keep the order they were first produced in: exact match, then
/// stem matches, then synonym matches, each in reference order.
#[derive(Debug, Clone, Default)]
pub struct CandidateMapping<'a> {
    candidates: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> CandidateMapping<'a> {
    pub fn build(
        translation: &'a [String],
        reference: &'a [String],
        matcher: &Matcher<'a>,
    ) -> Self {
        let mut candidates: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for word in translation {
            let word = word.as_str();
            if candidates.contains_key(word) {
                continue;
            }

            let mut admissible: Vec<&'a str> = vec![];
            let found = matcher
                .exact(word, reference)
                .chain(matcher.stem(word, reference))
                .chain(matcher.synonym(word, reference));
            for candidate in found {
                if !admissible.contains(&candidate) {
                    admissible.push(candidate);
                }
            }
            candidates.insert(word, admissible);
        }
        Self { candidates }
    }

    /// Candidates for `word`; empty when the word can only stay unmatched.
    pub fn candidates(&self, word: &str) -> &[&'a str] {
        self.candidates
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
