use std::collections::HashMap;

use meteor::alignment::{
    best_alignment, count_crossings, crosses, enumerate_alignments, maximal_alignments,
};
use meteor::mapping::CandidateMapping;
use meteor::matchers::Matcher;
use meteor::{score, LexicalResources, SearchBudget};
use proptest::prelude::*;

const VOCAB: &[&str] = &["the", "cat", "cats", "sat", "mat", "on"];

fn sentence(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..max_len)
        .prop_map(|words| words.into_iter().map(String::from).collect())
}

fn non_empty_sentence(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..max_len)
        .prop_map(|words| words.into_iter().map(String::from).collect())
}

fn counts(words: impl IntoIterator<Item = String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_alignments_cover_translation_and_consume_each_occurrence_once(
        translation in sentence(6),
        reference in sentence(6),
    ) {
        let resources = LexicalResources::default();
        let matcher = Matcher::new(&resources, true);
        let mapping = CandidateMapping::build(&translation, &reference, &matcher);
        let all = enumerate_alignments(&translation, &reference, &mapping, SearchBudget::unbounded())
            .unwrap();
        prop_assert!(!all.is_empty());

        let available = counts(reference.iter().cloned());
        for alignment in &all {
            prop_assert_eq!(alignment.len(), translation.len());
            for (entry, word) in alignment.mappings().iter().zip(&translation) {
                prop_assert_eq!(entry.translation, word.as_str());
            }
            let used = counts(alignment.matched().map(|(_, r)| r.to_string()));
            for (word, n) in used {
                prop_assert!(n <= available.get(&word).copied().unwrap_or(0));
            }
        }
    }

    #[test]
    fn prop_maximal_set_has_highest_cardinality(
        translation in sentence(6),
        reference in sentence(6),
    ) {
        let resources = LexicalResources::default();
        let matcher = Matcher::new(&resources, true);
        let mapping = CandidateMapping::build(&translation, &reference, &matcher);
        let all = enumerate_alignments(&translation, &reference, &mapping, SearchBudget::unbounded())
            .unwrap();
        let highest = all.iter().map(|a| a.cardinality()).max().unwrap_or(0);
        let expected = all.iter().filter(|a| a.cardinality() == highest).count();

        let maximal = maximal_alignments(all);
        prop_assert_eq!(maximal.len(), expected);
        prop_assert!(maximal.iter().all(|a| a.cardinality() == highest));
    }

    #[test]
    fn prop_best_alignment_is_maximal_with_fewest_crossings(
        translation in sentence(6),
        reference in sentence(6),
    ) {
        let resources = LexicalResources::default();
        let matcher = Matcher::new(&resources, true);
        let mapping = CandidateMapping::build(&translation, &reference, &matcher);
        let maximal = maximal_alignments(
            enumerate_alignments(&translation, &reference, &mapping, SearchBudget::unbounded())
                .unwrap(),
        );
        let best = best_alignment(&translation, &reference, &mapping, SearchBudget::unbounded())
            .unwrap();

        prop_assert!(maximal.contains(&best));
        let fewest = count_crossings(&best, &translation, &reference);
        for alignment in &maximal {
            prop_assert!(fewest <= count_crossings(alignment, &translation, &reference));
        }
    }

    #[test]
    fn prop_crossing_is_symmetric(
        a in (0usize..10, 0usize..10),
        b in (0usize..10, 0usize..10),
    ) {
        prop_assert_eq!(crosses(a, b), crosses(b, a));
        prop_assert!(!crosses(a, a));
    }

    #[test]
    fn prop_sentence_scored_against_itself_is_perfect(
        sentence in non_empty_sentence(7),
        alpha in 0.01f64..0.99,
    ) {
        let fmean = score(&sentence, &sentence, alpha).unwrap();
        prop_assert!((fmean - 1.0).abs() < 1e-12, "fmean {}", fmean);
    }
}
