use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::ScoreError;
use crate::mapping::CandidateMapping;
use crate::utils::first_position;

/// One translation word and the reference word it is aligned to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMapping<'a> {
    pub translation: &'a str,
    pub reference: Option<&'a str>,
}

/// A position-ordered assignment of every translation word to a reference
/// word or to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment<'a> {
    mappings: Vec<WordMapping<'a>>,
}

impl<'a> Alignment<'a> {
    pub fn new(mappings: Vec<WordMapping<'a>>) -> Self {
        Self { mappings }
    }

    /// Every translation word left unmatched.
    pub fn unmatched(translation: &'a [String]) -> Self {
        Self::new(
            translation
                .iter()
                .map(|word| WordMapping {
                    translation: word,
                    reference: None,
                })
                .collect(),
        )
    }

    pub fn mappings(&self) -> &[WordMapping<'a>] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Number of translation words aligned to a reference word.
    pub fn cardinality(&self) -> usize {
        self.mappings
            .iter()
            .filter(|m| m.reference.is_some())
            .count()
    }

    /// `(translation, reference)` pairs of the non-null entries, in translation order.
    pub fn matched(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.mappings
            .iter()
            .filter_map(|m| m.reference.map(|r| (m.translation, r)))
    }
}

/// Wall-clock cut-off for one search, fixed when the search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub at: Instant,
    pub limit: Duration,
}

impl Deadline {
    /// `limit` from now; `None` when the instant is not representable.
    pub fn after(limit: Duration) -> Option<Self> {
        Instant::now()
            .checked_add(limit)
            .map(|at| Self { at, limit })
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Limits on one alignment search: visited nodes and elapsed time.
/// The default is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchBudget {
    pub max_nodes: Option<usize>,
    pub deadline: Option<Deadline>,
}

impl SearchBudget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limited(max_nodes: usize) -> Self {
        Self {
            max_nodes: Some(max_nodes),
            deadline: None,
        }
    }

    pub fn with_deadline(self, deadline: Option<Deadline>) -> Self {
        Self { deadline, ..self }
    }
}

/// Multiset of reference words not yet consumed on one search branch.
#[derive(Debug, Clone)]
struct ReferencePool<'a> {
    counts: HashMap<&'a str, usize>,
}

impl<'a> ReferencePool<'a> {
    fn new(reference: &'a [String]) -> Self {
        let mut counts = HashMap::new();
        for word in reference {
            *counts.entry(word.as_str()).or_insert(0) += 1;
        }
        Self { counts }
    }

    fn contains(&self, word: &str) -> bool {
        matches!(self.counts.get(word), Some(&n) if n > 0)
    }

    /// Copy of the pool with one occurrence of `word` removed.
    fn without(&self, word: &str) -> Self {
        let mut next = self.clone();
        if let Some(n) = next.counts.get_mut(word) {
            *n = n.saturating_sub(1);
        }
        next
    }
}

/// A search node. Owns its own snapshot so sibling branches never share state.
struct Frame<'a> {
    position: usize,
    pool: ReferencePool<'a>,
    mappings: Vec<WordMapping<'a>>,
}

impl<'a> Frame<'a> {
    fn matched(&self, word: &'a str, target: &'a str) -> Self {
        let mut mappings = self.mappings.clone();
        mappings.push(WordMapping {
            translation: word,
            reference: Some(target),
        });
        Frame {
            position: self.position + 1,
            pool: self.pool.without(target),
            mappings,
        }
    }

    fn skipped(mut self, word: &'a str) -> Self {
        self.mappings.push(WordMapping {
            translation: word,
            reference: None,
        });
        self.position += 1;
        self
    }
}

/// Depth-first enumeration of every alignment the candidate mapping admits.
///
/// At each translation position the search branches once per candidate still
/// present in the remaining reference pool (consuming one occurrence) and
/// once more for leaving the word unmatched, so the all-null alignment is
/// always produced. Alignments come out in that branch order.
///
/// The number of alignments grows as the product of `candidates + 1` over
/// all positions, i.e. exponentially with sentence length. A limited
/// [`SearchBudget`] stops the search with [`ScoreError::SearchTruncated`],
/// or [`ScoreError::TimedOut`] once its deadline passes, instead of changing
/// which alignments are considered.
pub struct AlignmentSearch<'m, 'a> {
    translation: &'a [String],
    mapping: &'m CandidateMapping<'a>,
    stack: Vec<Frame<'a>>,
    budget: SearchBudget,
    explored: usize,
}

impl<'m, 'a> AlignmentSearch<'m, 'a> {
    pub fn new(
        translation: &'a [String],
        reference: &'a [String],
        mapping: &'m CandidateMapping<'a>,
        budget: SearchBudget,
    ) -> Self {
        let root = Frame {
            position: 0,
            pool: ReferencePool::new(reference),
            mappings: Vec::with_capacity(translation.len()),
        };
        Self {
            translation,
            mapping,
            stack: vec![root],
            budget,
            explored: 0,
        }
    }

    /// Search nodes visited so far.
    pub fn explored(&self) -> usize {
        self.explored
    }

    fn expand(&mut self, frame: Frame<'a>, word: &'a str) {
        let mut children: Vec<Frame<'a>> = self
            .mapping
            .candidates(word)
            .iter()
            .filter(|target| frame.pool.contains(target))
            .map(|&target| frame.matched(word, target))
            .collect();
        children.push(frame.skipped(word));

        // Reversed so the first candidate is popped first.
        self.stack.extend(children.into_iter().rev());
    }
}

impl<'m, 'a> Iterator for AlignmentSearch<'m, 'a> {
    type Item = Result<Alignment<'a>, ScoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            if let Some(limit) = self.budget.max_nodes {
                if self.explored >= limit {
                    self.stack.clear();
                    log::debug!(
                        "alignment search for {} words stopped at {} nodes",
                        self.translation.len(),
                        self.explored
                    );
                    return Some(Err(ScoreError::SearchTruncated {
                        explored: self.explored,
                        limit,
                    }));
                }
            }
            if let Some(deadline) = self.budget.deadline {
                if deadline.expired() {
                    self.stack.clear();
                    log::debug!(
                        "alignment search for {} words timed out after {} nodes",
                        self.translation.len(),
                        self.explored
                    );
                    return Some(Err(ScoreError::TimedOut {
                        limit: deadline.limit,
                    }));
                }
            }
            self.explored += 1;

            let translation = self.translation;
            match translation.get(frame.position) {
                Some(word) => self.expand(frame, word),
                None => return Some(Ok(Alignment::new(frame.mappings))),
            }
        }
        None
    }
}

/// Collects every alignment the mapping admits, in search order.
pub fn enumerate_alignments<'a>(
    translation: &'a [String],
    reference: &'a [String],
    mapping: &CandidateMapping<'a>,
    budget: SearchBudget,
) -> Result<Vec<Alignment<'a>>, ScoreError> {
    AlignmentSearch::new(translation, reference, mapping, budget).collect()
}

/// Running maximum-cardinality set.
#[derive(Debug, Default)]
struct MaximalSet<'a> {
    cardinality: usize,
    alignments: Vec<Alignment<'a>>,
}

impl<'a> MaximalSet<'a> {
    fn keep(mut self, alignment: Alignment<'a>) -> Self {
        let cardinality = alignment.cardinality();
        match cardinality.cmp(&self.cardinality) {
            Ordering::Greater => Self {
                cardinality,
                alignments: vec![alignment],
            },
            Ordering::Equal => {
                self.alignments.push(alignment);
                self
            }
            Ordering::Less => self,
        }
    }
}

/// Keeps only the alignments of the highest cardinality, preserving their order.
pub fn maximal_alignments<'a, I>(alignments: I) -> Vec<Alignment<'a>>
where
    I: IntoIterator<Item = Alignment<'a>>,
{
    alignments
        .into_iter()
        .fold(MaximalSet::default(), MaximalSet::keep)
        .alignments
}

/// Whether two `(translation position, reference position)` links are inverted.
pub fn crosses(a: (usize, usize), b: (usize, usize)) -> bool {
    (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1)
}

/// Number of inverted pairs among the non-null entries of `alignment`.
///
/// Positions are found by searching the sequences for the first occurrence
/// of each word, so repeated words all resolve to their first position.
pub fn count_crossings(
    alignment: &Alignment<'_>,
    translation: &[String],
    reference: &[String],
) -> usize {
    let links: Vec<(usize, usize)> = alignment
        .matched()
        .filter_map(|(t, r)| {
            Some((
                first_position(translation, t)?,
                first_position(reference, r)?,
            ))
        })
        .collect();

    links
        .iter()
        .enumerate()
        .map(|(i, &a)| links[i + 1..].iter().filter(|&&b| crosses(a, b)).count())
        .sum()
}

/// The alignment with the fewest crossings; the earliest one wins ties.
pub fn select_best<'a>(
    alignments: Vec<Alignment<'a>>,
    translation: &[String],
    reference: &[String],
) -> Option<Alignment<'a>> {
    alignments
        .into_iter()
        .map(|alignment| (count_crossings(&alignment, translation, reference), alignment))
        .fold(None, |best: Option<(usize, Alignment<'a>)>, (crossings, alignment)| {
            let improves = best.as_ref().map_or(true, |(min, _)| crossings < *min);
            if improves {
                Some((crossings, alignment))
            } else {
                best
            }
        })
        .map(|(_, alignment)| alignment)
}

/// Maximum-cardinality, minimum-crossing alignment of `translation` onto `reference`.
pub fn best_alignment<'a>(
    translation: &'a [String],
    reference: &'a [String],
    mapping: &CandidateMapping<'a>,
    budget: SearchBudget,
) -> Result<Alignment<'a>, ScoreError> {
    let maximal = AlignmentSearch::new(translation, reference, mapping, budget)
        .try_fold(MaximalSet::default(), |set, alignment| {
            alignment.map(|a| set.keep(a))
        })?
        .alignments;

    Ok(select_best(maximal, translation, reference)
        .unwrap_or_else(|| Alignment::unmatched(translation)))
}
