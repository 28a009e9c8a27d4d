use std::cmp::Reverse;
use std::collections::HashMap;

/// Controls how many mismatches a fragment may have against an indexed genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// The fragment has to occur exactly.
    #[default]
    Exact,
    /// The fragment may differ from the genome in at most one position (a SNP).
    AllowOneSubstitution,
}

impl MatchMode {
    pub(crate) fn mismatch_budget(self) -> usize {
        match self {
            MatchMode::Exact => 0,
            MatchMode::AllowOneSubstitution => 1,
        }
    }
}

/// The longest occurrence of a fragment in one genome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnaMatch {
    pub genome_name: String,
    pub position: usize,
    pub length: usize,
}

/// The share of chunks of a query genome that occur in an indexed genome.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeMatch {
    pub genome_name: String,
    /// In percent, from 0 to 100.
    pub percent_match: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) position: usize,
    pub(crate) length: usize,
}

impl Candidate {
    // longer is better, earlier breaks ties
    fn rank(&self) -> (usize, Reverse<usize>) {
        (self.length, Reverse(self.position))
    }
}

/// Length of the longest common prefix of `reference` and `fragment` that contains at most
/// `mismatch_budget` mismatching positions.
pub(crate) fn matched_prefix_length(
    reference: &[u8],
    fragment: &[u8],
    mismatch_budget: usize,
) -> usize {
    let mut mismatches = 0;

    for (idx, (r, f)) in reference.iter().zip(fragment).enumerate() {
        if r != f {
            mismatches += 1;

            if mismatches > mismatch_budget {
                return idx;
            }
        }
    }

    std::cmp::min(reference.len(), fragment.len())
}

/// Keeps the best candidate of every genome id.
pub(crate) fn keep_longest_per_genome(
    candidates: impl IntoIterator<Item = (usize, Candidate)>,
) -> HashMap<usize, Candidate> {
    let mut best: HashMap<usize, Candidate> = HashMap::new();

    for (genome_id, candidate) in candidates {
        best.entry(genome_id)
            .and_modify(|current| {
                if candidate.rank() > current.rank() {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    best
}
