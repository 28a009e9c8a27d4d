//! A genome index based on a prefix tree of fixed-length windows.
//!
//! The index answers whether a DNA fragment occurs in any of the indexed genomes, either exactly
//! or with a single substituted base (a SNP), and reports the longest such occurrence per genome.
//! On top of that, it scores how many chunks of a query genome occur in each indexed genome.
//!
//! ```
//! use genome_matcher::{Genome, GenomeIndex, MatchMode};
//!
//! let mut index = GenomeIndex::<u32>::new(4).unwrap();
//! index.add_genome(Genome::new("A", "ACGTACGT")).unwrap();
//! index.add_genome(Genome::new("B", "TTTTTTTT")).unwrap();
//!
//! let matches = index.find_genomes_with_this_dna(b"ACGA", 4, MatchMode::AllowOneSubstitution).unwrap();
//! assert_eq!(matches[0].genome_name, "A");
//! assert_eq!((matches[0].position, matches[0].length), (0, 4));
//! ```

/// Contains the nucleotide alphabets.
pub mod alphabet;
pub mod config;
pub mod cursor;
pub mod error;
pub mod genome;
pub mod matching;
pub mod trie;

#[doc(inline)]
pub use alphabet::Alphabet;
#[doc(inline)]
pub use config::GenomeIndexConfig;
#[doc(inline)]
pub use cursor::Cursor;
#[doc(inline)]
pub use error::{IndexError, LoadError, QueryError};
#[doc(inline)]
pub use genome::Genome;
#[doc(inline)]
pub use matching::{DnaMatch, GenomeMatch, MatchMode};
#[doc(inline)]
pub use trie::Trie;

use matching::Candidate;
use num_traits::{NumCast, PrimInt};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Where an indexed window starts. The genome id is the slot of the genome name in the index.
#[cfg_attr(feature = "mem_dbg", derive(mem_dbg::MemSize, mem_dbg::MemDbg))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct IndexEntry<O> {
    genome_id: usize,
    offset: O,
}

/// An index over a collection of genomes for exact and single-substitution fragment search.
///
/// Every genome is split into overlapping windows of length
/// [`minimum_search_length`](GenomeIndex::minimum_search_length), which are stored in a [`Trie`].
/// Window offsets are stored as `O`, which limits the length of a single genome.
///
/// Adding genomes needs exclusive access, while queries only read and can run concurrently.
pub struct GenomeIndex<O = u32> {
    minimum_search_length: usize,
    trie: Trie<IndexEntry<O>>,
    genomes: Vec<Arc<Genome>>,
    genome_ids: HashMap<String, usize>,
    parallel: bool,
}

impl<O: OffsetStorage> GenomeIndex<O> {
    /// Creates an empty index with default configuration and the given window length.
    pub fn new(minimum_search_length: usize) -> Result<Self, IndexError> {
        GenomeIndexConfig::new()
            .minimum_search_length(minimum_search_length)
            .construct_index()
    }

    pub(crate) fn from_config(
        minimum_search_length: usize,
        alphabet: Alphabet,
        parallel: bool,
    ) -> Result<Self, IndexError> {
        if minimum_search_length == 0 {
            return Err(IndexError::ZeroMinimumSearchLength);
        }

        Ok(Self {
            minimum_search_length,
            trie: Trie::new(alphabet),
            genomes: Vec::new(),
            genome_ids: HashMap::new(),
            parallel,
        })
    }

    pub fn minimum_search_length(&self) -> usize {
        self.minimum_search_length
    }

    pub fn alphabet(&self) -> Alphabet {
        self.trie.alphabet()
    }

    /// Number of distinct genome names in the index.
    pub fn num_genomes(&self) -> usize {
        self.genomes.len()
    }

    pub fn genome(&self, name: &str) -> Option<&Genome> {
        self.genome_ids
            .get(name)
            .map(|&genome_id| self.genomes[genome_id].as_ref())
    }

    /// Inserts all windows of `genome` into the index.
    ///
    /// If a genome of the same name was added before, it is replaced, but its windows stay in the
    /// index and are verified against the new genome.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::GenomeTooLong` if the offsets of the genome cannot be represented by `O`.
    /// The index is not modified in this case.
    pub fn add_genome(&mut self, genome: impl Into<Arc<Genome>>) -> Result<(), IndexError> {
        let genome = genome.into();

        if !genome.is_empty() && O::try_from_usize(genome.len() - 1).is_none() {
            return Err(IndexError::GenomeTooLong {
                name: genome.name().to_owned(),
                length: genome.len(),
            });
        }

        let genome_id = match self.genome_ids.get(genome.name()) {
            Some(&genome_id) => {
                tracing::debug!(genome = genome.name(), "replacing genome of the same name");
                self.genomes[genome_id] = Arc::clone(&genome);
                genome_id
            }
            None => {
                let genome_id = self.genomes.len();
                self.genome_ids.insert(genome.name().to_owned(), genome_id);
                self.genomes.push(Arc::clone(&genome));
                genome_id
            }
        };

        let mut num_windows = 0;

        for (offset, window) in windows_with_tail(genome.sequence(), self.minimum_search_length) {
            // fits, checked above
            let offset = O::try_from_usize(offset).unwrap();
            self.trie.insert(window, IndexEntry { genome_id, offset });
            num_windows += 1;
        }

        tracing::debug!(
            genome = genome.name(),
            length = genome.len(),
            num_windows,
            num_trie_nodes = self.trie.num_nodes(),
            "added genome"
        );

        Ok(())
    }

    /// Finds the longest occurrence of `fragment` in every indexed genome.
    ///
    /// Only occurrences that match at least `minimum_length` leading symbols of the fragment are
    /// reported. In [`MatchMode::AllowOneSubstitution`], one mismatching position is tolerated
    /// within the matched symbols. Per genome, the longest occurrence is reported, ties are broken
    /// by the smallest position. The matches are ordered by genome name.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::FragmentTooShort` if the fragment is shorter than `minimum_length`,
    /// `QueryError::MinimumLengthBelowIndex` if `minimum_length` is smaller than the minimum
    /// search length of the index and `QueryError::NoMatch` if no genome contains the fragment.
    pub fn find_genomes_with_this_dna(
        &self,
        fragment: &[u8],
        minimum_length: usize,
        mode: MatchMode,
    ) -> Result<Vec<DnaMatch>, QueryError> {
        let best = self.best_candidates(fragment, minimum_length, mode)?;

        let mut matches: Vec<_> = best
            .into_iter()
            .map(|(genome_id, candidate)| DnaMatch {
                genome_name: self.genomes[genome_id].name().to_owned(),
                position: candidate.position,
                length: candidate.length,
            })
            .collect();

        matches.sort_unstable_by(|a, b| a.genome_name.cmp(&b.genome_name));

        Ok(matches)
    }

    /// Scores every indexed genome by the share of chunks of `query` that occur in it.
    ///
    /// The query is split into non-overlapping chunks of length `fragment_match_length`, a shorter
    /// remainder is ignored. A chunk counts for a genome if
    /// [`find_genomes_with_this_dna`](GenomeIndex::find_genomes_with_this_dna) reports the genome
    /// for the full chunk length. Genomes matching at least one chunk and reaching
    /// `match_percent_threshold` are returned, ordered by descending percentage and then by name.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::FragmentTooShort` if the query is shorter than
    /// `fragment_match_length`, `QueryError::MinimumLengthBelowIndex` if `fragment_match_length` is
    /// smaller than the minimum search length of the index and `QueryError::NoMatch` if no genome
    /// reaches the threshold.
    pub fn find_related_genomes(
        &self,
        query: &Genome,
        fragment_match_length: usize,
        mode: MatchMode,
        match_percent_threshold: f64,
    ) -> Result<Vec<GenomeMatch>, QueryError> {
        self.check_lengths(query.len(), fragment_match_length)?;

        let chunks = query.sequence().chunks_exact(fragment_match_length);
        let num_chunks = chunks.len();

        let matching_genome_ids = |chunk: &[u8]| -> Vec<usize> {
            self.best_candidates(chunk, fragment_match_length, mode)
                .map(|best| best.into_keys().collect())
                .unwrap_or_default()
        };

        let count_hits = |mut hits: Vec<usize>, genome_ids: Vec<usize>| {
            for genome_id in genome_ids {
                hits[genome_id] += 1;
            }
            hits
        };

        let num_genomes = self.genomes.len();

        let hits = if self.parallel {
            query
                .sequence()
                .par_chunks_exact(fragment_match_length)
                .map(matching_genome_ids)
                .fold(|| vec![0; num_genomes], count_hits)
                .reduce(
                    || vec![0; num_genomes],
                    |mut total, hits| {
                        for (total, hits) in total.iter_mut().zip(hits) {
                            *total += hits;
                        }
                        total
                    },
                )
        } else {
            chunks
                .map(matching_genome_ids)
                .fold(vec![0; num_genomes], count_hits)
        };

        let mut results: Vec<_> = hits
            .into_iter()
            .enumerate()
            .filter(|&(_, num_hits)| num_hits > 0)
            .map(|(genome_id, num_hits)| GenomeMatch {
                genome_name: self.genomes[genome_id].name().to_owned(),
                percent_match: 100.0 * num_hits as f64 / num_chunks as f64,
            })
            .filter(|genome_match| genome_match.percent_match >= match_percent_threshold)
            .collect();

        tracing::debug!(
            query = query.name(),
            num_chunks,
            num_related = results.len(),
            "scored related genomes"
        );

        if results.is_empty() {
            return Err(QueryError::NoMatch);
        }

        results.sort_unstable_by(|a, b| {
            b.percent_match
                .total_cmp(&a.percent_match)
                .then_with(|| a.genome_name.cmp(&b.genome_name))
        });

        Ok(results)
    }

    fn check_lengths(&self, length: usize, minimum_length: usize) -> Result<(), QueryError> {
        if length < minimum_length {
            return Err(QueryError::FragmentTooShort {
                length,
                minimum_length,
            });
        }

        if minimum_length < self.minimum_search_length {
            return Err(QueryError::MinimumLengthBelowIndex {
                minimum_length,
                minimum_search_length: self.minimum_search_length,
            });
        }

        Ok(())
    }

    // the best verified candidate of every genome that matches at least minimum_length symbols
    fn best_candidates(
        &self,
        fragment: &[u8],
        minimum_length: usize,
        mode: MatchMode,
    ) -> Result<HashMap<usize, Candidate>, QueryError> {
        self.check_lengths(fragment.len(), minimum_length)?;

        let anchor = &fragment[..self.minimum_search_length];

        let mut anchor_entries: Vec<&IndexEntry<O>> = self.trie.find_exact(anchor).iter().collect();
        if mode == MatchMode::AllowOneSubstitution {
            anchor_entries.extend(self.trie.find_with_one_substitution(anchor));
        }

        tracing::trace!(
            fragment_len = fragment.len(),
            num_anchor_entries = anchor_entries.len(),
            ?mode,
            "verifying anchor entries"
        );

        let mismatch_budget = mode.mismatch_budget();

        let verified = anchor_entries.into_iter().filter_map(|entry| {
            let position = entry.offset.into_usize();
            let reference = self.genomes[entry.genome_id]
                .sequence()
                .get(position..)
                .unwrap_or_default();

            let length = matching::matched_prefix_length(reference, fragment, mismatch_budget);

            (length >= minimum_length).then_some((entry.genome_id, Candidate { position, length }))
        });

        let best = matching::keep_longest_per_genome(verified);

        if best.is_empty() {
            Err(QueryError::NoMatch)
        } else {
            Ok(best)
        }
    }
}

// All full windows, followed by the tail after the last full window start, if it is not empty.
// For sequences shorter than window_len, the tail is the whole sequence.
fn windows_with_tail(sequence: &[u8], window_len: usize) -> impl Iterator<Item = (usize, &[u8])> {
    let tail_start = (sequence.len() + 1).saturating_sub(window_len);
    let tail = (tail_start < sequence.len()).then(|| (tail_start, &sequence[tail_start..]));

    sequence.windows(window_len).enumerate().chain(tail)
}

/// Integer types that can store the window offsets of a [`GenomeIndex`].
pub trait OffsetStorage:
    PrimInt + maybe_mem_dbg::MaybeMemDbg + sealed::Sealed + Send + Sync + 'static
{
    fn try_from_usize(value: usize) -> Option<Self> {
        <Self as NumCast>::from(value)
    }

    fn into_usize(self) -> usize {
        // offsets are only ever created from usize values
        <usize as NumCast>::from(self).unwrap()
    }
}

impl sealed::Sealed for u32 {}

impl OffsetStorage for u32 {}

impl sealed::Sealed for u64 {}

impl OffsetStorage for u64 {}

impl sealed::Sealed for usize {}

impl OffsetStorage for usize {}

mod maybe_mem_dbg {
    #[cfg(feature = "mem_dbg")]
    pub trait MaybeMemDbg: mem_dbg::MemSize + mem_dbg::MemDbg {}

    #[cfg(not(feature = "mem_dbg"))]
    pub trait MaybeMemDbg {}

    impl MaybeMemDbg for u32 {}
    impl MaybeMemDbg for u64 {}
    impl MaybeMemDbg for usize {}
}

mod sealed {
    pub trait Sealed {}
}
