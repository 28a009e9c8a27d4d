use crate::{Alphabet, GenomeIndex, IndexError, OffsetStorage};
use std::marker::PhantomData;

/// Builder for a [`GenomeIndex`].
pub struct GenomeIndexConfig<O = u32> {
    minimum_search_length: usize,
    alphabet: Alphabet,
    parallel: bool,
    _offset_storage_marker: PhantomData<O>,
}

impl<O: OffsetStorage> GenomeIndexConfig<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the windows that are inserted into the index.
    ///
    /// Queries cannot ask for matches shorter than this.
    pub fn minimum_search_length(&mut self, minimum_search_length: usize) -> &mut Self {
        self.minimum_search_length = minimum_search_length;
        self
    }

    /// The alphabet determines which substitutes are tried for single-substitution matches.
    pub fn alphabet(&mut self, alphabet: Alphabet) -> &mut Self {
        self.alphabet = alphabet;
        self
    }

    /// Score the chunks of related-genome queries in parallel.
    ///
    /// The number of threads is controlled by rayon.
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    pub fn construct_index(&self) -> Result<GenomeIndex<O>, IndexError> {
        GenomeIndex::from_config(self.minimum_search_length, self.alphabet, self.parallel)
    }
}

impl<O: OffsetStorage> Default for GenomeIndexConfig<O> {
    fn default() -> Self {
        Self {
            minimum_search_length: 16,
            alphabet: Alphabet::default(),
            parallel: true,
            _offset_storage_marker: PhantomData,
        }
    }
}
