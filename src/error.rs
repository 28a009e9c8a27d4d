use thiserror::Error;

/// Error type for building a [`GenomeIndex`](crate::GenomeIndex)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Windows of length zero cannot be indexed
    #[error("minimum search length must be greater than zero")]
    ZeroMinimumSearchLength,
    /// The genome has offsets that do not fit into the offset storage type of the index
    #[error("genome {name} of length {length} is too long for the offset type of the index")]
    GenomeTooLong {
        /// Name of the rejected genome
        name: String,
        /// Its length
        length: usize,
    },
}

/// Error type for fragment and related-genome queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The fragment or query genome is shorter than the requested match length
    #[error("query of length {length} is shorter than the minimum match length {minimum_length}")]
    FragmentTooShort {
        /// Length of the fragment or query genome
        length: usize,
        /// Requested minimum match length
        minimum_length: usize,
    },
    /// The requested match length is below the window length of the index
    #[error(
        "minimum match length {minimum_length} is below the minimum search length {minimum_search_length} of the index"
    )]
    MinimumLengthBelowIndex {
        /// Requested minimum match length
        minimum_length: usize,
        /// Window length of the index
        minimum_search_length: usize,
    },
    /// No indexed genome satisfied the query
    #[error("no matching genome found")]
    NoMatch,
}

/// Error type for loading genomes from text
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Sequence data appeared before the first header line
    #[error("line {line}: sequence data without a preceding header")]
    MissingHeader { line: usize },
    /// The header line has no name or the name does not start with an alphanumeric character
    #[error("line {line}: invalid header")]
    InvalidHeader { line: usize },
    /// The sequence contains a symbol outside of the alphabet
    #[error("line {line}: invalid symbol {symbol:?}")]
    InvalidSymbol { line: usize, symbol: char },
    /// The input contains no genome, or the last genome has no sequence
    #[error("no genome with a non-empty sequence found")]
    Empty,
}
