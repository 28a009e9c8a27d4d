use crate::alphabet::ASCII_DNA_N;
use crate::error::LoadError;

use std::io::Read;

/// A named, immutable sequence of nucleotides.
#[cfg_attr(feature = "mem_dbg", derive(mem_dbg::MemSize, mem_dbg::MemDbg))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    name: String,
    sequence: Vec<u8>,
}

impl Genome {
    /// Creates a genome without validating its symbols.
    ///
    /// The name must not be empty. Passing an empty name is a caller error.
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "genome names must not be empty");

        Self {
            name,
            sequence: sequence.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns the `length` symbols starting at `position`, or `None` if they exceed the genome.
    pub fn extract(&self, position: usize, length: usize) -> Option<&[u8]> {
        let end = position.checked_add(length)?;
        self.sequence.get(position..end)
    }

    /// Reads all genomes from FASTA-like text.
    ///
    /// Every record starts with a header line `>name`, where the name must begin with an
    /// alphanumeric character. The following lines up to the next header are concatenated to
    /// the sequence of the record. Symbols are converted to uppercase and must be one of
    /// `A`, `C`, `G`, `T` and `N`. Empty lines are ignored, and so is a header that is directly
    /// followed by another header.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` if reading fails, `LoadError::MissingHeader` or
    /// `LoadError::InvalidHeader` for malformed records, `LoadError::InvalidSymbol` for symbols
    /// outside of the alphabet and `LoadError::Empty` if the input has no records or the last
    /// record has no sequence.
    pub fn load(mut reader: impl Read) -> Result<Vec<Genome>, LoadError> {
        let mut text = Vec::new();
        reader.read_to_end(&mut text)?;

        let mut genomes = Vec::new();
        let mut name: Option<String> = None;
        let mut sequence = Vec::new();

        let line_ends = memchr::memchr_iter(b'\n', &text).chain(std::iter::once(text.len()));
        let mut line_start = 0;

        for (line_idx, line_end) in line_ends.enumerate() {
            let line = trim_carriage_return(&text[line_start..line_end]);
            line_start = line_end + 1;
            let line_number = line_idx + 1;

            if line.is_empty() {
                continue;
            }

            if line[0] == b'>' {
                if !matches!(line.get(1), Some(c) if c.is_ascii_alphanumeric()) {
                    return Err(LoadError::InvalidHeader { line: line_number });
                }

                if let Some(previous_name) = name.take() {
                    push_record(&mut genomes, previous_name, std::mem::take(&mut sequence));
                }

                name = Some(String::from_utf8_lossy(&line[1..]).into_owned());
                continue;
            }

            if name.is_none() {
                return Err(LoadError::MissingHeader { line: line_number });
            }

            for &symbol in line {
                let canonical = ASCII_DNA_N
                    .canonical(symbol)
                    .ok_or_else(|| LoadError::InvalidSymbol {
                        line: line_number,
                        symbol: char::from(symbol),
                    })?;

                sequence.push(canonical);
            }
        }

        match name {
            Some(name) if !sequence.is_empty() => {
                genomes.push(Genome::new(name, sequence));
                Ok(genomes)
            }
            _ => Err(LoadError::Empty),
        }
    }
}

fn push_record(genomes: &mut Vec<Genome>, name: String, sequence: Vec<u8>) {
    if sequence.is_empty() {
        tracing::warn!(genome = %name, "skipping record without sequence");
        return;
    }

    genomes.push(Genome::new(name, sequence));
}

fn trim_carriage_return(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
