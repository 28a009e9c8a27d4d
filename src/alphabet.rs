const INVALID: u8 = 255;

const ASCII_DNA_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];

    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;

    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;

    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;

    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;

    table
};

const ASCII_DNA_N_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = ASCII_DNA_TRANSLATION_TABLE;
    table[b'N' as usize] = 4;
    table[b'n' as usize] = 4;

    table
};

/// A set of symbols that genomes are made of.
///
/// Every io symbol (lower- and uppercase) is translated to a dense rank. The canonical
/// representation of a symbol is the uppercase variant returned by [`symbols`](Alphabet::symbols).
/// The alphabet decides which substitutes are tried during single-substitution lookups.
#[cfg_attr(feature = "mem_dbg", derive(mem_dbg::MemSize, mem_dbg::MemDbg))]
#[derive(Debug, Clone, Copy)]
pub struct Alphabet {
    pub(crate) u8_to_rank_translation_table: &'static [u8; 256],
    pub(crate) symbols: &'static [u8],
}

/// Nucleotides `A`, `C`, `G` and `T`.
pub static ASCII_DNA: Alphabet = Alphabet {
    u8_to_rank_translation_table: &ASCII_DNA_TRANSLATION_TABLE,
    symbols: b"ACGT",
};

/// Nucleotides `A`, `C`, `G`, `T` and the unknown base `N`.
pub static ASCII_DNA_N: Alphabet = Alphabet {
    u8_to_rank_translation_table: &ASCII_DNA_N_TRANSLATION_TABLE,
    symbols: b"ACGTN",
};

impl Alphabet {
    /// The canonical symbols of the alphabet, ordered by rank.
    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn rank(&self, symbol: u8) -> Option<usize> {
        match self.u8_to_rank_translation_table[symbol as usize] {
            INVALID => None,
            rank => Some(rank as usize),
        }
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.rank(symbol).is_some()
    }

    /// Returns the uppercase representation of `symbol`, or `None` if it is not part of the alphabet.
    pub fn canonical(&self, symbol: u8) -> Option<u8> {
        self.rank(symbol).map(|rank| self.symbols[rank])
    }

    /// Lazily enumerates every key that differs from `key` in exactly one position.
    ///
    /// Each position is replaced by every alphabet symbol other than the one already present.
    /// The unchanged key is never yielded.
    pub fn one_substitution_variants<'k>(
        &self,
        key: &'k [u8],
    ) -> impl Iterator<Item = Vec<u8>> + use<'k> {
        let symbols = self.symbols;

        (0..key.len()).flat_map(move |position| {
            symbols
                .iter()
                .filter(move |&&substitute| substitute != key[position])
                .map(move |&substitute| {
                    let mut variant = key.to_vec();
                    variant[position] = substitute;
                    variant
                })
        })
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        ASCII_DNA_N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_and_canonical_symbols() {
        assert_eq!(ASCII_DNA_N.rank(b'a'), Some(0));
        assert_eq!(ASCII_DNA_N.rank(b'N'), Some(4));
        assert_eq!(ASCII_DNA.rank(b'N'), None);
        assert_eq!(ASCII_DNA_N.canonical(b'g'), Some(b'G'));
        assert_eq!(ASCII_DNA_N.canonical(b'X'), None);
        assert!(!ASCII_DNA_N.contains(b'>'));
        assert_eq!(ASCII_DNA.size(), 4);
    }

    #[test]
    fn variants_of_key() {
        let variants: Vec<_> = ASCII_DNA_N.one_substitution_variants(b"AC").collect();

        assert_eq!(variants.len(), 2 * 4);
        assert!(variants.contains(&b"NC".to_vec()));
        assert!(variants.contains(&b"AT".to_vec()));
        assert!(!variants.contains(&b"AC".to_vec()));
    }

    #[test]
    fn variants_of_key_with_foreign_symbol() {
        let variants: Vec<_> = ASCII_DNA.one_substitution_variants(b"X").collect();

        assert_eq!(variants, [b"A", b"C", b"G", b"T"].map(|v| v.to_vec()));
    }

    #[test]
    fn no_variants_of_empty_key() {
        assert_eq!(ASCII_DNA_N.one_substitution_variants(b"").count(), 0);
    }
}
