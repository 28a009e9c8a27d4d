use genome_matcher::{
    DnaMatch, Genome, GenomeIndex, GenomeIndexConfig, GenomeMatch, MatchMode, QueryError,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

static SYMBOLS: &[u8] = b"ACGTN";

fn genome_name(genome_id: usize) -> String {
    format!("genome{genome_id}")
}

fn create_index(texts: &[Vec<u8>], minimum_search_length: usize, parallel: bool) -> GenomeIndex {
    let mut index = GenomeIndexConfig::<u32>::new()
        .minimum_search_length(minimum_search_length)
        .parallel(parallel)
        .construct_index()
        .unwrap();

    for (genome_id, text) in texts.iter().enumerate() {
        index
            .add_genome(Genome::new(genome_name(genome_id), text.as_slice()))
            .unwrap();
    }

    index
}

struct FragmentSampler<'t, 'r> {
    texts: &'t [Vec<u8>],
    rng: &'r mut ChaCha8Rng,
    min_len: usize,
    max_extent: usize,
}

impl<'t, 'r> Iterator for FragmentSampler<'t, 'r> {
    // genome id, position, fragment
    type Item = (usize, usize, &'t [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let long_enough: Vec<_> = (0..self.texts.len())
            .filter(|&genome_id| self.texts[genome_id].len() >= self.min_len)
            .collect();

        if long_enough.is_empty() {
            return None;
        }

        let genome_id = long_enough[self.rng.random_range(0..long_enough.len())];
        let text = &self.texts[genome_id];

        let position = self.rng.random_range(0..=text.len() - self.min_len);
        let max_len = std::cmp::max(
            self.min_len,
            std::cmp::min(self.max_extent, text.len() - position),
        );
        let extent = self.rng.random_range(self.min_len..=max_len);

        Some((genome_id, position, &text[position..position + extent]))
    }
}

struct RandomFragmentGenerator<'r> {
    min_len: usize,
    max_len: usize,
    rng: &'r mut ChaCha8Rng,
}

impl<'r> Iterator for RandomFragmentGenerator<'r> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.rng.random_range(self.min_len..=self.max_len);
        let mut fragment = vec![0; len];
        for f in fragment.iter_mut() {
            *f = SYMBOLS[self.rng.random_range(0..SYMBOLS.len())];
        }

        Some(fragment)
    }
}

fn substitute_one(fragment: &[u8], rng: &mut ChaCha8Rng) -> Vec<u8> {
    let mut mutated = fragment.to_vec();
    let idx = rng.random_range(0..mutated.len());
    let others: Vec<_> = SYMBOLS.iter().filter(|&&s| s != mutated[idx]).collect();
    mutated[idx] = *others[rng.random_range(0..others.len())];

    mutated
}

fn naive_matched_length(text: &[u8], fragment: &[u8], mismatch_budget: usize) -> usize {
    let mut mismatches = 0;

    text.iter()
        .zip(fragment)
        .take_while(|(t, f)| {
            if t != f {
                mismatches += 1;
            }
            mismatches <= mismatch_budget
        })
        .count()
}

fn naive_search(
    texts: &[Vec<u8>],
    fragment: &[u8],
    minimum_length: usize,
    mode: MatchMode,
) -> Vec<DnaMatch> {
    let mismatch_budget = match mode {
        MatchMode::Exact => 0,
        MatchMode::AllowOneSubstitution => 1,
    };

    let mut matches = Vec::new();

    for (genome_id, text) in texts.iter().enumerate() {
        let mut best: Option<(usize, usize)> = None;

        for position in 0..text.len() {
            let length = naive_matched_length(&text[position..], fragment, mismatch_budget);

            if length >= minimum_length && best.is_none_or(|(_, best_length)| length > best_length)
            {
                best = Some((position, length));
            }
        }

        if let Some((position, length)) = best {
            matches.push(DnaMatch {
                genome_name: genome_name(genome_id),
                position,
                length,
            });
        }
    }

    matches.sort_by(|a, b| a.genome_name.cmp(&b.genome_name));
    matches
}

fn naive_related(
    texts: &[Vec<u8>],
    query: &[u8],
    fragment_match_length: usize,
    mode: MatchMode,
    match_percent_threshold: f64,
) -> Vec<GenomeMatch> {
    let num_chunks = query.len() / fragment_match_length;
    let mut hits: HashMap<String, usize> = HashMap::new();

    for chunk in query.chunks_exact(fragment_match_length) {
        for dna_match in naive_search(texts, chunk, fragment_match_length, mode) {
            *hits.entry(dna_match.genome_name).or_default() += 1;
        }
    }

    let mut results: Vec<_> = hits
        .into_iter()
        .map(|(genome_name, num_hits)| GenomeMatch {
            genome_name,
            percent_match: 100.0 * num_hits as f64 / num_chunks as f64,
        })
        .filter(|genome_match| genome_match.percent_match >= match_percent_threshold)
        .collect();

    results.sort_by(|a, b| {
        b.percent_match
            .total_cmp(&a.percent_match)
            .then_with(|| a.genome_name.cmp(&b.genome_name))
    });
    results
}

fn or_empty<T>(result: Result<Vec<T>, QueryError>) -> Vec<T> {
    match result {
        Ok(values) => values,
        Err(QueryError::NoMatch) => Vec::new(),
        Err(e) => panic!("unexpected query error: {e}"),
    }
}

fn random_texts() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(
        prop::collection::vec((0usize..5).prop_map(|i| SYMBOLS[i]), 0..400),
        1..5,
    )
}

#[test]
fn indexed_windows_are_found() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let texts: Vec<Vec<u8>> = RandomFragmentGenerator {
        min_len: 50,
        max_len: 200,
        rng: &mut rng,
    }
    .take(4)
    .collect();

    let minimum_search_length = 6;
    let index = create_index(&texts, minimum_search_length, true);

    for (genome_id, text) in texts.iter().enumerate() {
        for (offset, window) in text.windows(minimum_search_length).enumerate() {
            let matches = index
                .find_genomes_with_this_dna(window, minimum_search_length, MatchMode::Exact)
                .unwrap();

            let dna_match = matches
                .iter()
                .find(|m| m.genome_name == genome_name(genome_id))
                .unwrap();

            assert_eq!(dna_match.length, minimum_search_length);
            assert!(dna_match.position <= offset);
            assert_eq!(
                &text[dna_match.position..dna_match.position + minimum_search_length],
                window
            );

            if !text[..offset + minimum_search_length - 1]
                .windows(minimum_search_length)
                .any(|w| w == window)
            {
                assert_eq!(dna_match.position, offset);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_failure_persistence(prop::test_runner::FileFailurePersistence::WithSource("proptest-regressions")))]

    #[test]
    fn fragment_search_equals_naive_search(
        texts in random_texts(),
        minimum_search_length in 1usize..7,
        additional_minimum_length in 0usize..3,
        seed in any::<u64>()
    ) {
        let index = create_index(&texts, minimum_search_length, true);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let existing_fragments: Vec<_> = FragmentSampler {
            texts: &texts,
            rng: &mut rng,
            min_len: minimum_search_length,
            max_extent: 40,
        }
        .take(20)
        .collect();

        for (genome_id, position, fragment) in existing_fragments {
            let minimum_length = std::cmp::min(
                minimum_search_length + additional_minimum_length,
                fragment.len(),
            );

            let matches = index
                .find_genomes_with_this_dna(fragment, minimum_length, MatchMode::Exact)
                .unwrap();
            let dna_match = matches
                .iter()
                .find(|m| m.genome_name == genome_name(genome_id))
                .unwrap();

            prop_assert_eq!(dna_match.length, fragment.len());
            prop_assert!(dna_match.position <= position);

            // a single substitution is found with the full length as well
            let mutated = substitute_one(fragment, &mut rng);
            let matches = index
                .find_genomes_with_this_dna(&mutated, minimum_length, MatchMode::AllowOneSubstitution)
                .unwrap();
            let dna_match = matches
                .iter()
                .find(|m| m.genome_name == genome_name(genome_id))
                .unwrap();

            prop_assert_eq!(dna_match.length, fragment.len());
            prop_assert!(dna_match.position <= position);

            for mode in [MatchMode::Exact, MatchMode::AllowOneSubstitution] {
                let results = or_empty(index.find_genomes_with_this_dna(&mutated, minimum_length, mode));
                prop_assert_eq!(results, naive_search(&texts, &mutated, minimum_length, mode));
            }
        }

        let random_fragments: Vec<_> = RandomFragmentGenerator {
            min_len: minimum_search_length + additional_minimum_length,
            max_len: minimum_search_length + additional_minimum_length + 12,
            rng: &mut rng,
        }
        .take(50)
        .collect();

        let minimum_length = minimum_search_length + additional_minimum_length;

        for fragment in random_fragments {
            for mode in [MatchMode::Exact, MatchMode::AllowOneSubstitution] {
                let results = or_empty(index.find_genomes_with_this_dna(&fragment, minimum_length, mode));
                prop_assert_eq!(results, naive_search(&texts, &fragment, minimum_length, mode));
            }
        }
    }

    #[test]
    fn related_genomes_equal_naive_scoring(
        texts in random_texts(),
        minimum_search_length in 1usize..6,
        additional_fragment_length in 0usize..4,
        match_percent_threshold in 0.0f64..=100.0,
        num_threads in 1u16..4,
        seed in any::<u64>()
    ) {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads as usize)
            .build()
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let fragment_match_length = minimum_search_length + additional_fragment_length;

        // queries are stitched together from indexed and random pieces
        let mut query = Vec::new();
        let indexed_pieces: Vec<_> = FragmentSampler {
            texts: &texts,
            rng: &mut rng,
            min_len: fragment_match_length,
            max_extent: 3 * fragment_match_length,
        }
        .take(5)
        .map(|(_, _, piece)| piece.to_vec())
        .collect();
        let random_pieces: Vec<_> = RandomFragmentGenerator {
            min_len: 1,
            max_len: 2 * fragment_match_length,
            rng: &mut rng,
        }
        .take(5)
        .collect();

        for (indexed, random) in indexed_pieces.iter().zip(&random_pieces) {
            query.extend_from_slice(indexed);
            query.extend_from_slice(random);
        }

        // the query is never shorter than one chunk
        let padding = RandomFragmentGenerator {
            min_len: fragment_match_length,
            max_len: fragment_match_length,
            rng: &mut rng,
        }
        .next()
        .unwrap();
        query.extend_from_slice(&padding);

        let query = Genome::new("query", query);
        let parallel_index = create_index(&texts, minimum_search_length, true);
        let sequential_index = create_index(&texts, minimum_search_length, false);

        for mode in [MatchMode::Exact, MatchMode::AllowOneSubstitution] {
            let expected = naive_related(
                &texts,
                query.sequence(),
                fragment_match_length,
                mode,
                match_percent_threshold,
            );

            let parallel_results = pool.install(|| {
                parallel_index.find_related_genomes(&query, fragment_match_length, mode, match_percent_threshold)
            });
            let sequential_results = sequential_index
                .find_related_genomes(&query, fragment_match_length, mode, match_percent_threshold);

            prop_assert_eq!(or_empty(parallel_results), expected.clone());
            prop_assert_eq!(or_empty(sequential_results), expected);
        }
    }

    #[test]
    fn raising_the_threshold_never_adds_genomes(
        texts in random_texts(),
        query in prop::collection::vec((0usize..5).prop_map(|i| SYMBOLS[i]), 8..200),
        lower_threshold in 0.0f64..=100.0,
        threshold_increase in 0.0f64..=50.0
    ) {
        let index = create_index(&texts, 4, true);
        let query = Genome::new("query", query);

        for mode in [MatchMode::Exact, MatchMode::AllowOneSubstitution] {
            let lower = or_empty(index.find_related_genomes(&query, 4, mode, lower_threshold));
            let higher = or_empty(index.find_related_genomes(&query, 4, mode, lower_threshold + threshold_increase));

            for genome_match in higher {
                prop_assert!(lower.contains(&genome_match));
            }
        }
    }

    #[test]
    fn lengths_below_minimum_search_length_fail(
        texts in random_texts(),
        minimum_search_length in 2usize..10,
        fragment in prop::collection::vec((0usize..5).prop_map(|i| SYMBOLS[i]), 10..30)
    ) {
        let index = create_index(&texts, minimum_search_length, true);
        let too_short = minimum_search_length - 1;
        let query = Genome::new("query", fragment.as_slice());

        for mode in [MatchMode::Exact, MatchMode::AllowOneSubstitution] {
            let is_below_index = |e| matches!(e, QueryError::MinimumLengthBelowIndex { .. });

            prop_assert!(index.find_genomes_with_this_dna(&fragment, too_short, mode).is_err_and(is_below_index));
            prop_assert!(index.find_related_genomes(&query, too_short, mode, 0.0).is_err_and(is_below_index));
        }
    }
}
