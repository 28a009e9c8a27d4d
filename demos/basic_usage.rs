use genome_matcher::{Genome, GenomeIndex, MatchMode};

fn main() {
    // This example shows how to index genomes and search for fragments in them.

    let text = ">Ferroplasma acidarmanus\nACGTACGTTTGCAACG\n>Halobacterium jilantaiense\nTTTTGCAACGTACGTA\n";
    let genomes = Genome::load(text.as_bytes()).expect("the text is valid");

    let mut index = GenomeIndex::<u32>::new(4).expect("window length is not zero");

    for genome in genomes {
        index.add_genome(genome).expect("genomes are short");
    }

    // the fragment occurs exactly in both genomes
    let matches = index
        .find_genomes_with_this_dna(b"TTGCAACG", 4, MatchMode::Exact)
        .expect("fragment occurs");

    for dna_match in &matches {
        println!(
            "Found fragment in genome {} at position {} with length {}.",
            dna_match.genome_name, dna_match.position, dna_match.length
        );
    }

    // with a single substituted base, only a SNP tolerant search finds it
    let fragment_with_snp = b"TTGCTACG";
    assert!(
        index
            .find_genomes_with_this_dna(fragment_with_snp, 8, MatchMode::Exact)
            .is_err()
    );

    let matches = index
        .find_genomes_with_this_dna(fragment_with_snp, 8, MatchMode::AllowOneSubstitution)
        .expect("fragment occurs with one substitution");

    assert_eq!(matches.len(), 2);
}
