use genome_matcher::{Genome, GenomeIndexConfig, MatchMode};

fn main() {
    // This example scores how related a query genome is to the indexed genomes.
    // The query is cut into chunks, and every chunk that occurs in a genome counts for it.

    let mut index = GenomeIndexConfig::<u32>::new()
        .minimum_search_length(5)
        .parallel(true)
        .construct_index()
        .expect("window length is not zero");

    let library = [
        Genome::new("Desulfurococcus mucosus", "GGCTAGCTTAGCACGTACGTACGTTTAGGA"),
        Genome::new("Ferroplasma acidarmanus", "TTGCAACGTAGGCAAAAAAACGTTGCAGGC"),
        Genome::new("Halobacterium jilantaiense", "ACGTTGCAACGTAGGCTAGCTTAGCNAAAT"),
    ];

    for genome in library {
        index.add_genome(genome).expect("genomes are short");
    }

    let query = Genome::new("query", "TTGCAACGTAGGCTAGCTTAGCACGTACGT");

    let related = index
        .find_related_genomes(&query, 5, MatchMode::AllowOneSubstitution, 20.0)
        .expect("some genomes are related");

    for genome_match in related {
        println!(
            "{:.1}% of the query occurs in {}.",
            genome_match.percent_match, genome_match.genome_name
        );
    }
}
