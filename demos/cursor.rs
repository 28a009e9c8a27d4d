use genome_matcher::Trie;

fn main() {
    // This example showcases the cursor API of the trie that powers the genome index.

    let mut trie = Trie::default();
    trie.insert(b"GTAC", "first");
    trie.insert(b"GTAA", "second");
    trie.insert(b"GTAA", "third");

    // We obtain a cursor that points into the trie. The cursor maintains a currently searched key.
    // Symbols can iteratively be added to the back of this key.
    let mut cursor = trie.cursor_for_key(b"GTA");

    // Nothing was inserted under exactly this key.
    assert_eq!(cursor.count(), 0);

    // So we extend the currently searched key by a symbol.
    cursor.extend_key_back(b'A');

    // That's better!
    assert_eq!(cursor.values(), &["second", "third"]);

    // Keys that differ in exactly one position can be found directly.
    let mut substituted = trie.find_with_one_substitution(b"GTAC");
    substituted.sort();
    assert_eq!(substituted, [&"second", &"third"]);
}
