use crate::{Alphabet, Cursor};

/// A prefix tree over symbols, where every node stores the values of the keys ending there.
///
/// Keys are arbitrary byte strings. Inserting the same key multiple times accumulates values.
/// Lookups always consume the whole key, partial prefix matches are never reported.
///
/// The [`Alphabet`] of the trie determines which substitutes are tried by
/// [`find_with_one_substitution`](Trie::find_with_one_substitution).
#[cfg_attr(feature = "mem_dbg", derive(mem_dbg::MemSize, mem_dbg::MemDbg))]
#[derive(Debug, Clone)]
pub struct Trie<V> {
    root: Node<V>,
    alphabet: Alphabet,
    num_nodes: usize,
    num_values: usize,
}

#[cfg_attr(feature = "mem_dbg", derive(mem_dbg::MemSize, mem_dbg::MemDbg))]
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    symbol: u8,
    // symbols of children are pairwise distinct
    children: Vec<Node<V>>,
    values: Vec<V>,
}

impl<V> Node<V> {
    fn new(symbol: u8) -> Self {
        Self {
            symbol,
            children: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn child(&self, symbol: u8) -> Option<&Node<V>> {
        self.children.iter().find(|child| child.symbol == symbol)
    }

    pub(crate) fn values(&self) -> &[V] {
        &self.values
    }

    fn descend(&self, key: &[u8]) -> Option<&Node<V>> {
        let mut node = self;

        for &symbol in key {
            node = node.child(symbol)?;
        }

        Some(node)
    }
}

impl<V> Trie<V> {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            // the root symbol is never inspected
            root: Node::new(0),
            alphabet,
            num_nodes: 1,
            num_values: 0,
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Number of nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of values stored over all keys.
    pub fn num_values(&self) -> usize {
        self.num_values
    }

    /// Adds `value` to the node spelling `key`. Nodes for the unmatched tail of `key` are created.
    ///
    /// Inserting under the empty key does nothing.
    pub fn insert(&mut self, key: &[u8], value: V) {
        if key.is_empty() {
            return;
        }

        let mut node = &mut self.root;

        for &symbol in key {
            let child_idx = match node.children.iter().position(|child| child.symbol == symbol) {
                Some(idx) => idx,
                None => {
                    node.children.push(Node::new(symbol));
                    self.num_nodes += 1;
                    node.children.len() - 1
                }
            };

            node = &mut node.children[child_idx];
        }

        node.values.push(value);
        self.num_values += 1;
    }

    /// Returns a cursor that points to the root of the trie, i.e. the empty key.
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor {
            node: Some(&self.root),
            depth: 0,
        }
    }

    /// Returns a cursor for the whole `key`.
    pub fn cursor_for_key(&self, key: &[u8]) -> Cursor<'_, V> {
        let mut cursor = self.cursor();

        for &symbol in key {
            cursor.extend_key_back(symbol);

            if cursor.is_empty() {
                break;
            }
        }

        cursor
    }

    /// Returns the values stored under exactly `key`.
    ///
    /// The result is empty if `key` is empty or no path spells all of `key`.
    pub fn find_exact(&self, key: &[u8]) -> &[V] {
        if key.is_empty() {
            return &[];
        }

        self.cursor_for_key(key).values()
    }

    /// Returns the values stored under every key that differs from `key` in exactly one position.
    ///
    /// Only the canonical symbols of the alphabet are considered as substitutes. Values stored under `key`
    /// itself are not part of the result. The order of the values is unspecified.
    pub fn find_with_one_substitution(&self, key: &[u8]) -> Vec<&V> {
        let mut results = Vec::new();
        let mut node = &self.root;

        // walk the exact path and branch off once at every depth
        for (depth, &symbol) in key.iter().enumerate() {
            let rest = &key[depth + 1..];

            for substitute_child in node.children.iter().filter(|child| {
                child.symbol != symbol && self.alphabet.symbols().contains(&child.symbol)
            }) {
                if let Some(end) = substitute_child.descend(rest) {
                    results.extend(end.values.iter());
                }
            }

            match node.child(symbol) {
                Some(child) => node = child,
                None => break,
            }
        }

        results
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}
