use crate::trie::Node;

/// A cursor to the [`Trie`](crate::Trie).
///
/// The cursor implicitly maintains a currently searched key. Symbols can iteratively be added to
/// the back of this key. At any point, the values stored under exactly the current key can be
/// retrieved cheaply.
///
/// Once the key leaves the paths of the trie, the cursor stays empty for all further extensions.
#[derive(Debug)]
pub struct Cursor<'a, V> {
    pub(crate) node: Option<&'a Node<V>>,
    pub(crate) depth: usize,
}

impl<'a, V> Clone for Cursor<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for Cursor<'a, V> {}

impl<'a, V> Cursor<'a, V> {
    /// Extends the currently searched key at the back by one symbol.
    ///
    /// The running time is linear in the number of children of the current node.
    pub fn extend_key_back(&mut self, symbol: u8) {
        self.node = self.node.and_then(|node| node.child(symbol));
        self.depth += 1;
    }

    /// Length of the currently searched key.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if no inserted key starts with the currently searched key.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Returns the values stored under exactly the currently searched key.
    pub fn values(&self) -> &'a [V] {
        match self.node {
            Some(node) => node.values(),
            None => &[],
        }
    }

    /// Returns the number of values stored under exactly the currently searched key.
    pub fn count(&self) -> usize {
        self.values().len()
    }
}
