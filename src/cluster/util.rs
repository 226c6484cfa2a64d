/// Disjoint-set forest over dense indices `0..n`.
///
/// `union(i, j)` hangs the root of `i` directly under the root of `j`. There is
/// no rank or size heuristic; path compression in [`find`](Self::find) keeps
/// the amortized cost low enough for the quadratic passes that drive it.
///
/// # Panics
///
/// [`find`](Self::find), [`union`](Self::union) and
/// [`same_set`](Self::same_set) panic when an index is `>= len()`.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    /// Number of elements (not sets).
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True when the forest has no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `x`'s set, repointing every node on the path at the root.
    ///
    /// Iterative, so adversarial chains cannot overflow the stack.
    ///
    /// # Panics
    ///
    /// If `x >= self.len()`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `i` and `j`. Returns the surviving root.
    ///
    /// # Panics
    ///
    /// If `i` or `j` is `>= self.len()`.
    pub fn union(&mut self, i: usize, j: usize) -> usize {
        let ri = self.find(i);
        let rj = self.find(j);
        if ri != rj {
            self.parent[ri] = rj;
        }
        rj
    }

    /// True when `i` and `j` share a root.
    pub fn same_set(&mut self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    #[cfg(test)]
    fn parent_of(&self, x: usize) -> usize {
        self.parent[x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons() {
        let mut ds = DisjointSet::new(4);
        for i in 0..4 {
            assert_eq!(ds.find(i), i);
        }
        assert!(!ds.same_set(0, 1));
    }

    #[test]
    fn union_attaches_left_root_under_right_root() {
        let mut ds = DisjointSet::new(3);
        assert_eq!(ds.union(0, 1), 1);
        assert_eq!(ds.find(0), 1);
        assert_eq!(ds.union(1, 2), 2);
        assert_eq!(ds.find(0), 2);
        assert!(ds.same_set(0, 2));
    }

    #[test]
    fn union_same_set_is_noop() {
        let mut ds = DisjointSet::new(2);
        ds.union(0, 1);
        assert_eq!(ds.union(1, 0), 1);
        assert_eq!(ds.find(0), 1);
        assert_eq!(ds.find(1), 1);
    }

    #[test]
    fn find_compresses_long_chain() {
        let n = 100_000;
        let mut ds = DisjointSet::new(n);
        // Build a chain 0 -> 1 -> 2 -> ... -> n-1 without compression.
        for i in 0..n - 1 {
            ds.parent[i] = i + 1;
        }
        assert_eq!(ds.find(0), n - 1);
        for i in 0..n {
            assert_eq!(ds.parent_of(i), n - 1);
        }
    }

    #[test]
    #[should_panic]
    fn find_out_of_range_panics() {
        let mut ds = DisjointSet::new(3);
        ds.find(3);
    }

    #[test]
    #[should_panic]
    fn union_out_of_range_panics() {
        let mut ds = DisjointSet::new(3);
        ds.union(0, 5);
    }

    #[test]
    fn find_is_idempotent() {
        let mut ds = DisjointSet::new(6);
        ds.union(0, 1);
        ds.union(2, 3);
        ds.union(1, 3);
        let first: Vec<usize> = (0..6).map(|i| ds.find(i)).collect();
        let second: Vec<usize> = (0..6).map(|i| ds.find(i)).collect();
        assert_eq!(first, second);
    }
}
