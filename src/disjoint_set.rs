/// Disjoint set (union-find) over the flat cell indices of a grid.
///
/// Only the Kruskal generator needs this: it answers "are these two cells
/// already connected by some chain of passages" in near-constant time. Finds
/// apply full path compression, unions merge by rank, and there is no removal
/// operation.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl DisjointSet {
    pub fn new(count: usize) -> DisjointSet {
        DisjointSet {
            parents: (0..count).collect(),
            ranks: vec![0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// The representative element of `node`'s set.
    ///
    /// Every node visited on the way to the root is rebound directly to the
    /// root, so repeat finds along the same chain stop being walks at all.
    pub fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        let mut current = node;
        while self.parents[current] != root {
            let parent = self.parents[current];
            self.parents[current] = root;
            current = parent;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false when they were
    /// already the same set (a redundant union changes nothing).
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        if self.ranks[root_a] > self.ranks[root_b] {
            self.parents[root_b] = root_a;
        } else {
            self.parents[root_a] = root_b;
            if self.ranks[root_a] == self.ranks[root_b] {
                self.ranks[root_b] += 1;
            }
        }
        true
    }
}
