use crate::error::Error;
use std::collections::HashSet;
use std::fmt;

/// A directed graph under construction.
///
/// [`add_vertex`](DigraphBuilder::add_vertex) and
/// [`add_edge`](DigraphBuilder::add_edge) append without deduplication.
/// [`finalize`](DigraphBuilder::finalize) sorts every adjacency list and
/// yields an immutable [`Digraph`]; the operations that rely on sorted
/// adjacencies (closure, reduction, equality) only exist on the finalized
/// type, so an unsorted graph cannot reach them.
#[derive(Clone, Debug, Default)]
pub struct DigraphBuilder {
    adjacencies: Vec<Vec<u64>>,
}

impl DigraphBuilder {
    pub fn new() -> DigraphBuilder {
        DigraphBuilder::default()
    }

    /// A builder with `n` vertices and no edges.
    pub fn with_vertices(n: u64) -> DigraphBuilder {
        DigraphBuilder {
            adjacencies: vec![Vec::new(); n as usize],
        }
    }

    /// Add a new vertex and return its index.
    pub fn add_vertex(&mut self) -> u64 {
        self.adjacencies.push(Vec::new());
        self.adjacencies.len() as u64 - 1
    }

    /// Add the edge `source -> target`. Duplicates are kept.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not a vertex of the graph.
    pub fn add_edge(&mut self, source: u64, target: u64) {
        self.adjacencies[source as usize].push(target);
    }

    /// Sort all adjacency lists and freeze the graph.
    pub fn finalize(mut self) -> Digraph {
        for list in &mut self.adjacencies {
            list.sort_unstable();
        }
        Digraph {
            adjacencies: self.adjacencies,
        }
    }
}

impl From<Vec<Vec<u64>>> for DigraphBuilder {
    fn from(adjacencies: Vec<Vec<u64>>) -> DigraphBuilder {
        DigraphBuilder { adjacencies }
    }
}

/// An immutable directed graph with sorted adjacency lists.
///
/// Values of this type only come out of [`DigraphBuilder::finalize`] (or the
/// derived views below), so every adjacency list is sorted and the graph can
/// be compared for equality structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digraph {
    adjacencies: Vec<Vec<u64>>,
}

impl Digraph {
    /// Finalize the given adjacency lists directly.
    pub fn from_adjacencies(adjacencies: Vec<Vec<u64>>) -> Digraph {
        DigraphBuilder::from(adjacencies).finalize()
    }

    /// Number of vertices.
    pub fn size(&self) -> u64 {
        self.adjacencies.len() as u64
    }

    /// Out-neighbors of `v`, sorted ascending.
    pub fn adjacencies(&self, v: u64) -> &[u64] {
        &self.adjacencies[v as usize]
    }

    /// The graph with every edge reversed.
    pub fn transpose(&self) -> Digraph {
        let n = self.adjacencies.len();
        let mut adjacencies = vec![Vec::new(); n];
        for (i, list) in self.adjacencies.iter().enumerate() {
            for &j in list {
                adjacencies[j as usize].push(i as u64);
            }
        }
        Digraph::from_adjacencies(adjacencies)
    }

    /// The transitive closure of the graph.
    ///
    /// Seeds each vertex's direct successor and predecessor sets and then, for
    /// every vertex `k`, propagates `k`'s successors to every predecessor of
    /// `k` and vice versa (set-based reachability in Floyd-Warshall order, no
    /// N x N matrix and no recursion). Self-edges are never introduced; a
    /// vertex reaches itself in the result only if the input says so directly.
    pub fn transitive_closure(&self) -> Digraph {
        let n = self.adjacencies.len();
        let mut closure: Vec<HashSet<u64>> = vec![HashSet::new(); n];
        let mut transpose: Vec<HashSet<u64>> = vec![HashSet::new(); n];
        for (i, list) in self.adjacencies.iter().enumerate() {
            for &j in list {
                closure[i].insert(j);
                transpose[j as usize].insert(i as u64);
            }
        }
        for k in 0..n {
            let successors: Vec<u64> = closure[k].iter().copied().collect();
            let predecessors: Vec<u64> = transpose[k].iter().copied().collect();
            for &j in &successors {
                for &i in &predecessors {
                    if i == j {
                        continue;
                    }
                    closure[i as usize].insert(j);
                    transpose[j as usize].insert(i);
                }
            }
        }
        let adjacencies = closure
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();
        Digraph::from_adjacencies(adjacencies)
    }

    /// The transitive reduction (Hasse diagram) of the graph: the unique
    /// minimal edge set with the same closure. Removes self-edges and every
    /// edge that is also witnessed by a two-hop path.
    ///
    /// # Panics
    ///
    /// The input must be a transitively closed DAG whose vertex numbering is
    /// a topological order (self-loops permitted); the preconditions are
    /// checked and violations panic rather than producing a silently wrong
    /// reduction.
    pub fn transitive_reduction(&self) -> Digraph {
        let n = self.adjacencies.len();
        for (u, list) in self.adjacencies.iter().enumerate() {
            for &v in list {
                assert!(
                    v >= u as u64,
                    "transitive_reduction requires a topologically ordered DAG: \
                     edge {u} -> {v} goes backwards"
                );
            }
        }
        let mut adjacencies = Vec::with_capacity(n);
        for u in 0..n {
            let mut double_hop = HashSet::new();
            double_hop.insert(u as u64);
            for &v in &self.adjacencies[u] {
                if v == u as u64 {
                    continue;
                }
                for &w in &self.adjacencies[v as usize] {
                    if w == v {
                        continue;
                    }
                    double_hop.insert(w);
                }
            }
            for &w in &double_hop {
                assert!(
                    w == u as u64 || self.adjacencies[u].binary_search(&w).is_ok(),
                    "transitive_reduction requires a transitively closed digraph: \
                     {u} reaches {w} in two hops but has no direct edge"
                );
            }
            let reduced = self.adjacencies[u]
                .iter()
                .copied()
                .filter(|v| !double_hop.contains(v))
                .collect();
            adjacencies.push(reduced);
        }
        Digraph::from_adjacencies(adjacencies)
    }

    /// Relabel vertex `i` as `permutation[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `permutation` is not a permutation of the vertex indices.
    pub fn permute(&self, permutation: &[u64]) -> Digraph {
        let n = self.adjacencies.len();
        assert_eq!(permutation.len(), n, "permutation size mismatch");
        let mut adjacencies = vec![Vec::new(); n];
        for (i, list) in self.adjacencies.iter().enumerate() {
            let u = permutation[i] as usize;
            for &j in list {
                adjacencies[u].push(permutation[j as usize]);
            }
        }
        Digraph::from_adjacencies(adjacencies)
    }

    /// Array-of-arrays text form; entry `i` lists the out-neighbors of `i`.
    pub fn stringify(&self) -> String {
        serde_json::to_string(&self.adjacencies).expect("adjacency lists serialize")
    }

    /// Parse the [`stringify`](Digraph::stringify) text form.
    pub fn parse(text: &str) -> Result<Digraph, Error> {
        let adjacencies: Vec<Vec<u64>> = serde_json::from_str(text)?;
        Ok(Digraph::from_adjacencies(adjacencies))
    }

    /// Graphviz text form.
    pub fn graphviz(&self) -> String {
        let mut out = String::from("digraph {\n");
        for v in 0..self.adjacencies.len() {
            out.push_str(&format!("{v};\n"));
        }
        for (source, list) in self.adjacencies.iter().enumerate() {
            for &target in list {
                out.push_str(&format!("{source} -> {target};\n"));
            }
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}
