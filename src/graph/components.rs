use std::fmt;

/// An ordered partition of a digraph's vertices into strongly connected
/// components.
///
/// The component order is the emission order of [`strong_components`]: a valid
/// reverse-topological order of the condensation graph, meaning that for any
/// edge `(u, v)` crossing components, the component of `u` appears no later
/// than the component of `v`. Each component carries a recurrent flag
/// (more than one vertex, or a single vertex with a self-loop).
///
/// [`strong_components`]: crate::graph::strong_components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Components {
    /// All vertices, grouped by component.
    vertices: Vec<u64>,
    /// Block boundaries into `vertices`; component `i` is
    /// `vertices[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<usize>,
    recurrent: Vec<bool>,
    which_component: Vec<u64>,
    recurrent_select: Vec<u64>,
}

impl Components {
    /// Assemble a partition from the flat vertex array, its block boundaries
    /// and the per-component recurrent flags.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` does not describe `recurrent.len()` consecutive
    /// blocks covering `vertices` exactly.
    pub fn new(vertices: Vec<u64>, offsets: Vec<usize>, recurrent: Vec<bool>) -> Components {
        assert_eq!(offsets.len(), recurrent.len() + 1, "offsets/flags mismatch");
        assert_eq!(*offsets.last().unwrap_or(&0), vertices.len());
        let max_vertex = vertices.iter().copied().max().map_or(0, |v| v + 1);
        let mut which_component = vec![0; max_vertex as usize];
        for i in 0..recurrent.len() {
            for &v in &vertices[offsets[i]..offsets[i + 1]] {
                which_component[v as usize] = i as u64;
            }
        }
        let recurrent_select = recurrent
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r)
            .map(|(i, _)| i as u64)
            .collect();
        Components {
            vertices,
            offsets,
            recurrent,
            which_component,
            recurrent_select,
        }
    }

    /// Number of components.
    pub fn size(&self) -> u64 {
        self.recurrent.len() as u64
    }

    /// The `i`th component, in emission order.
    pub fn component(&self, i: u64) -> &[u64] {
        &self.vertices[self.offsets[i as usize]..self.offsets[i as usize + 1]]
    }

    /// All components in emission order.
    pub fn components(&self) -> impl Iterator<Item = &[u64]> {
        (0..self.size()).map(|i| self.component(i))
    }

    /// `true` iff component `i` is recurrent.
    pub fn is_recurrent(&self, i: u64) -> bool {
        self.recurrent[i as usize]
    }

    /// Number of recurrent components.
    pub fn recurrent_count(&self) -> u64 {
        self.recurrent_select.len() as u64
    }

    /// The `rank`th recurrent component (rank follows emission order).
    pub fn recurrent_component(&self, rank: u64) -> &[u64] {
        self.component(self.recurrent_select[rank as usize])
    }

    /// The recurrent components in emission order.
    pub fn recurrent_components(&self) -> impl Iterator<Item = &[u64]> {
        self.recurrent_select.iter().map(|&i| self.component(i))
    }

    /// The component index a vertex belongs to.
    pub fn which_component(&self, v: u64) -> u64 {
        self.which_component[v as usize]
    }

    /// Array-of-arrays text form, one inner array per component.
    pub fn stringify(&self) -> String {
        let lists: Vec<&[u64]> = self.components().collect();
        serde_json::to_string(&lists).expect("component lists serialize")
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}
