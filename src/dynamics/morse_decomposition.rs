use crate::graph::{Components, Digraph, Poset, strong_components};
use log::debug;
use std::fmt;

/// The reachability poset over the recurrent components of a digraph.
///
/// Morse set `i` is the `i`th recurrent component in emission order; the
/// poset records which Morse sets reach which. Vertices here are *not*
/// canonically numbered; canonical numbering happens at the
/// [`MorseGraph`](crate::dynamics::MorseGraph) level only.
#[derive(Clone, Debug)]
pub struct MorseDecomposition {
    components: Components,
    poset: Poset,
}

impl MorseDecomposition {
    /// Decompose `digraph`, computing its strong components first.
    pub fn new(digraph: &Digraph) -> MorseDecomposition {
        MorseDecomposition::with_components(digraph, strong_components(digraph))
    }

    /// Decompose `digraph` given its precomputed components.
    ///
    /// Walks the components in emission order, maintaining per component a
    /// bitmask of the recurrent components that reach it; every graph edge
    /// ORs the source mask into the target. With more than 64 recurrent
    /// components the linear scan repeats once per 64-wide cohort. The
    /// accumulated edges transitively reduce into the Hasse diagram.
    pub fn with_components(digraph: &Digraph, components: Components) -> MorseDecomposition {
        let component_count = components.size();
        let recurrent_count = components.recurrent_count();
        let recurrent_indices: Vec<u64> = (0..component_count)
            .filter(|&i| components.is_recurrent(i))
            .collect();

        let mut reachability: Vec<Vec<u64>> = vec![Vec::new(); recurrent_count as usize];
        let cohorts = recurrent_count.div_ceil(64);
        let mut reach_info = vec![0u64; component_count as usize];
        for cohort in 0..cohorts {
            if cohort > 0 {
                reach_info.fill(0);
            }
            // Give each recurrent component in the cohort a unique bit.
            let base = 64 * cohort;
            for bit in 0..64u64 {
                let Some(&component) = recurrent_indices.get((base + bit) as usize) else {
                    break;
                };
                reach_info[component as usize] = 1u64 << bit;
            }
            // One pass in emission order fully propagates reachability: a
            // component's mask is final by the time its turn comes.
            for (parent, component) in components.components().enumerate() {
                let parent_mask = reach_info[parent];
                for &u in component {
                    for &v in digraph.adjacencies(u) {
                        let child = components.which_component(v) as usize;
                        reach_info[child] |= parent_mask;
                    }
                }
            }
            for (i, &component) in recurrent_indices.iter().enumerate() {
                let mut code = reach_info[component as usize];
                let mut ancestor = base;
                while code != 0 {
                    if code & 1 != 0 {
                        reachability[ancestor as usize].push(i as u64);
                    }
                    code >>= 1;
                    ancestor += 1;
                }
            }
        }

        let poset = Poset::new(&Digraph::from_adjacencies(reachability));
        debug!(
            "morse decomposition: {} morse sets among {} components",
            recurrent_count, component_count
        );
        MorseDecomposition { components, poset }
    }

    /// The reachability poset over Morse sets.
    pub fn poset(&self) -> &Poset {
        &self.poset
    }

    /// The underlying component partition.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// The vertices of the `i`th Morse set.
    pub fn morse_set(&self, i: u64) -> &[u64] {
        self.components.recurrent_component(i)
    }

    /// Graphviz text form; each vertex is labelled with its Morse set.
    pub fn graphviz(&self) -> String {
        let mut out = String::from("digraph {\n");
        for v in 0..self.poset.size() {
            let members: Vec<String> = self.morse_set(v).iter().map(u64::to_string).collect();
            out.push_str(&format!("{v}[label=\"{}\"];\n", members.join(", ")));
        }
        for source in 0..self.poset.size() {
            for &target in self.poset.children(source) {
                out.push_str(&format!("{source} -> {target};\n"));
            }
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for MorseDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}
