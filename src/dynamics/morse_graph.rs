use crate::dynamics::{Annotation, MorseDecomposition};
use crate::error::Error;
use crate::graph::Poset;
use crate::phase::DomainGraph;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A Morse decomposition's poset with one [`Annotation`] per recurrent class,
/// canonically renumbered so that isomorphic Morse graphs serialize
/// identically regardless of the vertex numbering they were built with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MorseGraph {
    poset: Poset,
    annotations: Vec<Annotation>,
}

impl MorseGraph {
    /// Annotate `decomposition`'s Morse sets against `domain_graph` and
    /// canonicalize.
    pub fn new(domain_graph: &DomainGraph, decomposition: &MorseDecomposition) -> MorseGraph {
        let poset = decomposition.poset().clone();
        let annotations = (0..poset.size())
            .map(|v| domain_graph.annotate(decomposition.morse_set(v)))
            .collect();
        MorseGraph::from_parts(poset, annotations)
    }

    /// Assemble and canonicalize a Morse graph from an already-annotated
    /// poset.
    ///
    /// # Panics
    ///
    /// Panics unless there is exactly one annotation per poset vertex.
    pub fn from_parts(poset: Poset, annotations: Vec<Annotation>) -> MorseGraph {
        assert_eq!(poset.size() as usize, annotations.len(), "one annotation per vertex");
        let mut morse_graph = MorseGraph { poset, annotations };
        morse_graph.canonicalize();
        morse_graph
    }

    pub fn poset(&self) -> &Poset {
        &self.poset
    }

    /// The annotation of vertex `v`.
    pub fn annotation(&self, v: u64) -> &Annotation {
        &self.annotations[v as usize]
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Renumber vertices into the canonical order.
    ///
    /// Vertices sort on the tuple: poset order (`u < v` puts `u` first),
    /// parent count ascending, ancestor count ascending, descendant count
    /// *descending*, child count *descending*, annotation count ascending
    /// then lexicographic annotation comparison, original index ascending.
    /// The ancestor-ascending/descendant-descending asymmetry is part of the
    /// canonical form; every serialized Morse graph depends on it.
    fn canonicalize(&mut self) {
        let n = self.poset.size() as usize;
        let mut inverse_permutation: Vec<u64> = (0..n as u64).collect();
        inverse_permutation.sort_by(|&i, &j| self.compare_vertices(i, j));
        let mut permutation = vec![0u64; n];
        for (new_index, &old_index) in inverse_permutation.iter().enumerate() {
            permutation[old_index as usize] = new_index as u64;
        }
        self.poset = self.poset.permute(&permutation);
        let mut annotations = vec![Annotation::new(); n];
        for (old_index, annotation) in self.annotations.drain(..).enumerate() {
            annotations[permutation[old_index] as usize] = annotation;
        }
        self.annotations = annotations;
    }

    fn compare_vertices(&self, i: u64, j: u64) -> Ordering {
        if i == j {
            return Ordering::Equal;
        }
        if self.poset.compare(i, j) {
            return Ordering::Less;
        }
        if self.poset.compare(j, i) {
            return Ordering::Greater;
        }
        let poset = &self.poset;
        let order = (poset.parents(i).len().cmp(&poset.parents(j).len()))
            .then_with(|| poset.ancestors(i).len().cmp(&poset.ancestors(j).len()))
            .then_with(|| poset.descendants(j).len().cmp(&poset.descendants(i).len()))
            .then_with(|| poset.children(j).len().cmp(&poset.children(i).len()));
        if order != Ordering::Equal {
            return order;
        }
        let a = &self.annotations[i as usize];
        let b = &self.annotations[j as usize];
        a.len()
            .cmp(&b.len())
            .then_with(|| a.iter().cmp(b.iter()))
            .then_with(|| i.cmp(&j))
    }

    /// Text form `{"poset": ..., "annotations": [...]}`.
    pub fn stringify(&self) -> String {
        let annotations: Vec<Vec<&str>> = self
            .annotations
            .iter()
            .map(|annotation| annotation.iter().collect())
            .collect();
        // Built by hand to keep the field order stable regardless of how the
        // JSON library orders object keys.
        format!(
            "{{\"poset\":{},\"annotations\":{}}}",
            self.poset.stringify(),
            serde_json::to_string(&annotations).expect("annotations serialize")
        )
    }

    /// Parse the [`stringify`](MorseGraph::stringify) text form. The input is
    /// taken as already canonical and is not renumbered.
    pub fn parse(text: &str) -> Result<MorseGraph, Error> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(Error::TextForm {
            what: "morse graph object",
        })?;
        let poset_value = object.get("poset").ok_or(Error::TextForm { what: "poset field" })?;
        let poset = Poset::parse(&poset_value.to_string())?;
        let annotations_value = object.get("annotations").ok_or(Error::TextForm {
            what: "annotations field",
        })?;
        let entries = annotations_value.as_array().ok_or(Error::TextForm {
            what: "annotation array",
        })?;
        if entries.len() as u64 != poset.size() {
            return Err(Error::TextForm {
                what: "annotation count",
            });
        }
        let annotations = entries
            .iter()
            .map(Annotation::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MorseGraph { poset, annotations })
    }

    /// Graphviz text form; each vertex is labelled with its annotation.
    pub fn graphviz(&self) -> String {
        let mut out = String::from("digraph {\n");
        for v in 0..self.poset.size() {
            let labels: Vec<&str> = self.annotations[v as usize].iter().collect();
            out.push_str(&format!("{v}[label=\"{}\"];\n", labels.join(", ")));
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

impl fmt::Display for MorseGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}
