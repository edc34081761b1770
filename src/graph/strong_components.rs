use crate::graph::{Components, Digraph};
use log::debug;

/// Partition `digraph` into strongly connected components.
///
/// Iterative Tarjan with an explicit frame stack: domain graphs can have far
/// too many vertices for native call-stack recursion. Each vertex receives a
/// discovery index and a lowlink; a component closes when its root's lowlink
/// equals its discovery index, consuming vertices off the auxiliary stack down
/// to and including the root. Components are emitted in reverse completion
/// order, which is a reverse-topological order of the condensation graph.
pub fn strong_components(digraph: &Digraph) -> Components {
    const UNVISITED: u64 = u64::MAX;
    let n = digraph.size() as usize;
    let mut discovery = vec![UNVISITED; n];
    let mut lowlink = vec![0u64; n];
    let mut committed = vec![false; n];
    let mut self_loop = vec![false; n];
    // Tarjan's auxiliary stack of vertices not yet assigned to a component.
    let mut pending: Vec<u64> = Vec::new();
    // Explicit DFS stack of (vertex, next adjacency position).
    let mut frames: Vec<(u64, usize)> = Vec::new();
    let mut counter: u64 = 0;
    // Components in completion order, vertices in pop order; both reversed
    // at the end.
    let mut blocks: Vec<(Vec<u64>, bool)> = Vec::new();

    for root in 0..n {
        if discovery[root] != UNVISITED {
            continue;
        }
        discovery[root] = counter;
        lowlink[root] = counter;
        counter += 1;
        pending.push(root as u64);
        frames.push((root as u64, 0));
        while let Some(&(v, position)) = frames.last() {
            let vi = v as usize;
            let adjacencies = digraph.adjacencies(v);
            if position < adjacencies.len() {
                frames.last_mut().expect("frame exists").1 += 1;
                let w = adjacencies[position];
                let wi = w as usize;
                if w == v {
                    self_loop[vi] = true;
                }
                if discovery[wi] == UNVISITED {
                    discovery[wi] = counter;
                    lowlink[wi] = counter;
                    counter += 1;
                    pending.push(w);
                    frames.push((w, 0));
                } else if !committed[wi] {
                    lowlink[vi] = lowlink[vi].min(discovery[wi]);
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    let pi = parent as usize;
                    lowlink[pi] = lowlink[pi].min(lowlink[vi]);
                }
                if lowlink[vi] == discovery[vi] {
                    let mut block = Vec::new();
                    loop {
                        let w = pending.pop().expect("component root is on the stack");
                        committed[w as usize] = true;
                        block.push(w);
                        if w == v {
                            break;
                        }
                    }
                    let recurrent = block.len() > 1 || self_loop[vi];
                    blocks.push((block, recurrent));
                }
            }
        }
    }

    let mut vertices = Vec::with_capacity(n);
    let mut offsets = Vec::with_capacity(blocks.len() + 1);
    let mut recurrent = Vec::with_capacity(blocks.len());
    offsets.push(0);
    for (block, flag) in blocks.iter().rev() {
        vertices.extend(block.iter().rev().copied());
        offsets.push(vertices.len());
        recurrent.push(*flag);
    }
    let components = Components::new(vertices, offsets, recurrent);
    debug!(
        "partitioned {} vertices into {} components ({} recurrent)",
        n,
        components.size(),
        components.recurrent_count()
    );
    components
}
