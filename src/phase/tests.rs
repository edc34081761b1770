use crate::phase::{Domain, DomainGraph};
use crate::test_utils::{example_parameter_graph, init_logger, logic_dir};
use crate::parameter::{Network, ParameterGraph};

#[test]
fn domain_traversal() {
    let mut domain = Domain::new(vec![3, 2]);
    assert_eq!(domain.size(), 2);
    let mut seen = Vec::new();
    while domain.is_valid() {
        seen.push((domain.index(), domain.coordinate(0), domain.coordinate(1)));
        domain.advance();
    }
    assert!(!domain.is_valid());
    assert_eq!(
        seen,
        vec![(0, 0, 0), (1, 1, 0), (2, 2, 0), (3, 0, 1), (4, 1, 1), (5, 2, 1)]
    );
}

#[test]
fn domain_neighbors_and_extremes() {
    let mut domain = Domain::new(vec![3, 2]);
    domain.set_index(4);
    assert_eq!(domain.coordinate(0), 1);
    assert_eq!(domain.coordinate(1), 1);
    assert_eq!(domain.left(0), 3);
    assert_eq!(domain.right(0), 5);
    assert_eq!(domain.left(1), 1);
    assert!(!domain.is_min(0));
    assert!(domain.is_max(1));
    assert_eq!(format!("{domain}"), "[[1,2],[1,2]]");
}

#[test]
fn domain_graph_of_example_index_31() {
    init_logger();
    let graph = example_parameter_graph();
    let domain_graph = DomainGraph::new(graph.parameter(31).unwrap());
    assert_eq!(domain_graph.dimension(), 2);
    assert_eq!(domain_graph.digraph().size(), 6);
    assert_eq!(domain_graph.digraph().stringify(), "[[1,3],[4],[1],[4],[5],[2]]");
    let labels: Vec<u64> = (0..6).map(|i| domain_graph.label(i)).collect();
    assert_eq!(labels, vec![12, 8, 1, 4, 4, 2]);
    assert_eq!(domain_graph.coordinates(4), vec![1, 1]);
}

#[test]
fn domain_graph_directions_and_regulators() {
    let graph = example_parameter_graph();
    let domain_graph = DomainGraph::new(graph.parameter(31).unwrap());
    // 0 -> 1 crosses X's first threshold, which regulates X itself under
    // the identity order; 1 -> 4 crosses Y's threshold, which regulates X.
    assert_eq!(domain_graph.direction(0, 1), 0);
    assert_eq!(domain_graph.direction(1, 4), 1);
    assert_eq!(domain_graph.direction(3, 3), domain_graph.dimension());
    assert_eq!(domain_graph.regulator(0, 1), 0);
    assert_eq!(domain_graph.regulator(2, 5), 0);
    assert_eq!(domain_graph.regulator(1, 4), 0);
    // X's second threshold regulates Y.
    assert_eq!(domain_graph.regulator(2, 1), 1);
    assert_eq!(domain_graph.regulator(5, 5), domain_graph.dimension());
}

#[test]
fn attracting_domains_get_self_loops() {
    let graph = example_parameter_graph();
    for index in 0..graph.size() {
        let domain_graph = DomainGraph::new(graph.parameter(index).unwrap());
        for domain in 0..domain_graph.digraph().size() {
            let has_self_loop = domain_graph
                .digraph()
                .adjacencies(domain)
                .binary_search(&domain)
                .is_ok();
            assert_eq!(has_self_loop, domain_graph.label(domain) == 0);
        }
    }
}

#[test]
fn mutual_outflow_pairs_cancel() {
    // No pair of adjacent domains may keep edges in both directions, over
    // the entire parameter graph.
    let graph = example_parameter_graph();
    for index in 0..graph.size() {
        let domain_graph = DomainGraph::new(graph.parameter(index).unwrap());
        let digraph = domain_graph.digraph();
        for u in 0..digraph.size() {
            for &v in digraph.adjacencies(u) {
                if u == v {
                    continue;
                }
                assert!(
                    digraph.adjacencies(v).binary_search(&u).is_err(),
                    "index {index}: edges survive both ways between {u} and {v}"
                );
            }
        }
    }
}

#[test]
fn degenerate_double_outflow_drops_both_edges() {
    // Self-repression with the threshold between L and U pushes both domains
    // into their shared wall; the spurious bidirectional pair cancels and no
    // edge survives in either direction.
    let network: Network = "X : ~X".parse().unwrap();
    let graph = ParameterGraph::new(network, &logic_dir()).unwrap();
    let parameter = graph.parameter(1).unwrap();
    assert_eq!(parameter.logic()[0].hex(), "2");
    let domain_graph = DomainGraph::new(parameter);
    assert_eq!(domain_graph.digraph().stringify(), "[[],[]]");
}

#[test]
fn annotate_classifies_coordinate_spread() {
    let graph = example_parameter_graph();
    let domain_graph = DomainGraph::new(graph.parameter(31).unwrap());
    let full_cycle = domain_graph.annotate(&[1, 2, 4, 5]);
    assert_eq!(full_cycle.iter().collect::<Vec<_>>(), vec!["FC"]);
    let fixed_point = domain_graph.annotate(&[0]);
    assert_eq!(fixed_point.iter().collect::<Vec<_>>(), vec!["FP OFF"]);
    let fixed_point_on = domain_graph.annotate(&[4]);
    assert_eq!(fixed_point_on.iter().collect::<Vec<_>>(), vec!["FP ON"]);
    let partial = domain_graph.annotate(&[0, 1]);
    assert_eq!(partial.iter().collect::<Vec<_>>(), vec!["XC {X}"]);
}
