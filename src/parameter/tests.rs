use crate::error::Error;
use crate::parameter::{LogicParameter, Network, OrderParameter, Parameter, ParameterGraph};
use crate::phase::Domain;
use crate::test_utils::{example_network, example_parameter_graph, init_logger, logic_dir};
use std::io::Write;

#[test]
fn network_structure() {
    let network = example_network();
    assert_eq!(network.size(), 2);
    assert_eq!(network.name(0), "X");
    assert_eq!(network.name(1), "Y");
    assert_eq!(network.index("Y"), Some(1));
    assert_eq!(network.index("Z"), None);
    // X receives X + Y in one factor; Y receives ~X.
    assert_eq!(network.logic(0), &[vec![0, 1]]);
    assert_eq!(network.logic(1), &[vec![0]]);
    assert_eq!(network.inputs(0), &[0, 1]);
    assert_eq!(network.inputs(1), &[0]);
    assert_eq!(network.outputs(0), &[0, 1]);
    assert_eq!(network.outputs(1), &[0]);
    assert!(network.interaction(0, 0));
    assert!(network.interaction(1, 0));
    assert!(!network.interaction(0, 1));
    assert_eq!(network.order(0, 0), 0);
    assert_eq!(network.order(0, 1), 1);
    assert_eq!(network.order(1, 0), 0);
    assert_eq!(network.domains(), vec![3, 2]);
    assert!(!network.essential(0));
}

#[test]
fn network_factored_logic() {
    // `a + ~b c d + e` reads as (a + ~b)(c)(d + e); factors then sort into
    // the canonical (size, max-member) order.
    let network: Network = "a : a + ~b c d + e\nb : a\nc : a\nd : a\ne : a"
        .parse()
        .unwrap();
    assert_eq!(network.logic(0), &[vec![2], vec![0, 1], vec![3, 4]]);
    assert!(!network.interaction(1, 0));
    assert!(network.interaction(0, 0));
}

#[test]
fn network_accepts_escaped_single_line_form() {
    let network: Network = "\"X : X + Y\\nY : ~X\"".parse().unwrap();
    assert_eq!(network.size(), 2);
    assert_eq!(network.specification(), "X : X + Y\nY : ~X");
}

#[test]
fn network_spec_errors() {
    assert!(matches!(
        "X".parse::<Network>(),
        Err(Error::MissingLogic(name)) if name == "X"
    ));
    assert!(matches!(
        "X : X + X".parse::<Network>(),
        Err(Error::RepeatedInput(name)) if name == "X"
    ));
    assert!(matches!(
        "X : Y".parse::<Network>(),
        Err(Error::NetworkSpec(_))
    ));
    assert!(matches!(
        "X : ~X : banana".parse::<Network>(),
        Err(Error::NetworkSpec(_))
    ));
}

#[test]
fn network_skips_comment_lines() {
    let network: Network = ". comment\nX : ~X\n@ directive : ignored".parse().unwrap();
    assert_eq!(network.size(), 1);
}

#[test]
fn logic_parameter_unpacks_hex() {
    let logic = LogicParameter::new(2, 2, "D5");
    assert_eq!(logic.num_inputs(), 2);
    assert_eq!(logic.num_outputs(), 2);
    assert_eq!(logic.hex(), "D5");
    // D5 = 11010101: target bins per input combination are 1, 1, 1, 2.
    for combination in 0..3 {
        assert_eq!(logic.bin(combination), 1);
    }
    assert_eq!(logic.bin(3), 2);
    assert!(logic.bit(0));
    assert!(!logic.bit(1));
    assert!(logic.evaluate(&[true, true], 1));
    assert!(!logic.evaluate(&[false, true], 1));
}

#[test]
fn logic_parameter_adjacencies_flip_one_bit() {
    let logic = LogicParameter::new(1, 1, "2");
    let neighbors: Vec<String> = logic
        .adjacencies()
        .iter()
        .map(|adjacent| adjacent.hex().to_string())
        .collect();
    assert_eq!(neighbors, vec!["3", "0"]);
}

#[test]
fn logic_parameter_text_form() {
    let logic = LogicParameter::new(2, 2, "D5");
    assert_eq!(logic.stringify(), "[2,2,\"D5\"]");
    assert_eq!(LogicParameter::parse("[2,2,\"D5\"]").unwrap(), logic);
    assert!(LogicParameter::parse("[2,2,\"d5\"]").is_err());
    assert!(LogicParameter::parse("[2,2]").is_err());
}

#[test]
fn order_parameter_rank_round_trip() {
    for m in 0..=5u64 {
        let count: u64 = (2..=m).product();
        for rank in 0..count.max(1) {
            let order = OrderParameter::from_rank(m, rank);
            assert_eq!(order.rank(), rank);
            assert_eq!(
                OrderParameter::from_permutation(order.permutation().to_vec()).rank(),
                rank
            );
            for i in 0..m {
                assert_eq!(order.inverse(order.apply(i)), i);
            }
        }
    }
}

#[test]
fn order_parameter_rank_zero_is_identity() {
    let order = OrderParameter::from_rank(4, 0);
    assert_eq!(order.permutation(), &[0, 1, 2, 3]);
}

#[test]
fn order_parameter_adjacencies_are_adjacent_transpositions() {
    let order = OrderParameter::from_rank(3, 0);
    let neighbors: Vec<Vec<u64>> = order
        .adjacencies()
        .iter()
        .map(|adjacent| adjacent.permutation().to_vec())
        .collect();
    assert_eq!(neighbors, vec![vec![1, 0, 2], vec![0, 2, 1]]);
    assert!(OrderParameter::from_rank(1, 0).adjacencies().is_empty());
}

#[test]
fn order_parameter_text_form() {
    let order = OrderParameter::from_permutation(vec![1, 0]);
    assert_eq!(order.stringify(), "[1,0]");
    assert_eq!(OrderParameter::parse("[1,0]").unwrap(), order);
    assert!(OrderParameter::parse("[0,2]").is_err());
    assert!(OrderParameter::parse("[0,0]").is_err());
}

#[test]
fn parameter_graph_sizes() {
    init_logger();
    let graph = example_parameter_graph();
    assert_eq!(graph.fixed_order_size(), 60);
    assert_eq!(graph.reorderings(), 2);
    assert_eq!(graph.size(), 120);
    assert_eq!(graph.size(), graph.fixed_order_size() * graph.reorderings());
    assert_eq!(format!("{graph}"), "(ParameterGraph: 120 parameters, 2 nodes)");
}

#[test]
fn parameter_graph_decodes_index_31() {
    let graph = example_parameter_graph();
    let parameter = graph.parameter(31).unwrap();
    assert_eq!(
        parameter.stringify(),
        "[[\"X\",[2,2,\"D5\"],[0,1]],[\"Y\",[1,1,\"2\"],[0]]]"
    );
}

#[test]
fn parameter_graph_index_inverts_parameter() {
    let graph = example_parameter_graph();
    for index in 0..graph.size() {
        let parameter = graph.parameter(index).unwrap();
        assert_eq!(parameter.logic().len() as u64, graph.network().size());
        assert_eq!(graph.index(&parameter), Some(index));
        assert_eq!(graph.parameter(graph.index(&parameter).unwrap()).unwrap(), parameter);
    }
}

#[test]
fn parameter_graph_rejects_out_of_range_index() {
    let graph = example_parameter_graph();
    assert!(matches!(
        graph.parameter(120),
        Err(Error::IndexOutOfRange { index: 120, size: 120 })
    ));
}

#[test]
fn parameter_graph_index_rejects_foreign_encoding() {
    let graph = example_parameter_graph();
    // "01" is hex but not monotone, so it appears in no factor table.
    let parameter = Parameter::new(
        vec![LogicParameter::new(2, 2, "01"), LogicParameter::new(1, 1, "1")],
        vec![OrderParameter::from_rank(2, 0), OrderParameter::from_rank(1, 0)],
        graph.network().clone(),
    );
    assert_eq!(graph.index(&parameter), None);
}

#[test]
fn parameter_graph_adjacencies_of_index_31() {
    let graph = example_parameter_graph();
    assert_eq!(graph.adjacencies(31).unwrap(), vec![11, 25, 30, 33, 36, 51, 91]);
}

#[test]
fn essential_nodes_select_essential_tables() {
    let network: Network = "X : X + Y : E\nY : ~X : E".parse().unwrap();
    assert!(network.essential(0));
    let graph = ParameterGraph::new(network, &logic_dir()).unwrap();
    // 7 essential encodings for X, 1 for Y.
    assert_eq!(graph.fixed_order_size(), 7);
    assert_eq!(graph.size(), 14);
}

#[test]
fn missing_factor_table_is_fatal() {
    let directory = tempfile::tempdir().unwrap();
    let result = ParameterGraph::new(example_network(), directory.path());
    assert!(matches!(result, Err(Error::MissingLogicResource { .. })));
}

#[test]
fn malformed_factor_table_is_fatal() {
    let directory = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(directory.path().join("1_1_1.dat")).unwrap();
    writeln!(file, "0\nnot hex\n3").unwrap();
    let network: Network = "X : ~X".parse().unwrap();
    let result = ParameterGraph::new(network, directory.path());
    assert!(matches!(
        result,
        Err(Error::MalformedLogicResource { line: 2, .. })
    ));
}

#[test]
fn parameter_text_form_round_trip() {
    let graph = example_parameter_graph();
    let network = graph.network();
    let parameter = graph.parameter(31).unwrap();
    let parsed = Parameter::parse(&parameter.stringify(), network).unwrap();
    assert_eq!(parsed, parameter);
    assert!(Parameter::parse("[[\"X\",[2,2,\"D5\"],[0,1]]]", network).is_err());
}

#[test]
fn labelling_agrees_with_absorbing_walls() {
    // The zone-sweep labelling and the per-wall evaluation are independent
    // paths to the same answer; cross-check them over the whole parameter
    // graph.
    let graph = example_parameter_graph();
    let network = graph.network().clone();
    let dimension = network.size();
    let limits = network.domains();
    for index in 0..graph.size() {
        let parameter = graph.parameter(index).unwrap();
        let labelling = parameter.labelling();
        let mut domain = Domain::new(limits.clone());
        while domain.is_valid() {
            let label = labelling[domain.index() as usize];
            for d in 0..dimension {
                if domain.is_min(d) {
                    assert_eq!(label & (1 << d), 0, "boundary walls are never absorbing");
                } else {
                    assert_eq!(
                        label & (1 << d) != 0,
                        parameter.absorbing(&domain, d, -1),
                        "index {index}, domain {}, left wall {d}",
                        domain.index()
                    );
                }
                if domain.is_max(d) {
                    assert_eq!(label & (1 << (dimension + d)), 0);
                } else {
                    assert_eq!(
                        label & (1 << (dimension + d)) != 0,
                        parameter.absorbing(&domain, d, 1),
                        "index {index}, domain {}, right wall {d}",
                        domain.index()
                    );
                }
            }
            assert_eq!(label == 0, parameter.attracting(&domain));
            domain.advance();
        }
    }
}

#[test]
fn regulator_follows_the_output_order() {
    let graph = example_parameter_graph();
    // Order part 0: X's thresholds regulate X then Y in network output order.
    let parameter = graph.parameter(31).unwrap();
    assert_eq!(parameter.regulator(0, 0), 0);
    assert_eq!(parameter.regulator(0, 1), 1);
    assert_eq!(parameter.regulator(1, 0), 0);
    // Order part 1 swaps X's two thresholds.
    let swapped = graph.parameter(31 + 60).unwrap();
    assert_eq!(swapped.order()[0].permutation(), &[1, 0]);
    assert_eq!(swapped.regulator(0, 0), 1);
    assert_eq!(swapped.regulator(0, 1), 0);
}
