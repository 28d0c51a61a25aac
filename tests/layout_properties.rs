mod common;

use common::DemoAnnotationBuilder;
use rstest::{
    fixture,
    rstest,
};
use tracklane::prelude::*;

#[fixture]
fn builder() -> DemoAnnotationBuilder {
    DemoAnnotationBuilder::new(10_000.0, 800.0, 42)
}

fn check_assignment(
    annots: &[Annotation],
    lanes: usize,
    tolerance: f64,
) {
    assert!(lanes_overlap_free(annots, tolerance));
    assert!(annots.iter().all(|a| a.y().is_some_and(|y| y < lanes)));
    if !annots.is_empty() {
        let used = annots.iter().filter_map(|a| a.y()).max().unwrap() + 1;
        assert_eq!(used, lanes);
    }
}

#[rstest]
#[case::sparse(50, 0.0)]
#[case::dense(500, 0.0)]
#[case::tolerant(200, 25.0)]
fn interval_layout_is_optimal(
    mut builder: DemoAnnotationBuilder,
    #[case] n: usize,
    #[case] tolerance: f64,
) {
    let mut annots = builder.build(n);
    let graph = OverlapGraph::new(&annots, tolerance);
    let lanes = interval_layout(&mut annots, tolerance);

    check_assignment(&annots, lanes, tolerance);
    assert_eq!(lanes, graph.max_clique_size());
}

#[rstest]
#[case::width(VertexOrder::WidthDescending)]
#[case::degree(VertexOrder::DegreeDescending)]
#[case::start(VertexOrder::StartAscending)]
fn greedy_layout_is_valid_and_deterministic(
    mut builder: DemoAnnotationBuilder,
    #[case] order: VertexOrder,
) {
    let annots = builder.build(300);
    let mut first = annots.clone();
    let mut second = annots;

    let lanes = greedy_layout(&mut first, 0.0, order);
    check_assignment(&first, lanes, 0.0);
    assert!(lanes >= OverlapGraph::new(&first, 0.0).max_clique_size());

    assert_eq!(greedy_layout(&mut second, 0.0, order), lanes);
    assert_eq!(first, second);
}

#[rstest]
fn heuristic_layout_is_valid(mut builder: DemoAnnotationBuilder) {
    let mut annots = builder.build(200);
    let clique = OverlapGraph::new(&annots, 0.0).max_clique_size();
    let lanes = LayoutConfig::default()
        .with_algorithm(LayoutAlgorithm::Heuristic)
        .with_iterations(20)
        .with_seed(Some(7))
        .run(&mut annots)
        .unwrap();

    check_assignment(&annots, lanes, 0.0);
    assert!(lanes >= clique);
}

#[test]
fn zero_width_annotations() {
    let mut annots = DemoAnnotationBuilder::new(1_000.0, 50.0, 3)
        .with_zero_width(0.3)
        .build(150);
    for algorithm in [
        LayoutAlgorithm::Interval,
        LayoutAlgorithm::Greedy,
        LayoutAlgorithm::Heuristic,
    ] {
        let config = LayoutConfig::default()
            .with_algorithm(algorithm)
            .with_seed(Some(1));
        let lanes = config.run(&mut annots).unwrap();
        check_assignment(&annots, lanes, 0.0);
    }
}

#[rstest]
#[case::touching(0.0, 10.0, 2)]
#[case::gap_within_tolerance(2.0, 12.0, 2)]
#[case::gap_beyond_tolerance(1.0, 12.0, 1)]
fn tolerance_boundaries(
    #[case] tolerance: f64,
    #[case] second_start: f64,
    #[case] expected: usize,
) {
    for algorithm in [
        LayoutAlgorithm::Interval,
        LayoutAlgorithm::Greedy,
        LayoutAlgorithm::Heuristic,
    ] {
        let mut annots = vec![
            Annotation::new("a", 0.0, 10.0),
            Annotation::new("b", second_start, 8.0),
        ];
        let lanes = LayoutConfig::default()
            .with_algorithm(algorithm)
            .with_tolerance(tolerance)
            .run(&mut annots)
            .unwrap();
        assert_eq!(lanes, expected, "{:?}", algorithm);
    }
}

#[test]
fn groups_keep_members_together() {
    let mut groups = vec![
        AnnotationGroup::try_from_members("tx1", [
            Annotation::new("tx1.e1", 0.0, 10.0),
            Annotation::new("tx1.e2", 40.0, 10.0),
        ])
        .unwrap(),
        AnnotationGroup::try_from_members("tx2", [Annotation::new("tx2.e1", 20.0, 5.0)])
            .unwrap(),
        AnnotationGroup::try_from_members("tx3", [Annotation::new("tx3.e1", 60.0, 5.0)])
            .unwrap(),
    ];

    let lanes = interval_layout(&mut groups, 0.0);
    assert_eq!(lanes, 2);
    assert_eq!(groups[0].y(), Some(0));
    // Falls between the exons of tx1 but inside its span
    assert_eq!(groups[1].y(), Some(1));
    assert_eq!(groups[2].y(), Some(0));
    for group in groups.iter() {
        assert!(group.members().iter().all(|m| m.y() == group.y()));
    }
}
