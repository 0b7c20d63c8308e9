//! End-to-end tests for ontograph-core

use crate::*;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_two_part_document() {
    let reports = process_lines(
        lines(&["a -> is_a -> animal", "b -> is_a -> animal", "---", "c -> is_a -> plant"]),
        &PipelineConfig::default(),
    );
    assert_eq!(reports.len(), 2);

    let first = &reports[0];
    assert_eq!(first.title.as_deref(), Some("Part 1/2"));
    assert_eq!(first.triples, 2);
    assert_eq!(first.resolution.canonical_nodes.len(), 1);
    assert!(first.resolution.canonical_nodes.contains("a"));
    assert_eq!(first.graph.nodes(), vec!["a", "b"]);
    assert_eq!(first.graph.edge_between("b", "a").map(|e| e.label.as_str()), Some("is_a a nimal"));

    let second = &reports[1];
    assert_eq!(second.title.as_deref(), Some("Part 2/2"));
    assert!(second.resolution.canonical_nodes.is_empty());
    assert_eq!(second.graph.edge_count(), 1);
    assert_eq!(second.graph.nodes(), vec!["c", "plant"]);
}

#[test]
fn test_single_segment_has_no_title() {
    let reports = process_lines(lines(&["x -> r -> y"]), &PipelineConfig::default());
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].title, None);
}

#[test]
fn test_rewritten_predicates() {
    let reports = process_lines(
        lines(&[
            "Paris, France -> capital_of -> France",
            "Nice -> is in -> South of France",
            "paris -> hosts -> louvre",
        ]),
        &PipelineConfig::default(),
    );
    let report = &reports[0];
    let rendered: Vec<String> = report
        .resolution
        .edges
        .iter()
        .map(|e| format!("{} -[{}]-> {}", e.subject, e.predicate, e.object))
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    paris -[ (s) , france capital_of]-> france
    nice -[is in south of ]-> france
    paris -[hosts]-> louvre
    ");
    assert_eq!(report.graph.nodes(), vec!["france", "paris", "nice", "louvre"]);
}

#[test]
fn test_resolving_canonical_labels_is_a_no_op() {
    let triples = parse_lines([
        "paris, france -> capital_of -> france",
        "greater paris -> contains -> paris",
        "south of france -> borders -> spain",
    ]);
    let resolution = resolve(&triples);
    assert!(!resolution.canonical_nodes.is_empty());

    let again = resolver::build_merge_map(&resolution.canonical_nodes);
    assert!(again.is_empty());

    for edge in &resolution.edges {
        let both_canonical = resolution.canonical_nodes.contains(&edge.subject)
            && resolution.canonical_nodes.contains(&edge.object);
        if both_canonical {
            let triple = Triple::new(&edge.subject, &edge.predicate, &edge.object);
            let rewritten = resolver::rewrite_edge(&triple, &again);
            assert_eq!(rewritten.subject, edge.subject);
            assert_eq!(rewritten.object, edge.object);
        }
    }
}

#[test]
fn test_later_edge_overwrites_earlier() {
    let reports = process_lines(
        lines(&["tom -> likes -> jerry", "tom -> hates -> jerry"]),
        &PipelineConfig::default(),
    );
    let graph = &reports[0].graph;
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_between("tom", "jerry").map(|e| e.label.as_str()), Some("hates"));
}

#[test]
fn test_segments_share_nothing() {
    let reports = process_lines(
        lines(&["red -> near -> blue", "---", "green -> near -> yellow", "---", "black -> near -> white"]),
        &PipelineConfig::default(),
    );
    assert_eq!(reports.len(), 3);
    for (i, a) in reports.iter().enumerate() {
        for (j, b) in reports.iter().enumerate() {
            if i == j {
                continue;
            }
            assert!(a.graph.nodes().iter().all(|n| !b.graph.contains_node(n)));
        }
    }
}

#[test]
fn test_triangle_is_drawn_once() {
    let reports = process_lines(
        lines(&["x -> r -> y", "y -> r -> z", "z -> r -> x"]),
        &PipelineConfig::default(),
    );
    let partition = &reports[0].partition;
    assert!(partition.is_planar());
    assert!(partition.components().is_empty());
}

/// No node sits on an edge it is not an endpoint of, and no edge label
/// lands on a node.
fn assert_clear_drawing(scene: &Scene) {
    let cross = |a: Point, b: Point, p: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let within = |a: f64, b: f64, v: f64| a.min(b) - 1e-9 <= v && v <= a.max(b) + 1e-9;

    for (i, a) in scene.nodes.iter().enumerate() {
        for b in &scene.nodes[i + 1..] {
            assert_ne!(a.position, b.position, "{} and {} coincide", a.label, b.label);
        }
    }
    for edge in &scene.edges {
        for node in &scene.nodes {
            if node.label == edge.source || node.label == edge.target {
                continue;
            }
            let p = node.position;
            let on_edge = cross(edge.from, edge.to, p).abs() < 1e-9
                && within(edge.from.x, edge.to.x, p.x)
                && within(edge.from.y, edge.to.y, p.y);
            assert!(!on_edge, "{} lies on {} -> {}", node.label, edge.source, edge.target);
        }
    }
    for label in &scene.labels {
        for node in &scene.nodes {
            let gap = (label.position.x - node.position.x).hypot(label.position.y - node.position.y);
            assert!(gap > 1e-6, "label {:?} covers {}", label.text, node.label);
        }
    }
}

#[test]
fn test_planar_drawings_keep_nodes_clear() {
    let triangle = lines(&["a -> r -> b", "b -> r -> c", "c -> r -> a"]);
    let k4 = lines(&[
        "a -> r -> b",
        "a -> r -> c",
        "a -> r -> d",
        "b -> r -> c",
        "b -> r -> d",
        "c -> r -> d",
    ]);
    for input in [triangle, k4] {
        let reports = process_lines(input, &PipelineConfig::default());
        let view = reports[0].view();
        assert!(view.planar);
        assert_eq!(view.scene.algorithm, LayoutAlgorithm::Planar);
        assert_clear_drawing(&view.scene);

        // Not all on one line.
        let xs: Vec<f64> = view.scene.nodes.iter().map(|n| n.position.x).collect();
        assert!(xs.iter().any(|&x| (x - xs[0]).abs() > 1e-6));
    }
}

#[test]
fn test_k5_gets_component_layouts() {
    let names = ["alpha", "bravo", "charlie", "delta", "echo"];
    let mut input = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            input.push(format!("{a} -> knows -> {b}"));
        }
    }
    let reports = process_lines(input, &PipelineConfig::default());
    let report = &reports[0];
    assert_eq!(report.graph.node_count(), 5);
    assert_eq!(report.graph.edge_count(), 10);

    let partition = &report.partition;
    assert!(!partition.is_planar());
    assert_eq!(partition.full_layout().algorithm, LayoutAlgorithm::KamadaKawai);
    assert_eq!(partition.components().len(), 1);
    assert_eq!(partition.components()[0].nodes.len(), 5);
}

#[test]
fn test_empty_segment_yields_empty_graph() {
    let reports = process_lines(lines(&["---", "noise without arrows"]), &PipelineConfig::default());
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(report.graph.is_empty());
        assert!(report.view().scene.is_empty());
    }
}

#[test]
fn test_non_text_segment_fails_alone() {
    let content = b"a -> r -> b\n---\n\xff -> r -> c\n---\nd -> r -> e\n";
    let results = process_bytes(content, &PipelineConfig::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(PipelineError::NonText { segment: 1, line: 0 })
    ));
    let last = results[2].as_ref().map(|r| r.graph.nodes());
    assert_eq!(last.ok(), Some(vec!["d", "e"]));
}

#[test]
fn test_process_file_reads_persisted_relations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "sun -> warms -> earth\n").unwrap();

    let results = process_file(&path, &PipelineConfig::default()).unwrap();
    assert_eq!(results.len(), 1);

    let missing = process_file(&dir.path().join("nope.txt"), &PipelineConfig::default());
    assert!(matches!(missing, Err(PipelineError::Io(_))));
}

#[test]
fn test_view_serialises_to_json() {
    let reports = process_lines(lines(&["sun -> warms -> earth"]), &PipelineConfig::default());
    let view = reports[0].view();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["planar"], serde_json::json!(true));
    assert_eq!(json["edges"][0]["label"], serde_json::json!("warms"));
    assert_eq!(json["scene"]["algorithm"], serde_json::json!("planar"));
    assert_eq!(json["scene"]["edges"][0]["arrow"]["head"], serde_json::json!(2));

    let back: SegmentView = serde_json::from_value(json).unwrap();
    assert_eq!(back, view);
}

#[test]
fn test_pipeline_config_from_toml() {
    let config: PipelineConfig = toml::from_str(
        r#"
        [layout]
        scale = 2.0
        component_policy = "inherit"

        [layout.kamada_kawai]
        max_iterations = 100
        "#,
    )
    .unwrap();
    assert_eq!(config.layout.scale, 2.0);
    assert_eq!(config.layout.component_policy, ComponentPolicy::Inherit);
    assert_eq!(config.layout.kamada_kawai.max_iterations, 100);
    assert_eq!(config.layout.kamada_kawai.inner_iterations, 50);
}
