use std::collections::HashSet;
use std::path::Path;

use sheet_city::geometry::reach_height;
use sheet_city::graph::incoming;
use sheet_city::theme;
use sheet_city::{
    find_upstream_paths, Cell, Dataset, DatasetError, DependencyGraph, HighlightState, Phase,
    Scene, SceneEvent, SceneSettings,
};

const SMALL_TEST: &str = include_str!("../data/small_test.json");

fn loaded(json: &str) -> Scene {
    let dataset = Dataset::from_json_str(json).expect("dataset should parse");
    let mut scene = Scene::default();
    scene.handle(SceneEvent::DatasetLoaded(dataset));
    scene
}

fn emphasized(scene: &Scene) -> HashSet<(String, String)> {
    let settings = scene.settings();
    scene
        .frame()
        .expect("frame after load")
        .arcs
        .iter()
        .filter(|a| a.source_color[3] == settings.highlight_opacity)
        .map(|a| (a.from.clone(), a.to.clone()))
        .collect()
}

fn pair(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

#[test]
fn test_single_link_end_to_end() {
    let cells = vec![
        Cell::new("A", 0, [0.0, 0.0], 10.0, 10.0).with_used_by(["B"]),
        Cell::new("B", 1, [20.0, 0.0], 10.0, 10.0),
    ];
    let graph = DependencyGraph::build(&cells);
    assert_eq!(graph.connections().len(), 1);

    let connection = &graph.connections()[0];
    assert_eq!(connection.color, theme::connection_color(0));
    assert_eq!(connection.from.coords.x, 5.0);
    assert_eq!(connection.from.coords.y, -5.0);
    assert_eq!(connection.to.coords.x, 25.0);
    assert!((reach_height(connection, &graph.span()) - 0.4).abs() < 1e-9);

    let mut scene = Scene::default();
    scene.handle(SceneEvent::DatasetLoaded(Dataset::from_cells(cells)));
    assert!(scene.handle(SceneEvent::Hover(HighlightState::tower("B"))).redrawn);
    assert_eq!(emphasized(&scene), HashSet::from([pair("A", "B")]));
}

#[test]
fn test_loaded_fixture_shape() {
    let dataset = Dataset::from_json_str(SMALL_TEST).unwrap();
    assert_eq!(dataset.labels, vec!["sheet0".to_string()]);
    assert_eq!(dataset.cells.len(), 6);
    assert_eq!(dataset.rows.len(), 3);
    assert_eq!(dataset.cols.len(), 4);
    assert_eq!(dataset.extents, vec![[192.0, -30.0]]);

    let sum = dataset.cells.iter().find(|c| c.name == "Sheet0!C2").unwrap();
    assert_eq!(sum.weight, 4);
    assert_eq!(sum.uses, vec!["Sheet0!B1", "Sheet0!A2"]);

    let graph = DependencyGraph::build(&dataset.cells);
    assert_eq!(graph.connections().len(), 4);
    assert_eq!(graph.dropped_references(), 1);
    assert_eq!(graph.span().max_rank, 2);
    assert_eq!(incoming(graph.connections(), "Sheet0!C2").count(), 2);
}

#[test]
fn test_fixture_from_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/small_test.json");
    let dataset = Dataset::from_file(&path).unwrap();
    assert_eq!(dataset.cells.len(), 6);

    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/missing.json");
    assert!(matches!(
        Dataset::from_file(&missing),
        Err(DatasetError::Read { .. })
    ));
}

#[test]
fn test_malformed_dataset_is_rejected() {
    assert!(matches!(
        Dataset::from_json_str("{\"not\": \"a list\"}"),
        Err(DatasetError::Parse(_))
    ));
}

#[test]
fn test_hover_lights_every_feeding_path() {
    let mut scene = loaded(SMALL_TEST);
    assert!(emphasized(&scene).is_empty());

    scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!C2")));
    assert_eq!(
        emphasized(&scene),
        HashSet::from([
            pair("Sheet0!A1", "Sheet0!B1"),
            pair("Sheet0!A1", "Sheet0!A2"),
            pair("Sheet0!B1", "Sheet0!C2"),
            pair("Sheet0!A2", "Sheet0!C2"),
        ])
    );

    scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!B1")));
    assert_eq!(
        emphasized(&scene),
        HashSet::from([pair("Sheet0!A1", "Sheet0!B1")])
    );

    scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!A1")));
    assert!(emphasized(&scene).is_empty());

    scene.handle(SceneEvent::Hover(HighlightState::arc("Sheet0!A2", "Sheet0!C2")));
    assert_eq!(
        emphasized(&scene),
        HashSet::from([pair("Sheet0!A2", "Sheet0!C2")])
    );
    assert_eq!(
        scene.tooltip().as_deref(),
        Some("Arc from Sheet0!A2 to Sheet0!C2")
    );
}

#[test]
fn test_cycle_terminates() {
    let cells = vec![
        Cell::new("A", 1, [0.0, 0.0], 10.0, 10.0).with_used_by(["B"]),
        Cell::new("B", 1, [10.0, 0.0], 10.0, 10.0).with_used_by(["C"]),
        Cell::new("C", 1, [20.0, 0.0], 10.0, 10.0).with_used_by(["A"]),
    ];
    let graph = DependencyGraph::build(&cells);
    let upstream = find_upstream_paths(graph.connections(), "A");
    assert_eq!(upstream.len(), 3);
    assert!(upstream.contains("C", "A"));
    assert!(upstream.contains("B", "C"));
    assert!(upstream.contains("A", "B"));
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut scene = loaded(SMALL_TEST);
    scene.handle(SceneEvent::Tick { dt_s: 0.05 });
    assert_eq!(scene.phase(), Phase::Steady { animating: true });

    scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!C2")));
    let first = scene.frame().cloned();
    scene.handle(SceneEvent::Hover(HighlightState::None));
    scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!C2")));
    assert_eq!(scene.frame().cloned(), first);
}

#[test]
fn test_full_timeline_with_fake_clock() {
    let mut scene = loaded(SMALL_TEST);
    let mut trail_steps = 0;
    for _ in 0..300 {
        if scene.handle(SceneEvent::Tick { dt_s: 0.01 }).trail_advanced {
            trail_steps += 1;
        }
    }
    // 3.0s elapsed: the trail clock starts at 1.7s and steps once per second.
    assert_eq!(trail_steps, 1);
    assert_eq!(scene.trail_time(), 1);
    assert_eq!(scene.phase(), Phase::Steady { animating: true });

    let frame = scene.frame().unwrap();
    assert_eq!(frame.towers.len(), 3);
    assert_eq!(
        frame.trails.len(),
        4 * SceneSettings::default().trail.copies
    );

    scene.handle(SceneEvent::Teardown);
    assert!(!scene.has_pending_timers());
    assert!(!scene.handle(SceneEvent::Hover(HighlightState::tower("Sheet0!C2"))).redrawn);
}
