//! Integration tests for the flowmap library API.

use flowmap::{
    FlowmapError, IssueKind, LayoutKind, LoadError, PngOptions, RenderOptions, Session, Task,
    Workflow, check, load, render, render_png, save, to_json,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDER_FLOW: &str = r#"{
    "workflowTasks": [
        {"taskId": "receive", "type": "http", "name": "Receive order",
         "nextOnSuccess": ["charge"], "nextOnFailure": ["reject"]},
        {"taskId": "charge", "type": "payment", "prev": ["receive"],
         "nextOnSuccess": ["ship"], "nextOnFailure": ["refund"]},
        {"taskId": "ship", "type": "fulfilment", "prev": ["charge"]},
        {"taskId": "refund", "type": "payment", "prev": ["charge"], "nextOnSuccess": ["reject"]},
        {"taskId": "reject", "type": "notify", "prev": ["receive", "refund"]}
    ]
}"#;

fn write_flow(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_valid_workflow() {
    let dir = TempDir::new().unwrap();
    let path = write_flow(&dir, "order.json", ORDER_FLOW);

    let report = load(&path).unwrap();
    assert_eq!(report.workflow.len(), 5);
    assert!(report.warnings.is_empty());
    assert_eq!(report.workflow.component_types().len(), 4);
}

#[test]
fn test_load_missing_file() {
    let result = load(Path::new("/nonexistent/workflow.json"));
    match result {
        Err(FlowmapError::Load(LoadError::Io { .. })) => {}
        Err(e) => panic!("Expected Io error, got: {:?}", e),
        Ok(_) => panic!("Expected error for missing file"),
    }
}

#[test]
fn test_load_rejects_wrong_top_level_key() {
    let dir = TempDir::new().unwrap();
    let path = write_flow(&dir, "drift.json", r#"{"WorkflowTasks": []}"#);

    let err = load(&path).unwrap_err();
    assert!(matches!(err, FlowmapError::Load(LoadError::Parse(_))));
    assert!(err.to_string().contains("workflowTasks"));
}

#[test]
fn test_check_reports_cycle_without_failing() {
    let dir = TempDir::new().unwrap();
    let path = write_flow(
        &dir,
        "loop.json",
        r#"{"workflowTasks": [
            {"taskId": "start", "type": "x", "nextOnSuccess": ["a"]},
            {"taskId": "a", "type": "x", "prev": ["start", "b"], "nextOnSuccess": ["b"]},
            {"taskId": "b", "type": "x", "prev": ["a"], "nextOnFailure": ["a"]}
        ]}"#,
    );

    let report = check(&path).unwrap();
    assert!(report.has_errors());
    assert!(report.issues.iter().any(|i| i.kind == IssueKind::Cycle));

    // the same file is refused by the validating loader
    assert!(load(&path).is_err());
}

#[test]
fn test_render_svg_both_layouts() {
    let dir = TempDir::new().unwrap();
    let workflow = load(&write_flow(&dir, "order.json", ORDER_FLOW))
        .unwrap()
        .workflow;

    for kind in [LayoutKind::Force, LayoutKind::Tree] {
        let options = RenderOptions {
            layout: Some(kind),
            ..Default::default()
        };
        let svg = render(&workflow, &options).unwrap();
        assert_eq!(svg.matches("<rect ").count(), 5, "{} layout", kind);
        assert_eq!(svg.matches("<line ").count(), 5, "{} layout", kind);
        assert!(svg.contains("receive (http)"));
    }
}

#[test]
fn test_render_png() {
    let workflow = Session::new().workflow().clone();
    let png = render_png(&workflow, &RenderOptions::default(), &PngOptions::default()).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_edit_and_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_flow(&dir, "order.json", ORDER_FLOW);

    let mut session = Session::from_report(load(&path).unwrap());
    let added = session.add_task("audit", None).unwrap();
    session.delete_task("refund").unwrap();

    let out = dir.path().join("updated_workflow.json");
    fs::write(&out, session.export_json().unwrap()).unwrap();

    let reloaded = load(&out).unwrap().workflow;
    assert_eq!(reloaded.len(), 5);
    assert!(reloaded.contains(&added));
    assert!(!reloaded.contains("refund"));
    let charge = reloaded.task("charge").unwrap();
    assert!(charge.next_on_failure.is_empty());
    assert_eq!(to_json(&reloaded).unwrap(), session.export_json().unwrap());
}

#[test]
fn test_render_options_from_config_dir() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        RenderOptions::from_dir(dir.path()).unwrap().config.canvas.width,
        800.0
    );

    write_flow(&dir, ".flowmap.toml", "[canvas]\nwidth = 1200.0\n");
    let options = RenderOptions::from_dir(dir.path()).unwrap();
    assert_eq!(options.config.canvas.width, 1200.0);

    write_flow(&dir, ".flowmap.toml", "[canvas\n");
    assert!(matches!(
        RenderOptions::from_dir(dir.path()),
        Err(FlowmapError::Config(_))
    ));
}

#[test]
fn test_save_writes_only_loadable_workflows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");

    let workflow = load(&write_flow(&dir, "order.json", ORDER_FLOW)).unwrap().workflow;
    save(&workflow, &path).unwrap();
    assert_eq!(load(&path).unwrap().workflow, workflow);

    let cyclic = Workflow::new(vec![
        Task::new("a", "x").on_success(["b"]),
        Task::new("b", "x").with_prev(["a"]).on_success(["a"]),
    ]);
    let rejected = dir.path().join("cyclic.json");
    assert!(matches!(
        save(&cyclic, &rejected),
        Err(FlowmapError::Load(LoadError::Invalid(_)))
    ));
    assert!(!rejected.exists());

    let unwritable = dir.path().join("missing-dir").join("flow.json");
    assert!(matches!(
        save(&workflow, &unwritable),
        Err(FlowmapError::Io(_))
    ));
}
