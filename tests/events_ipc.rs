mod test_support;

use serde_json::json;
use test_support::{temp_dir, Sidecar};

fn titles(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|e| e["title"].as_str().unwrap_or("").to_string())
        .collect()
}

#[test]
fn events_are_stored_sorted_and_split_by_now() {
    let workspace = temp_dir("uthmhub-events");
    let mut sc = Sidecar::spawn();
    assert_eq!(
        sc.request_err("0", "events.list", json!({})),
        "no_workspace"
    );
    let _ = sc.request_ok(
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let r = sc.request_ok(
        "2",
        "events.create",
        json!({
            "title": "Presentation",
            "date": "2026-10-25",
            "time": "10:00",
            "category": "presentation",
            "now": "2026-10-19T12:00"
        }),
    );
    assert_eq!(r["event"]["date"], json!("2026-10-25T10:00"));
    assert_eq!(r["event"]["category"], json!("presentation"));
    let presentation_id = r["event"]["id"].as_str().expect("id").to_string();

    let _ = sc.request_ok(
        "3",
        "events.create",
        json!({ "title": "Lab report", "date": "2026-10-01", "description": "Section 3" }),
    );
    let r = sc.request_ok(
        "4",
        "events.create",
        json!({ "title": "Quiz 2", "date": "2026-10-19T14:00", "category": "quiz" }),
    );
    assert_eq!(r["event"]["date"], json!("2026-10-19T14:00"));

    let r = sc.request_ok("5", "events.list", json!({ "now": "2026-10-19T12:00" }));
    assert_eq!(titles(&r["upcoming"]), ["Quiz 2", "Presentation"]);
    assert_eq!(titles(&r["past"]), ["Lab report"]);
    assert_eq!(r["past"][0]["date"], json!("2026-10-01T09:00"));
    assert_eq!(r["past"][0]["category"], json!("assignment"));
    assert_eq!(r["past"][0]["description"], json!("Section 3"));

    let r = sc.request_ok(
        "6",
        "events.delete",
        json!({ "id": presentation_id, "now": "2026-10-19" }),
    );
    assert_eq!(r["removed"], json!(presentation_id));
    assert_eq!(titles(&r["upcoming"]), ["Quiz 2"]);

    assert_eq!(
        sc.request_err("7", "events.delete", json!({ "id": presentation_id })),
        "not_found"
    );
    assert_eq!(
        sc.request_err("8", "events.create", json!({ "title": " ", "date": "2026-10-20" })),
        "bad_params"
    );
    assert_eq!(
        sc.request_err("9", "events.create", json!({ "title": "Demo", "date": "soon" })),
        "bad_params"
    );
    assert_eq!(
        sc.request_err("10", "events.list", json!({ "now": "19/10/2026" })),
        "bad_params"
    );
    drop(sc);

    // Events outlive the process.
    let mut sc = Sidecar::spawn();
    let _ = sc.request_ok(
        "11",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let r = sc.request_ok("12", "events.list", json!({ "now": "2026-01-01" }));
    assert_eq!(titles(&r["upcoming"]), ["Lab report", "Quiz 2"]);
    assert!(r["past"].as_array().expect("past").is_empty());

    let _ = std::fs::remove_dir_all(&workspace);
}
