mod test_support;

use serde_json::json;
use test_support::{temp_dir, Sidecar};

fn str_at<'a>(v: &'a serde_json::Value, path: &[&str]) -> &'a str {
    let mut cur = v;
    for p in path {
        cur = &cur[*p];
    }
    cur.as_str().expect("string at path")
}

#[test]
fn semester_edits_persist_and_keep_gpa_current() {
    let workspace = temp_dir("uthmhub-semesters");
    let mut sc = Sidecar::spawn();
    let _ = sc.request_ok(
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = sc.request_ok("2", "semesters.create", json!({}));
    assert_eq!(str_at(&created, &["semester", "name"]), "Semester 1");
    assert_eq!(created["semester"]["gpa"], json!(0.0));
    let sem_id = str_at(&created, &["semester", "id"]).to_string();

    let a = sc.request_ok(
        "3",
        "subjects.add",
        json!({
            "semesterId": sem_id,
            "subject": {
                "code": "BFC20903",
                "name": "Fluid Mechanics",
                "creditHour": 3,
                "grade": { "mode": "grade", "value": "A" }
            }
        }),
    );
    assert_eq!(a["semesterGpa"], json!(4.0));
    let a_id = str_at(&a, &["subject", "id"]).to_string();

    let b = sc.request_ok(
        "4",
        "subjects.add",
        json!({
            "semesterId": sem_id,
            "subject": { "creditHour": 2, "grade": { "mode": "marks", "value": 72 } }
        }),
    );
    assert_eq!(str_at(&b, &["subject", "code"]), "SUB");
    assert_eq!(str_at(&b, &["subject", "grade"]), "B");
    assert_eq!(b["subject"]["marksPercentage"], json!(72.0));
    assert_eq!(b["semesterGpa"], json!(3.6));
    let b_id = str_at(&b, &["subject", "id"]).to_string();

    let upd = sc.request_ok(
        "5",
        "subjects.update",
        json!({
            "semesterId": sem_id,
            "subjectId": b_id,
            "edit": { "creditHour": 3, "grade": { "mode": "grade", "value": "C" } }
        }),
    );
    // (3*4 + 3*2) / 6
    assert_eq!(upd["semesterGpa"], json!(3.0));
    assert_eq!(upd["subject"]["pointValue"], json!(2.0));

    let second = sc.request_ok("6", "semesters.create", json!({ "name": "Year 2 Sem 1" }));
    let sem2 = str_at(&second, &["semester", "id"]).to_string();
    let _ = sc.request_ok(
        "7",
        "subjects.add",
        json!({
            "semesterId": sem2,
            "subject": { "code": "BFC30103", "creditHour": 4, "grade": { "mode": "grade", "value": "B+" } }
        }),
    );

    let _ = sc.request_ok(
        "8",
        "semesters.rename",
        json!({ "semesterId": sem_id, "name": "Year 1 Sem 1" }),
    );
    let del = sc.request_ok(
        "9",
        "subjects.delete",
        json!({ "semesterId": sem_id, "subjectId": a_id }),
    );
    assert_eq!(del["semesterGpa"], json!(2.0));

    assert_eq!(
        sc.request_err("10", "subjects.delete", json!({ "semesterId": sem_id, "subjectId": a_id })),
        "not_found"
    );
    assert_eq!(
        sc.request_err("11", "semesters.rename", json!({ "semesterId": "missing", "name": "x" })),
        "not_found"
    );
    drop(sc);

    // A fresh process sees the same data.
    let mut sc = Sidecar::spawn();
    let _ = sc.request_ok(
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let list = sc.request_ok("2", "semesters.list", json!({}));
    let sems = list["semesters"].as_array().expect("semesters");
    assert_eq!(sems.len(), 2);
    assert_eq!(sems[0]["name"], json!("Year 1 Sem 1"));
    assert_eq!(sems[0]["gpa"], json!(2.0));
    // (3*2.0 + 4*3.33) / 7 = 2.76
    assert_eq!(list["cgpa"], json!(2.76));
    assert_eq!(list["totalCredits"], json!(7));

    let summary = sc.request_ok("3", "semesters.summary", json!({}));
    assert_eq!(summary["semesterCount"], json!(2));
    assert_eq!(summary["subjectCount"], json!(2));
    assert_eq!(summary["trend"][0]["cgpa"], json!(2.0));
    assert_eq!(summary["trend"][1]["cgpa"], json!(2.76));

    let _ = sc.request_ok("4", "semesters.delete", json!({ "semesterId": sem_id }));
    let list = sc.request_ok("5", "semesters.list", json!({}));
    assert_eq!(list["semesters"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(list["cgpa"], json!(3.33));
}
