mod test_support;

use serde_json::json;
use test_support::Sidecar;

#[test]
fn grading_lookups_match_scale() {
    let mut sc = Sidecar::spawn();

    let r = sc.request_ok("1", "grading.fromMarks", json!({ "marks": 84.6 }));
    assert_eq!(r, json!({ "grade": "A", "pointValue": 4.0 }));

    let r = sc.request_ok("2", "grading.fromMarks", json!({ "marks": -3 }));
    assert_eq!(r["grade"], json!("F"));
    assert_eq!(r["pointValue"], json!(0.0));

    let r = sc.request_ok("3", "grading.pointFromGrade", json!({ "grade": "C+" }));
    assert_eq!(r["pointValue"], json!(2.33));
    let r = sc.request_ok("4", "grading.pointFromGrade", json!({ "grade": "c+" }));
    assert_eq!(r["pointValue"], json!(0.0));

    assert_eq!(
        sc.request_err("5", "grading.fromMarks", json!({ "marks": "ninety" })),
        "bad_params"
    );
}

#[test]
fn stateless_gpa_and_cgpa() {
    let mut sc = Sidecar::spawn();

    let r = sc.request_ok(
        "1",
        "gpa.calculate",
        json!({ "subjects": [
            { "creditHour": 3, "pointValue": 4.0 },
            { "creditHour": 2, "pointValue": 3.0 }
        ] }),
    );
    assert_eq!(r["gpa"], json!(3.6));

    let r = sc.request_ok("2", "gpa.calculate", json!({ "subjects": [] }));
    assert_eq!(r["gpa"], json!(0.0));

    let r = sc.request_ok(
        "3",
        "gpa.cgpa",
        json!({ "semesters": [
            { "name": "One", "subjects": [ { "creditHour": 3, "grade": "A", "pointValue": 4.0 } ] },
            { "name": "Two", "subjects": [
                { "creditHour": 1, "pointValue": 2.0 },
                { "creditHour": 1, "pointValue": 2.0 },
                { "creditHour": 1, "pointValue": 2.0 },
                { "creditHour": 1, "pointValue": 2.0 },
                { "creditHour": 1, "pointValue": 2.0 }
            ] }
        ] }),
    );
    assert_eq!(r["cgpa"], json!(2.75));
    assert_eq!(r["totalCredits"], json!(8));
    assert_eq!(r["trend"][0]["cgpa"], json!(4.0));
    assert_eq!(r["trend"][1]["gpa"], json!(2.0));
    assert_eq!(r["trend"][1]["cgpa"], json!(2.75));
}
