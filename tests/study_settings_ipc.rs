mod test_support;

use serde_json::json;
use test_support::{temp_dir, Sidecar};

#[test]
fn study_sessions_roll_up_into_summary() {
    let workspace = temp_dir("uthmhub-study");
    let mut sc = Sidecar::spawn();
    let _ = sc.request_ok(
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let short = sc.request_ok(
        "2",
        "study.record",
        json!({
            "subject": "Physics",
            "startTime": "2026-03-10T08:00:00Z",
            "endTime": "2026-03-10T08:00:05Z"
        }),
    );
    assert_eq!(short["recorded"], json!(false));

    for (i, (start, end)) in [
        ("2026-03-09T08:00:00Z", "2026-03-09T09:00:00Z"),
        ("2026-03-10T08:00:00Z", "2026-03-10T09:00:00Z"),
        ("2026-03-10T13:00:00Z", "2026-03-10T14:00:00Z"),
    ]
    .iter()
    .enumerate()
    {
        let r = sc.request_ok(
            &format!("3{}", i),
            "study.record",
            json!({ "subject": "Mathematics", "startTime": start, "endTime": end }),
        );
        assert_eq!(r["recorded"], json!(true));
        assert_eq!(r["session"]["duration"], json!(3600));
    }

    let history = sc.request_ok("4", "study.history", json!({}));
    let days = history["days"].as_array().expect("days");
    assert_eq!(days.len(), 2);
    assert_eq!(days[1]["date"], json!("2026-03-10"));
    assert_eq!(days[1]["totalSeconds"], json!(7200));

    let s = sc.request_ok("5", "study.summary", json!({ "today": "2026-03-10" }));
    assert_eq!(s["todaySeconds"], json!(7200));
    assert_eq!(s["weekSeconds"], json!(10800));
    assert_eq!(s["streakDays"], json!(2));
    assert_eq!(s["dailyGoalSeconds"], json!(14400));
    assert_eq!(s["goalProgress"], json!(0.5));

    let _ = sc.request_ok(
        "6",
        "settings.set",
        json!({ "key": "study.dailyGoalSeconds", "value": 3600 }),
    );
    let got = sc.request_ok("7", "settings.get", json!({ "key": "study.dailyGoalSeconds" }));
    assert_eq!(got["value"], json!(3600));
    let s = sc.request_ok("8", "study.summary", json!({ "today": "2026-03-10" }));
    assert_eq!(s["goalProgress"], json!(1.0));

    assert_eq!(
        sc.request_err(
            "9",
            "study.record",
            json!({ "startTime": "yesterday", "endTime": "2026-03-10T09:00:00Z" })
        ),
        "bad_params"
    );
    assert_eq!(
        sc.request_err("10", "study.summary", json!({ "today": "10/03/2026" })),
        "bad_params"
    );
    let missing = sc.request_ok("11", "settings.get", json!({ "key": "unknown.key" }));
    assert!(missing["value"].is_null());
}
