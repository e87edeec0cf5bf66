//! Best-effort extraction of subjects from transcript text (typically OCR
//! output). Grade labels are only mapped to points; nothing else is checked.

use crate::calc::Subject;
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

const DEFAULT_CREDIT: i64 = 3;
const UNRESOLVED_GRADE_FALLBACK: &str = "A";

struct Patterns {
    header: Regex,
    code: Regex,
    grade: Regex,
    name: Regex,
    noise: Regex,
    status: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        header: Regex::new(r"(?i)GRADE|STATUS|ASSESSMENT|SYSTEM|LETTER").expect("header regex"),
        code: Regex::new(r"[a-zA-Z]{3,4}\d{4,5}").expect("code regex"),
        grade: Regex::new(r"(?i)(?:^|\s)(A\+|A-|A|B\+|B-|B|C\+|C-|C|D\+|D-|D|F)(?:\s|$)")
            .expect("grade regex"),
        name: Regex::new(r"^[a-zA-Z\s&\-,()]+").expect("name regex"),
        noise: Regex::new(r"(?i)\b(?:DT NORMAL|DT|NORMAL|PC|NA)\b").expect("noise regex"),
        status: Regex::new(r"(?i)PASS|FAIL|PC|NA").expect("status regex"),
    })
}

fn find_grade(line: &str) -> Option<String> {
    patterns()
        .grade
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Standalone digits 1-6 that are followed by more text on the line. With two
/// or more the second is taken, since the first is usually a section number.
fn find_credit(text: &str) -> Option<i64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (_, followed) = tokens.split_last()?;
    let nums: Vec<i64> = followed
        .iter()
        .filter(|t| t.len() == 1)
        .filter_map(|t| t.parse::<i64>().ok())
        .filter(|n| (1..=6).contains(n))
        .collect();
    match nums.as_slice() {
        [] => None,
        [only] => Some(*only),
        [_, second, ..] => Some(*second),
    }
}

fn clean_name(after_code: &str) -> String {
    let p = patterns();
    let raw = p
        .name
        .find(after_code)
        .map(|m| m.as_str().trim())
        .unwrap_or("Unknown Subject");
    let cleaned = p.noise.replace_all(raw, "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "Unknown".to_string()
    } else {
        collapsed
    }
}

fn finish(mut subject: Subject, out: &mut Vec<Subject>) {
    if subject.grade.is_empty() {
        subject.set_grade(UNRESOLVED_GRADE_FALLBACK);
    }
    out.push(subject);
}

pub fn parse_transcript(text: &str) -> Vec<Subject> {
    let p = patterns();
    let mut parsed: Vec<Subject> = Vec::new();
    let mut current: Option<Subject> = None;
    let mut unknown_count = 1;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if p.header.is_match(line) {
            continue;
        }

        let grade = find_grade(line);

        if let Some(m) = p.code.find(line) {
            if let Some(prev) = current.take() {
                finish(prev, &mut parsed);
            }
            let after_code = line[m.end()..].trim();
            let mut subject = Subject {
                id: Uuid::new_v4().to_string(),
                code: m.as_str().to_ascii_uppercase(),
                name: clean_name(after_code),
                credit_hour: find_credit(after_code).unwrap_or(DEFAULT_CREDIT),
                grade: String::new(),
                marks_percentage: None,
                point_value: 0.0,
            };
            if let Some(g) = grade {
                subject.set_grade(&g);
            }
            current = Some(subject);
        } else if let Some(subject) = current.as_mut() {
            // Grade or credit wrapped onto a following line.
            if subject.grade.is_empty() {
                if let Some(g) = grade {
                    subject.set_grade(&g);
                }
            }
            if subject.credit_hour == DEFAULT_CREDIT {
                if let Some(c) = find_credit(line) {
                    subject.credit_hour = c;
                }
            }
        } else if let Some(g) = grade.filter(|_| p.status.is_match(line)) {
            parsed.push(Subject::with_grade(
                &format!("???{}", unknown_count),
                "Unnamed subject",
                DEFAULT_CREDIT,
                &g,
            ));
            unknown_count += 1;
        }
    }

    if let Some(last) = current.take() {
        finish(last, &mut parsed);
    }

    log::debug!("transcript parse produced {} subjects", parsed.len());
    parsed
}
