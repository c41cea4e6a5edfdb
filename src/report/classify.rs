use std::sync::LazyLock;

use regex::Regex;

use super::model::{Course, MetStatus};
use super::rows::Row;

static AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z\s]+)\s*\(\s*(\d+\.\d+)\scredits\s*\)\s*-\s*(.*)").unwrap()
});

// Relation tokens a requirement rule may join unsatisfied courses with.
// Anything else means the row shape was misidentified.
const RELATION_TOKENS: &[&str] = &["(", ")", ")and(", "and"];

/// Course fields captured from a single row. Cells the shape does not
/// carry stay empty.
#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub met: MetStatus,
    pub requirement: String,
    pub taken_id: String,
    pub taken_title: String,
    pub taken_term: String,
    pub taken_credits: String,
    pub taken_grade: String,
}

impl CourseDraft {
    pub fn into_course(self) -> Course {
        Course {
            met: self.met,
            requirement: self.requirement,
            taken_id: self.taken_id,
            taken_title: self.taken_title,
            taken_term: self.taken_term,
            taken_credits: self.taken_credits,
            taken_grade: self.taken_grade,
            details: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RowAction {
    AreaHeader {
        name: String,
        required_credits: String,
        met: bool,
    },
    CourseFull(CourseDraft),
    CourseUnsatisfied(CourseDraft),
    GroupOpen(CourseDraft),
    GroupCourse(CourseDraft),
    GroupNoted { draft: CourseDraft, note: String },
    NoteOnly(String),
    GroupEnd { commit: bool },
    AreaTotals { earned_credits: String, gpa: String },
    Skip,
}

/// Classify one row by its shape. Total: every row maps to an action,
/// and anything unrecognized degrades to Skip.
pub fn classify(row: &Row) -> RowAction {
    // ── Area heading: the only 1-label/1-value shape ──
    if row.labels.len() == 1 && row.cells.len() == 1 {
        if let Some(caps) = AREA_RE.captures(row.cell(0)) {
            return RowAction::AreaHeader {
                name: caps[1].trim().to_string(),
                required_credits: caps[2].to_string(),
                met: &caps[3] == "Met",
            };
        }
    }

    match row.shape() {
        // ── Satisfied course with full taken-course columns ──
        17 => RowAction::CourseFull(CourseDraft {
            met: MetStatus::yes_no(row.cell(0)),
            requirement: joined_name(row, 3, 5),
            taken_id: join_id(row.cell(10), row.cell(11)),
            taken_title: row.cell(12).to_string(),
            taken_term: row.cell(9).to_string(),
            taken_credits: row.cell(14).to_string(),
            taken_grade: row.cell(15).to_string(),
        }),

        // ── Satisfied group opener; its name carries to the members ──
        12 => RowAction::GroupOpen(CourseDraft {
            met: MetStatus::yes_no(row.cell(0)),
            requirement: single_name(row, 3),
            taken_id: join_id(row.cell(5), row.cell(6)),
            taken_title: row.cell(7).to_string(),
            taken_term: row.cell(4).to_string(),
            taken_credits: row.cell(9).to_string(),
            taken_grade: row.cell(10).to_string(),
        }),

        // ── Unsatisfied course: wide filler span, no taken columns ──
        10 if row.span(9) == 8 => {
            let relation = row.cell(1).to_lowercase();
            if !RELATION_TOKENS.contains(&relation.as_str()) {
                return RowAction::Skip;
            }
            RowAction::CourseUnsatisfied(CourseDraft {
                met: MetStatus::yes_no(row.cell(0)),
                requirement: joined_name(row, 3, 5),
                ..CourseDraft::default()
            })
        }

        // ── Group member carrying the group's note inline ──
        10 => RowAction::GroupNoted {
            note: row.cell(1).to_string(),
            draft: CourseDraft {
                met: MetStatus::Unknown,
                taken_id: join_id(row.cell(3), row.cell(4)),
                taken_title: row.cell(5).to_string(),
                taken_term: row.cell(2).to_string(),
                taken_credits: row.cell(7).to_string(),
                taken_grade: row.cell(8).to_string(),
                ..CourseDraft::default()
            },
        },

        // ── Unsatisfied group opener ──
        5 if row.span(4) == 8 => RowAction::GroupOpen(CourseDraft {
            met: MetStatus::yes_no(row.cell(0)),
            requirement: single_name(row, 3),
            taken_id: join_id(row.cell(5), row.cell(6)),
            ..CourseDraft::default()
        }),

        // ── Group member ──
        8 => RowAction::GroupCourse(CourseDraft {
            met: MetStatus::Unknown,
            taken_id: join_id(row.cell(1), row.cell(2)),
            taken_title: row.cell(3).to_string(),
            taken_term: row.cell(0).to_string(),
            taken_credits: row.cell(5).to_string(),
            taken_grade: row.cell(6).to_string(),
            ..CourseDraft::default()
        }),

        // ── Free-text note, applies retroactively to the pending group ──
        3 if row.span(2) == 8 => RowAction::NoteOnly(row.cell(1).to_string()),

        // ── Group terminator; only ")" keeps the buffered courses ──
        2 => RowAction::GroupEnd {
            commit: row.cell(1) == ")",
        },

        // ── Area footer with earned credits and GPA ──
        4 => RowAction::AreaTotals {
            earned_credits: row.cell(1).to_string(),
            gpa: row.cell(2).to_string(),
        },

        _ => RowAction::Skip,
    }
}

/// Requirement name from the subject and number cells, falling back to
/// the rule text in cell 2 when both are blank.
fn joined_name(row: &Row, subject: usize, number: usize) -> String {
    let name = join_id(row.cell(subject), row.cell(number));
    if name.is_empty() {
        row.cell(2).to_string()
    } else {
        name
    }
}

fn single_name(row: &Row, idx: usize) -> String {
    let name = row.cell(idx);
    if name.is_empty() || name == "-" {
        row.cell(2).to_string()
    } else {
        name.to_string()
    }
}

/// Join two id halves; both blank collapses to empty rather than "-".
fn join_id(first: &str, second: &str) -> String {
    if first.is_empty() && second.is_empty() {
        String::new()
    } else {
        format!("{}-{}", first, second)
    }
}
