use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetStatus {
    Yes,
    No,
    #[default]
    Unknown,
}

impl MetStatus {
    /// Two-state reading: anything other than "yes" counts as No.
    pub fn yes_no(text: &str) -> Self {
        if text.eq_ignore_ascii_case("yes") {
            MetStatus::Yes
        } else {
            MetStatus::No
        }
    }

    /// Three-state reading: neither "yes" nor "no" stays Unknown.
    pub fn tri_state(text: &str) -> Self {
        if text.eq_ignore_ascii_case("yes") {
            MetStatus::Yes
        } else if text.eq_ignore_ascii_case("no") {
            MetStatus::No
        } else {
            MetStatus::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetStatus::Yes => "yes",
            MetStatus::No => "no",
            MetStatus::Unknown => "unknown",
        }
    }
}

/// One requirement line of an area, possibly paired with the course
/// that satisfied it. Taken fields stay empty when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub met: MetStatus,
    pub requirement: String,
    pub taken_id: String,
    pub taken_title: String,
    pub taken_term: String,
    pub taken_credits: String,
    pub taken_grade: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub met: bool,
    pub name: String,
    pub required_credits: String,
    pub earned_credits: String,
    pub gpa: String,
    pub courses: Vec<Course>,
}

/// The fully reconstructed degree evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub student_name: String,
    pub student_id: String,
    pub college: String,
    pub degree: String,
    pub level: String,
    pub majors: String,
    pub catalog_term: String,
    pub expected_graduation: String,
    pub generated: String,
    pub minors: String,
    pub concentrations: String,
    pub credits_met: bool,
    pub required_credits: String,
    pub used_credits: String,
    pub transfer_credits: String,
    pub program_gpa_met: MetStatus,
    pub overall_gpa_met: MetStatus,
    pub program_gpa: String,
    pub overall_gpa: String,
    pub areas: Vec<Area>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_is_case_neutral() {
        assert_eq!(MetStatus::yes_no("Yes"), MetStatus::Yes);
        assert_eq!(MetStatus::yes_no("YES"), MetStatus::Yes);
        assert_eq!(MetStatus::yes_no("No"), MetStatus::No);
        assert_eq!(MetStatus::yes_no(""), MetStatus::No);
    }

    #[test]
    fn tri_state_keeps_unknown() {
        assert_eq!(MetStatus::tri_state("yes"), MetStatus::Yes);
        assert_eq!(MetStatus::tri_state("NO"), MetStatus::No);
        assert_eq!(MetStatus::tri_state(""), MetStatus::Unknown);
        assert_eq!(MetStatus::tri_state("n/a"), MetStatus::Unknown);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [MetStatus::Yes, MetStatus::No, MetStatus::Unknown] {
            assert_eq!(MetStatus::tri_state(status.as_str()), status);
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MetStatus::Yes).unwrap(), "\"yes\"");
        assert_eq!(serde_json::to_string(&MetStatus::Unknown).unwrap(), "\"unknown\"");
    }
}
