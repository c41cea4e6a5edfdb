use std::sync::LazyLock;

use regex::Regex;

use super::model::MetStatus;
use super::rows::Row;

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4,})[ \t]+(.+)").unwrap());
static LINE_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

#[derive(Debug, Clone, Default)]
pub struct HeaderFields {
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
}

#[derive(Debug, Clone, Default)]
pub struct SummaryFields {
    pub credits_met: bool,
    pub required_credits: String,
    pub used_credits: String,
    pub transfer_credits: String,
    pub program_gpa_met: MetStatus,
    pub overall_gpa_met: MetStatus,
    pub program_gpa: String,
    pub overall_gpa: String,
}

/// Pull the student id and name out of the raw portal header text:
/// the first run of 4+ digits and the rest of that line. No match
/// leaves both empty.
pub fn parse_identity(text: &str) -> (String, String) {
    match IDENT_RE.captures(text) {
        Some(caps) => (caps[1].to_string(), caps[2].trim().to_string()),
        None => (String::new(), String::new()),
    }
}

/// Read the curriculum-overview table: label/value cells walked
/// pairwise, matched case-neutrally. Unknown labels are ignored and
/// missing ones leave empty defaults.
pub fn parse_header(ident: &str, rows: &[Row]) -> HeaderFields {
    let (student_id, student_name) = parse_identity(ident);
    let mut fields = HeaderFields {
        student_id,
        student_name,
        ..HeaderFields::default()
    };

    for row in rows {
        for (label, value) in row.labels.iter().zip(row.cells.iter()) {
            match label.to_lowercase().as_str() {
                "college :" => fields.college = value.clone(),
                "degree :" => fields.degree = value.clone(),
                "level :" => fields.level = value.clone(),
                "majors :" => fields.majors = join_lines(value),
                "catalog term :" => fields.catalog_term = value.clone(),
                "expected graduation date :" => fields.expected_graduation = value.clone(),
                "results as of :" => fields.generated = value.clone(),
                "minors :" => fields.minors = join_lines(value),
                "concentrations :" => fields.concentrations = join_lines(value),
                _ => {}
            }
        }
    }

    fields
}

/// Read the credit/GPA summary table. Only 1-label/5-cell rows carry
/// information; everything else is ignored.
pub fn parse_summary(rows: &[Row]) -> SummaryFields {
    let mut fields = SummaryFields::default();

    for row in rows {
        if row.labels.len() != 1 || row.cells.len() != 5 {
            continue;
        }
        match row.label(0).to_lowercase().as_str() {
            "total required :" => {
                fields.credits_met = row.cell(0).eq_ignore_ascii_case("yes");
                fields.required_credits = row.cell(1).to_string();
                fields.used_credits = row.cell(2).to_string();
            }
            "program gpa :" => {
                fields.program_gpa_met = MetStatus::tri_state(row.cell(0));
                fields.program_gpa = row.cell(2).to_string();
            }
            "overall gpa :" => {
                fields.overall_gpa_met = MetStatus::tri_state(row.cell(0));
                fields.overall_gpa = row.cell(2).to_string();
            }
            "transfer :" => {
                fields.transfer_credits = row.cell(2).to_string();
            }
            _ => {}
        }
    }

    fields
}

// Multi-value cells render one entry per line; collapse to a list.
fn join_lines(value: &str) -> String {
    LINE_RUNS_RE.replace_all(value, ", ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_row(pairs: &[(&str, &str)]) -> Row {
        Row {
            labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
            cells: pairs.iter().map(|(_, v)| v.to_string()).collect(),
            ..Row::default()
        }
    }

    fn summary_row(label: &str, cells: &[&str]) -> Row {
        Row {
            labels: vec![label.to_string()],
            cells: cells.iter().map(|c| c.to_string()).collect(),
            ..Row::default()
        }
    }

    #[test]
    fn identity_from_header_text() {
        let (id, name) = parse_identity("Degree Evaluation\n123456789 Aaron Boyd\nFall 2014");
        assert_eq!(id, "123456789");
        assert_eq!(name, "Aaron Boyd");
    }

    #[test]
    fn identity_without_match_is_empty() {
        let (id, name) = parse_identity("no student line here");
        assert_eq!(id, "");
        assert_eq!(name, "");

        // Short digit runs are not ids
        let (id, _) = parse_identity("room 123 schedule");
        assert_eq!(id, "");
    }

    #[test]
    fn header_labels_match_case_neutrally() {
        let rows = vec![
            pair_row(&[("College :", "Engineering"), ("LEVEL :", "Undergraduate")]),
            pair_row(&[("degree :", "Bachelor of Science")]),
            pair_row(&[("Unknown Label :", "ignored")]),
        ];
        let fields = parse_header("987654321 Jane Doe", &rows);
        assert_eq!(fields.student_id, "987654321");
        assert_eq!(fields.student_name, "Jane Doe");
        assert_eq!(fields.college, "Engineering");
        assert_eq!(fields.level, "Undergraduate");
        assert_eq!(fields.degree, "Bachelor of Science");
        assert_eq!(fields.majors, "");
        assert_eq!(fields.catalog_term, "");
    }

    #[test]
    fn multi_value_cells_join_with_commas() {
        let rows = vec![pair_row(&[
            ("Majors :", "Computer Engineering\nElectrical Engineering"),
            ("Concentrations :", "Systems\n\n\nSoftware"),
        ])];
        let fields = parse_header("", &rows);
        assert_eq!(fields.majors, "Computer Engineering, Electrical Engineering");
        assert_eq!(fields.concentrations, "Systems, Software");
    }

    #[test]
    fn summary_rows_fill_fields() {
        let rows = vec![
            summary_row("Total Required :", &["No", "161.000", "128.000", "", ""]),
            summary_row("Program GPA :", &["Yes", "2.000", "3.418", "", ""]),
            summary_row("Overall GPA :", &["", "", "3.200", "", ""]),
            summary_row("Transfer :", &["", "", "4.000", "", ""]),
        ];
        let fields = parse_summary(&rows);
        assert!(!fields.credits_met);
        assert_eq!(fields.required_credits, "161.000");
        assert_eq!(fields.used_credits, "128.000");
        assert_eq!(fields.program_gpa_met, MetStatus::Yes);
        assert_eq!(fields.program_gpa, "3.418");
        assert_eq!(fields.overall_gpa_met, MetStatus::Unknown);
        assert_eq!(fields.overall_gpa, "3.200");
        assert_eq!(fields.transfer_credits, "4.000");
    }

    #[test]
    fn wrong_shape_summary_rows_ignored() {
        let rows = vec![
            summary_row("Total Required :", &["Yes", "10"]),
            pair_row(&[("Total Required :", "Yes")]),
        ];
        let fields = parse_summary(&rows);
        assert!(!fields.credits_met);
        assert_eq!(fields.required_credits, "");
    }
}
