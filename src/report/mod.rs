pub mod assemble;
pub mod builder;
pub mod classify;
pub mod header;
pub mod model;
pub mod rows;

use model::Evaluation;
use rows::ReportDump;

/// Reconstruct one degree evaluation from its extracted row dump:
/// identity/overview/summary label passes, then the classified audit
/// rows folded into areas. Never fails; malformed rows are tolerated.
pub fn reconstruct(dump: &ReportDump) -> Evaluation {
    let header = header::parse_header(&dump.ident, &dump.overview);
    let summary = header::parse_summary(&dump.summary);
    let actions = dump.audit.iter().map(classify::classify).collect();
    let areas = builder::build_areas(actions);
    assemble::assemble(header, summary, areas)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::model::MetStatus;
    use super::*;

    fn load(fixture: &str) -> Evaluation {
        let path = format!("tests/fixtures/{}.json", fixture);
        let dump = rows::load_dump(Path::new(&path)).unwrap();
        reconstruct(&dump)
    }

    #[test]
    fn evaluation_fixture_header() {
        let eval = load("evaluation");
        assert_eq!(eval.student_id, "123456789");
        assert_eq!(eval.student_name, "Aaron Boyd");
        assert_eq!(eval.college, "College of Engineering");
        assert_eq!(eval.degree, "Bachelor of Science");
        assert_eq!(eval.level, "Undergraduate");
        assert_eq!(
            eval.majors,
            "Computer Engineering, Electrical Engineering"
        );
        assert_eq!(eval.catalog_term, "Fall 2014");
        assert_eq!(eval.expected_graduation, "Jun 20, 2016");
        assert_eq!(eval.generated, "Feb 09, 2015");
        assert_eq!(eval.minors, "");
    }

    #[test]
    fn evaluation_fixture_summary() {
        let eval = load("evaluation");
        assert!(!eval.credits_met);
        assert_eq!(eval.required_credits, "161.000");
        assert_eq!(eval.used_credits, "128.000");
        assert_eq!(eval.transfer_credits, "4.000");
        assert_eq!(eval.program_gpa_met, MetStatus::Yes);
        assert_eq!(eval.program_gpa, "3.418");
        assert_eq!(eval.overall_gpa_met, MetStatus::Unknown);
        assert_eq!(eval.overall_gpa, "3.418");
    }

    #[test]
    fn evaluation_fixture_areas() {
        let eval = load("evaluation");
        assert_eq!(eval.areas.len(), 2);

        let comm = &eval.areas[0];
        assert!(comm.met);
        assert_eq!(comm.name, "Communications Core");
        assert_eq!(comm.required_credits, "12.00");
        assert_eq!(comm.earned_credits, "12.00");
        assert_eq!(comm.gpa, "3.55");
        assert_eq!(comm.courses.len(), 3);

        // Direct course, resolved on its own row
        assert_eq!(comm.courses[0].requirement, "COMM-101");
        assert_eq!(comm.courses[0].met, MetStatus::Yes);
        assert_eq!(comm.courses[0].taken_id, "COMM-101");
        assert_eq!(comm.courses[0].details, "");

        // Elective group: both members share the inherited name and the
        // note that arrived after them
        assert_eq!(comm.courses[1].requirement, "COMM Elective");
        assert_eq!(comm.courses[1].taken_id, "COMM-201");
        assert_eq!(comm.courses[1].details, "Choose 8 credits of COMM electives");
        assert_eq!(comm.courses[2].requirement, "COMM Elective");
        assert_eq!(comm.courses[2].taken_id, "COMM-301");
        assert_eq!(comm.courses[2].met, MetStatus::Unknown);
        assert_eq!(comm.courses[2].details, "Choose 8 credits of COMM electives");

        // Second area is still open at end of input
        let math = &eval.areas[1];
        assert!(!math.met);
        assert_eq!(math.name, "Mathematics");
        assert_eq!(math.required_credits, "16.00");
        assert_eq!(math.earned_credits, "");
        assert_eq!(math.gpa, "");
        assert_eq!(math.courses.len(), 2);
        assert_eq!(math.courses[0].requirement, "MATH-101");
        assert_eq!(math.courses[0].met, MetStatus::Yes);
        assert_eq!(math.courses[1].requirement, "MATH-203");
        assert_eq!(math.courses[1].met, MetStatus::No);
        assert_eq!(math.courses[1].taken_id, "");
    }

    #[test]
    fn empty_fixture_reconstructs_to_defaults() {
        let eval = load("empty");
        assert_eq!(eval.student_name, "");
        assert_eq!(eval.student_id, "");
        assert!(eval.areas.is_empty());
        assert_eq!(eval.overall_gpa_met, MetStatus::Unknown);
        assert!(!eval.credits_met);
    }
}
