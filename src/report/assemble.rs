use super::header::{HeaderFields, SummaryFields};
use super::model::{Area, Evaluation};

/// Combine the independent passes into the final evaluation record.
/// Pure aggregation: fields a pass never found stay at their empty
/// defaults.
pub fn assemble(header: HeaderFields, summary: SummaryFields, areas: Vec<Area>) -> Evaluation {
    Evaluation {
        student_name: header.student_name,
        student_id: header.student_id,
        college: header.college,
        degree: header.degree,
        level: header.level,
        majors: header.majors,
        catalog_term: header.catalog_term,
        expected_graduation: header.expected_graduation,
        generated: header.generated,
        minors: header.minors,
        concentrations: header.concentrations,
        credits_met: summary.credits_met,
        required_credits: summary.required_credits,
        used_credits: summary.used_credits,
        transfer_credits: summary.transfer_credits,
        program_gpa_met: summary.program_gpa_met,
        overall_gpa_met: summary.overall_gpa_met,
        program_gpa: summary.program_gpa,
        overall_gpa: summary.overall_gpa,
        areas,
    }
}
