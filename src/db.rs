use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::report::model::{Area, Course, Evaluation, MetStatus};

const DB_PATH: &str = "data/audit.sqlite";

pub fn connect() -> Result<Connection> {
    if let Some(dir) = Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS evaluations (
            id                  INTEGER PRIMARY KEY,
            source              TEXT UNIQUE NOT NULL,
            term                TEXT NOT NULL DEFAULT '',
            request_no          TEXT NOT NULL DEFAULT '',
            student_id          TEXT NOT NULL DEFAULT '',
            student_name        TEXT NOT NULL DEFAULT '',
            college             TEXT NOT NULL DEFAULT '',
            degree              TEXT NOT NULL DEFAULT '',
            level               TEXT NOT NULL DEFAULT '',
            majors              TEXT NOT NULL DEFAULT '',
            catalog_term        TEXT NOT NULL DEFAULT '',
            expected_graduation TEXT NOT NULL DEFAULT '',
            generated           TEXT NOT NULL DEFAULT '',
            minors              TEXT NOT NULL DEFAULT '',
            concentrations      TEXT NOT NULL DEFAULT '',
            credits_met         BOOLEAN NOT NULL DEFAULT 0,
            required_credits    TEXT NOT NULL DEFAULT '',
            used_credits        TEXT NOT NULL DEFAULT '',
            transfer_credits    TEXT NOT NULL DEFAULT '',
            program_gpa_met     TEXT NOT NULL CHECK(program_gpa_met IN ('yes','no','unknown')),
            overall_gpa_met     TEXT NOT NULL CHECK(overall_gpa_met IN ('yes','no','unknown')),
            program_gpa         TEXT NOT NULL DEFAULT '',
            overall_gpa         TEXT NOT NULL DEFAULT '',
            processed_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS areas (
            id               INTEGER PRIMARY KEY,
            evaluation_id    INTEGER NOT NULL REFERENCES evaluations(id) ON DELETE CASCADE,
            position         INTEGER NOT NULL,
            met              BOOLEAN NOT NULL,
            name             TEXT NOT NULL,
            required_credits TEXT NOT NULL DEFAULT '',
            earned_credits   TEXT NOT NULL DEFAULT '',
            gpa              TEXT NOT NULL DEFAULT '',
            UNIQUE(evaluation_id, position)
        );
        CREATE INDEX IF NOT EXISTS idx_areas_evaluation ON areas(evaluation_id);

        CREATE TABLE IF NOT EXISTS courses (
            id            INTEGER PRIMARY KEY,
            area_id       INTEGER NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL,
            met           TEXT NOT NULL CHECK(met IN ('yes','no','unknown')),
            requirement   TEXT NOT NULL,
            taken_id      TEXT NOT NULL DEFAULT '',
            taken_title   TEXT NOT NULL DEFAULT '',
            taken_term    TEXT NOT NULL DEFAULT '',
            taken_credits TEXT NOT NULL DEFAULT '',
            taken_grade   TEXT NOT NULL DEFAULT '',
            details       TEXT NOT NULL DEFAULT '',
            UNIQUE(area_id, position)
        );
        CREATE INDEX IF NOT EXISTS idx_courses_area ON courses(area_id);
        ",
    )?;
    Ok(())
}

/// One reconstructed evaluation plus the dump metadata it came from.
#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub source: String,
    pub term: String,
    pub request_no: String,
    pub evaluation: Evaluation,
}

// ── Saving ──

/// Re-processing the same source replaces the stored evaluation;
/// areas and courses go with it through the cascades.
pub fn save_evaluations(conn: &Connection, records: &[EvaluationRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut del_stmt = tx.prepare("DELETE FROM evaluations WHERE source = ?1")?;
        let mut eval_stmt = tx.prepare(
            "INSERT INTO evaluations
             (source, term, request_no, student_id, student_name, college, degree, level,
              majors, catalog_term, expected_graduation, generated, minors, concentrations,
              credits_met, required_credits, used_credits, transfer_credits,
              program_gpa_met, overall_gpa_met, program_gpa, overall_gpa, processed_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23)",
        )?;
        let mut area_stmt = tx.prepare(
            "INSERT INTO areas
             (evaluation_id, position, met, name, required_credits, earned_credits, gpa)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut course_stmt = tx.prepare(
            "INSERT INTO courses
             (area_id, position, met, requirement, taken_id, taken_title, taken_term,
              taken_credits, taken_grade, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        let now = Utc::now().to_rfc3339();
        for record in records {
            let e = &record.evaluation;
            del_stmt.execute(rusqlite::params![record.source])?;
            eval_stmt.execute(rusqlite::params![
                record.source,
                record.term,
                record.request_no,
                e.student_id,
                e.student_name,
                e.college,
                e.degree,
                e.level,
                e.majors,
                e.catalog_term,
                e.expected_graduation,
                e.generated,
                e.minors,
                e.concentrations,
                e.credits_met,
                e.required_credits,
                e.used_credits,
                e.transfer_credits,
                e.program_gpa_met.as_str(),
                e.overall_gpa_met.as_str(),
                e.program_gpa,
                e.overall_gpa,
                now,
            ])?;
            let eval_id = tx.last_insert_rowid();

            for (pos, area) in e.areas.iter().enumerate() {
                area_stmt.execute(rusqlite::params![
                    eval_id,
                    pos as i64,
                    area.met,
                    area.name,
                    area.required_credits,
                    area.earned_credits,
                    area.gpa,
                ])?;
                let area_id = tx.last_insert_rowid();

                for (cpos, course) in area.courses.iter().enumerate() {
                    course_stmt.execute(rusqlite::params![
                        area_id,
                        cpos as i64,
                        course.met.as_str(),
                        course.requirement,
                        course.taken_id,
                        course.taken_title,
                        course.taken_term,
                        course.taken_credits,
                        course.taken_grade,
                        course.details,
                    ])?;
                }
            }
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Loading ──

pub fn fetch_evaluation(conn: &Connection, source: &str) -> Result<Option<EvaluationRecord>> {
    let found = conn
        .query_row(
            "SELECT id, source, term, request_no, student_id, student_name, college, degree,
                    level, majors, catalog_term, expected_graduation, generated, minors,
                    concentrations, credits_met, required_credits, used_credits,
                    transfer_credits, program_gpa_met, overall_gpa_met, program_gpa, overall_gpa
             FROM evaluations WHERE source = ?1",
            rusqlite::params![source],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    EvaluationRecord {
                        source: row.get(1)?,
                        term: row.get(2)?,
                        request_no: row.get(3)?,
                        evaluation: Evaluation {
                            student_id: row.get(4)?,
                            student_name: row.get(5)?,
                            college: row.get(6)?,
                            degree: row.get(7)?,
                            level: row.get(8)?,
                            majors: row.get(9)?,
                            catalog_term: row.get(10)?,
                            expected_graduation: row.get(11)?,
                            generated: row.get(12)?,
                            minors: row.get(13)?,
                            concentrations: row.get(14)?,
                            credits_met: row.get(15)?,
                            required_credits: row.get(16)?,
                            used_credits: row.get(17)?,
                            transfer_credits: row.get(18)?,
                            program_gpa_met: MetStatus::tri_state(&row.get::<_, String>(19)?),
                            overall_gpa_met: MetStatus::tri_state(&row.get::<_, String>(20)?),
                            program_gpa: row.get(21)?,
                            overall_gpa: row.get(22)?,
                            areas: Vec::new(),
                        },
                    },
                ))
            },
        )
        .optional()?;

    let (eval_id, mut record) = match found {
        Some(v) => v,
        None => return Ok(None),
    };
    record.evaluation.areas = fetch_areas(conn, eval_id)?;
    Ok(Some(record))
}

fn fetch_areas(conn: &Connection, eval_id: i64) -> Result<Vec<Area>> {
    let mut stmt = conn.prepare(
        "SELECT id, met, name, required_credits, earned_credits, gpa
         FROM areas WHERE evaluation_id = ?1 ORDER BY position",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![eval_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Area {
                    met: row.get(1)?,
                    name: row.get(2)?,
                    required_credits: row.get(3)?,
                    earned_credits: row.get(4)?,
                    gpa: row.get(5)?,
                    courses: Vec::new(),
                },
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut areas = Vec::with_capacity(rows.len());
    for (area_id, mut area) in rows {
        area.courses = fetch_courses(conn, area_id)?;
        areas.push(area);
    }
    Ok(areas)
}

fn fetch_courses(conn: &Connection, area_id: i64) -> Result<Vec<Course>> {
    let mut stmt = conn.prepare(
        "SELECT met, requirement, taken_id, taken_title, taken_term, taken_credits,
                taken_grade, details
         FROM courses WHERE area_id = ?1 ORDER BY position",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![area_id], |row| {
            Ok(Course {
                met: MetStatus::tri_state(&row.get::<_, String>(0)?),
                requirement: row.get(1)?,
                taken_id: row.get(2)?,
                taken_title: row.get(3)?,
                taken_term: row.get(4)?,
                taken_credits: row.get(5)?,
                taken_grade: row.get(6)?,
                details: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Overview ──

pub struct OverviewRow {
    pub source: String,
    pub student_name: String,
    pub degree: String,
    pub catalog_term: String,
    pub areas_met: i64,
    pub areas_total: i64,
    pub overall_gpa: String,
}

pub fn fetch_overview(conn: &Connection, limit: usize) -> Result<Vec<OverviewRow>> {
    let sql = format!(
        "SELECT e.source, e.student_name, e.degree, e.catalog_term,
                (SELECT COUNT(*) FROM areas a WHERE a.evaluation_id = e.id AND a.met = 1),
                (SELECT COUNT(*) FROM areas a WHERE a.evaluation_id = e.id),
                e.overall_gpa
         FROM evaluations e
         ORDER BY e.processed_at DESC, e.source
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OverviewRow {
                source: row.get(0)?,
                student_name: row.get(1)?,
                degree: row.get(2)?,
                catalog_term: row.get(3)?,
                areas_met: row.get(4)?,
                areas_total: row.get(5)?,
                overall_gpa: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub evaluations: usize,
    pub areas: usize,
    pub areas_met: usize,
    pub courses: usize,
    pub courses_met: usize,
    pub courses_unmet: usize,
    pub courses_unknown: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let evaluations: usize =
        conn.query_row("SELECT COUNT(*) FROM evaluations", [], |r| r.get(0))?;
    let areas: usize = conn.query_row("SELECT COUNT(*) FROM areas", [], |r| r.get(0))?;
    let areas_met: usize =
        conn.query_row("SELECT COUNT(*) FROM areas WHERE met = 1", [], |r| r.get(0))?;
    let courses: usize = conn.query_row("SELECT COUNT(*) FROM courses", [], |r| r.get(0))?;
    let courses_met: usize = conn.query_row(
        "SELECT COUNT(*) FROM courses WHERE met = 'yes'",
        [],
        |r| r.get(0),
    )?;
    let courses_unmet: usize = conn.query_row(
        "SELECT COUNT(*) FROM courses WHERE met = 'no'",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        evaluations,
        areas,
        areas_met,
        courses,
        courses_met,
        courses_unmet,
        courses_unknown: courses - courses_met - courses_unmet,
    })
}
