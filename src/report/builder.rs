use super::classify::RowAction;
use super::model::{Area, Course};

/// Courses buffered while their elective group is still open. Details
/// are stamped at flush time, never at enqueue time, so a note row
/// arriving later still reaches every buffered course.
#[derive(Debug, Default)]
pub struct PendingGroup {
    queue: Vec<Course>,
}

impl PendingGroup {
    pub fn enqueue(&mut self, course: Course) {
        self.queue.push(course);
    }

    /// Move every buffered course into `out` with the shared details.
    /// Flushing an empty buffer is a no-op.
    pub fn flush_into(&mut self, out: &mut Vec<Course>, details: &str) {
        for mut course in self.queue.drain(..) {
            course.details = details.to_string();
            out.push(course);
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Streaming fold over classified rows. Holds the open area, the open
/// elective group's carried name, the details accumulator, and the
/// pending buffer; emits an area when the stream moves past it.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    areas: Vec<Area>,
    current: Option<Area>,
    pending: PendingGroup,
    group_name: String,
    details: String,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: RowAction) {
        match action {
            RowAction::AreaHeader {
                name,
                required_credits,
                met,
            } => {
                self.close_current();
                self.current = Some(Area {
                    met,
                    name,
                    required_credits,
                    ..Area::default()
                });
            }

            // Direct courses resolve on their own row and never pick up
            // details retroactively.
            RowAction::CourseFull(draft) | RowAction::CourseUnsatisfied(draft) => {
                if let Some(area) = self.current.as_mut() {
                    self.pending.flush_into(&mut area.courses, &self.details);
                    self.details.clear();
                    self.group_name.clear();
                    if !draft.requirement.is_empty() {
                        area.courses.push(draft.into_course());
                    }
                }
            }

            RowAction::GroupOpen(draft) => {
                if let Some(area) = self.current.as_mut() {
                    self.pending.flush_into(&mut area.courses, &self.details);
                    self.details.clear();
                    self.group_name = draft.requirement.clone();
                    if !draft.requirement.is_empty() {
                        self.pending.enqueue(draft.into_course());
                    }
                }
            }

            // Members only join a group that is actually open; the
            // carried name doubles as the open-group flag.
            RowAction::GroupCourse(mut draft) => {
                if self.current.is_some() && !self.group_name.is_empty() {
                    draft.requirement = self.group_name.clone();
                    self.pending.enqueue(draft.into_course());
                }
            }

            RowAction::GroupNoted { mut draft, note } => {
                if self.current.is_some() {
                    self.details = note;
                    if !self.group_name.is_empty() {
                        draft.requirement = self.group_name.clone();
                        self.pending.enqueue(draft.into_course());
                    }
                }
            }

            RowAction::NoteOnly(note) => {
                self.details = note;
            }

            RowAction::GroupEnd { commit } => {
                if commit {
                    if let Some(area) = self.current.as_mut() {
                        self.pending.flush_into(&mut area.courses, &self.details);
                    }
                }
                self.pending.clear();
                self.details.clear();
                self.group_name.clear();
            }

            // The totals footer closes the area; course rows arriving
            // after it are dropped until the next heading.
            RowAction::AreaTotals {
                earned_credits,
                gpa,
            } => {
                if let Some(mut area) = self.current.take() {
                    self.pending.flush_into(&mut area.courses, &self.details);
                    self.details.clear();
                    self.group_name.clear();
                    area.earned_credits = earned_credits;
                    area.gpa = gpa;
                    if !area.name.is_empty() {
                        self.areas.push(area);
                    }
                }
            }

            RowAction::Skip => {}
        }
    }

    pub fn finish(mut self) -> Vec<Area> {
        self.close_current();
        self.areas
    }

    fn close_current(&mut self) {
        if let Some(mut area) = self.current.take() {
            self.pending.flush_into(&mut area.courses, &self.details);
            if !area.name.is_empty() {
                self.areas.push(area);
            }
        }
        self.details.clear();
        self.group_name.clear();
    }
}

/// Fold a classified row stream into completed areas.
pub fn build_areas(actions: Vec<RowAction>) -> Vec<Area> {
    let mut builder = ReportBuilder::new();
    for action in actions {
        builder.push(action);
    }
    builder.finish()
}
