use serde::Serialize;

use crate::model::config::DisplayConfig;
use crate::model::date_key::DateKey;
use crate::model::task::{Task, TaskId};
use crate::ops::search::SearchHit;
use crate::util::date::DayClass;
use crate::util::unicode::{pad_to_width, truncate_to_width};
use crate::view::screen::{Notice, Outcome, Screen, Section, View};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    /// 1-based position within the day, as accepted by `--index`
    pub position: usize,
    pub time: String,
    pub task: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct SectionJson {
    pub date: DateKey,
    pub header: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ViewJson {
    pub screen: Screen,
    pub sections: Vec<SectionJson>,
}

#[derive(Serialize)]
pub struct OutcomeJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub view: ViewJson,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub date: DateKey,
    pub id: String,
    pub time: String,
    pub task: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct DateSummaryJson {
    pub date: DateKey,
    pub day: &'static str,
    pub tasks: usize,
    pub done: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, position: usize) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        position,
        time: task.time.to_string(),
        task: task.description.clone(),
        done: task.done,
    }
}

pub fn section_to_json(section: &Section) -> SectionJson {
    SectionJson {
        date: section.date,
        header: section.header.clone(),
        tasks: section
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| task_to_json(t, i + 1))
            .collect(),
    }
}

pub fn view_to_json(view: &View) -> ViewJson {
    ViewJson {
        screen: view.screen,
        sections: view.sections.iter().map(section_to_json).collect(),
    }
}

pub fn outcome_to_json(outcome: &Outcome, id: Option<TaskId>) -> OutcomeJson {
    OutcomeJson {
        id: id.map(|id| id.to_string()),
        notice: outcome.notice.map(|n| n.to_string()),
        view: view_to_json(&outcome.view),
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        date: hit.date,
        id: hit.task.id.to_string(),
        time: hit.task.time.to_string(),
        task: hit.task.description.clone(),
        done: hit.task.done,
    }
}

pub fn day_class_name(class: DayClass) -> &'static str {
    match class {
        DayClass::Past => "past",
        DayClass::Today => "today",
        DayClass::Future => "future",
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn description_cell(task: &Task, display: &DisplayConfig) -> String {
    if display.max_description_width == 0 {
        task.description.clone()
    } else {
        truncate_to_width(&task.description, display.max_description_width)
    }
}

/// Format a single task as a one-line summary: ` 1. [x] 08:00  Coffee`,
/// with the short id after the position when enabled.
pub fn format_task_line(task: &Task, position: usize, display: &DisplayConfig) -> String {
    let id_str = if display.show_ids {
        format!("{} ", task.id.short())
    } else {
        String::new()
    };
    format!(
        "{:>2}. {}[{}] {}  {}",
        position,
        id_str,
        task.check_char(),
        task.time,
        description_cell(task, display)
    )
}

/// Format a section header
pub fn format_section_header(section: &Section) -> String {
    format!("== {} ==", section.header)
}

/// Format a whole listing, or its empty-state message
pub fn format_view(view: &View, display: &DisplayConfig) -> Vec<String> {
    if view.is_empty() {
        return vec![view.empty_message.to_string()];
    }

    let mut lines = Vec::new();
    for (i, section) in view.sections.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_section_header(section));
        for (pos, task) in section.tasks.iter().enumerate() {
            lines.push(format_task_line(task, pos + 1, display));
        }
    }
    lines
}

/// Refreshed listing followed by the notice, if any
pub fn format_outcome(outcome: &Outcome, display: &DisplayConfig) -> Vec<String> {
    let mut lines = format_view(&outcome.view, display);
    if let Some(notice) = outcome.notice {
        lines.push(String::new());
        lines.push(format_notice(notice));
    }
    lines
}

pub fn format_notice(notice: Notice) -> String {
    format!("✓ {}", notice)
}

/// One search hit: `2025-06-01 09:00  [ ] Standup`
pub fn format_search_hit(hit: &SearchHit, display: &DisplayConfig) -> String {
    let id_str = if display.show_ids {
        format!("{} ", hit.task.id.short())
    } else {
        String::new()
    };
    format!(
        "{} {}  {}[{}] {}",
        hit.date,
        hit.task.time,
        id_str,
        hit.task.check_char(),
        description_cell(&hit.task, display)
    )
}

/// One line of the `dates` listing: `2025-06-01  past    2/3 done`
pub fn format_date_summary(date: &DateKey, class: DayClass, tasks: &[Task]) -> String {
    let done = tasks.iter().filter(|t| t.done).count();
    format!(
        "{}  {}  {}/{} done",
        date,
        pad_to_width(day_class_name(class), 6),
        done,
        tasks.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskTime;
    use insta::assert_snapshot;

    fn no_ids() -> DisplayConfig {
        DisplayConfig {
            show_ids: false,
            max_description_width: 20,
        }
    }

    fn task(time: &str, desc: &str, done: bool) -> Task {
        let mut t = Task::new(TaskTime::parse(time).unwrap(), desc.to_string());
        t.done = done;
        t
    }

    fn section(date: &str, header: &str, tasks: Vec<Task>) -> Section {
        Section {
            date: DateKey::parse(date).unwrap(),
            header: header.to_string(),
            tasks,
        }
    }

    #[test]
    fn test_task_line_with_id() {
        let t = task("08:00", "Coffee", true);
        let display = DisplayConfig {
            show_ids: true,
            max_description_width: 60,
        };
        let line = format_task_line(&t, 1, &display);
        assert_eq!(line, format!(" 1. {} [x] 08:00  Coffee", t.id.short()));
    }

    #[test]
    fn test_task_line_truncates_description() {
        let t = task("08:00", "Prepare the quarterly planning review", false);
        assert_eq!(
            format_task_line(&t, 12, &no_ids()),
            "12. [ ] 08:00  Prepare the quarter…"
        );
    }

    #[test]
    fn test_format_view_multiple_sections() {
        let view = View {
            screen: Screen::Past,
            sections: vec![
                section(
                    "2025-06-01",
                    "Sunday, June 1, 2025",
                    vec![task("08:00", "Coffee", true), task("09:00", "Standup", false)],
                ),
                section(
                    "2025-05-30",
                    "Friday, May 30, 2025",
                    vec![task("18:00", "Gym", false)],
                ),
            ],
            empty_message: "No tasks found",
        };
        assert_snapshot!(format_view(&view, &no_ids()).join("\n"), @r"
        == Sunday, June 1, 2025 ==
         1. [x] 08:00  Coffee
         2. [ ] 09:00  Standup

        == Friday, May 30, 2025 ==
         1. [ ] 18:00  Gym
        ");
    }

    #[test]
    fn test_format_empty_view() {
        let view = View {
            screen: Screen::Today,
            sections: Vec::new(),
            empty_message: "No tasks for today",
        };
        assert_eq!(format_view(&view, &no_ids()), vec!["No tasks for today"]);
    }

    #[test]
    fn test_format_outcome_appends_notice() {
        let outcome = Outcome {
            view: View {
                screen: Screen::Today,
                sections: Vec::new(),
                empty_message: "No tasks for today",
            },
            notice: Some(Notice::TaskDeleted),
        };
        assert_eq!(
            format_outcome(&outcome, &no_ids()),
            vec!["No tasks for today", "", "✓ Task deleted"]
        );
    }

    #[test]
    fn test_format_date_summary() {
        let date = DateKey::parse("2025-06-01").unwrap();
        let tasks = vec![task("08:00", "a", true), task("09:00", "b", false)];
        assert_eq!(
            format_date_summary(&date, DayClass::Past, &tasks),
            "2025-06-01  past    1/2 done"
        );
        assert_eq!(
            format_date_summary(&date, DayClass::Future, &tasks),
            "2025-06-01  future  1/2 done"
        );
    }

    #[test]
    fn test_view_json_positions_are_one_based() {
        let view = View {
            screen: Screen::Today,
            sections: vec![section(
                "2025-06-02",
                "Monday, June 2, 2025",
                vec![task("08:00", "Coffee", false), task("09:00", "Standup", true)],
            )],
            empty_message: "No tasks for today",
        };
        let json = serde_json::to_value(view_to_json(&view)).unwrap();
        assert_eq!(json["screen"], "today");
        assert_eq!(json["sections"][0]["date"], "2025-06-02");
        assert_eq!(json["sections"][0]["tasks"][1]["position"], 2);
        assert_eq!(json["sections"][0]["tasks"][1]["task"], "Standup");
        assert_eq!(json["sections"][0]["tasks"][1]["done"], true);
    }
}
