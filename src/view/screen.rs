use std::fmt;

use serde::Serialize;

use crate::io::kv::KvStore;
use crate::io::task_store::TaskStore;
use crate::model::date_key::DateKey;
use crate::model::task::{NewTask, Task, TaskId, TaskRef};
use crate::ops::task_ops::{self, TaskError};
use crate::util::date::{DayClass, display_format, relative_day};
use crate::view::projector::{DateGroup, RenderModel, project_future, project_past, project_single_date};

/// Which listing a date belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Today,
    Past,
    Future,
}

impl Screen {
    pub fn for_date(date: &DateKey, today: &DateKey) -> Screen {
        match relative_day(date, today) {
            DayClass::Past => Screen::Past,
            DayClass::Today => Screen::Today,
            DayClass::Future => Screen::Future,
        }
    }
}

/// A dated block of tasks with its human-readable header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub date: DateKey,
    pub header: String,
    pub tasks: Vec<Task>,
}

impl From<DateGroup> for Section {
    fn from(group: DateGroup) -> Self {
        Section {
            header: display_format(&group.date),
            date: group.date,
            tasks: group.tasks,
        }
    }
}

/// Everything a front end needs to draw one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub screen: Screen,
    pub sections: Vec<Section>,
    /// Shown instead of sections when there are none
    pub empty_message: &'static str,
}

impl View {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Transient message shown after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    TaskAdded,
    TaskDeleted,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TaskAdded => write!(f, "Task added successfully!"),
            Notice::TaskDeleted => write!(f, "Task deleted"),
        }
    }
}

/// Result of a mutation: the refreshed listing for the affected date
#[derive(Debug, Clone)]
pub struct Outcome {
    pub view: View,
    pub notice: Option<Notice>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_today<K: KvStore>(store: &TaskStore<K>, today: &DateKey) -> View {
    View {
        screen: Screen::Today,
        sections: single_section(store, today),
        empty_message: "No tasks for today",
    }
}

pub fn render_past<K: KvStore>(store: &TaskStore<K>, today: &DateKey) -> View {
    View {
        screen: Screen::Past,
        sections: project_past(store, today).into_iter().map(Section::from).collect(),
        empty_message: "No tasks found",
    }
}

pub fn render_future<K: KvStore>(store: &TaskStore<K>, today: &DateKey) -> View {
    View {
        screen: Screen::Future,
        sections: project_future(store, today).into_iter().map(Section::from).collect(),
        empty_message: "No tasks found",
    }
}

pub fn render_screen<K: KvStore>(store: &TaskStore<K>, screen: Screen, today: &DateKey) -> View {
    match screen {
        Screen::Today => render_today(store, today),
        Screen::Past => render_past(store, today),
        Screen::Future => render_future(store, today),
    }
}

/// One specific day, whichever screen it falls on
pub fn render_date<K: KvStore>(store: &TaskStore<K>, date: &DateKey, today: &DateKey) -> View {
    View {
        screen: Screen::for_date(date, today),
        sections: single_section(store, date),
        empty_message: "No tasks for this date",
    }
}

fn single_section<K: KvStore>(store: &TaskStore<K>, date: &DateKey) -> Vec<Section> {
    match project_single_date(store, date) {
        RenderModel::Empty => Vec::new(),
        RenderModel::Tasks(tasks) => vec![Section {
            date: *date,
            header: display_format(date),
            tasks,
        }],
    }
}

// ---------------------------------------------------------------------------
// Mutation entry points
// ---------------------------------------------------------------------------

/// Add a validated task, then re-render the screen its date belongs to.
pub fn handle_add_task<K: KvStore>(
    store: &mut TaskStore<K>,
    new_task: NewTask,
    today: &DateKey,
) -> Result<(TaskId, Outcome), TaskError> {
    let date = new_task.date;
    let id = task_ops::add_task(store, &date, new_task.time, new_task.description)?;
    let outcome = Outcome {
        view: render_screen(store, Screen::for_date(&date, today), today),
        notice: Some(Notice::TaskAdded),
    };
    Ok((id, outcome))
}

pub fn handle_toggle_task<K: KvStore>(
    store: &mut TaskStore<K>,
    date: &DateKey,
    task_ref: TaskRef,
    today: &DateKey,
) -> Result<Outcome, TaskError> {
    task_ops::toggle_task(store, date, task_ref)?;
    Ok(Outcome {
        view: render_screen(store, Screen::for_date(date, today), today),
        notice: None,
    })
}

pub fn handle_delete_task<K: KvStore>(
    store: &mut TaskStore<K>,
    date: &DateKey,
    task_ref: TaskRef,
    today: &DateKey,
) -> Result<Outcome, TaskError> {
    task_ops::delete_task(store, date, task_ref)?;
    Ok(Outcome {
        view: render_screen(store, Screen::for_date(date, today), today),
        notice: Some(Notice::TaskDeleted),
    })
}
