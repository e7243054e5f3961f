use tracing::debug;

use crate::io::kv::{KvStore, StoreError};
use crate::io::task_store::TaskStore;
use crate::model::date_key::DateKey;
use crate::model::task::{Task, TaskId, TaskRef, TaskTime};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("no task at position {index} on {date} ({len} tasks)")]
    IndexOutOfRange {
        date: DateKey,
        index: usize,
        len: usize,
    },
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task id prefix '{0}' matches more than one task")]
    Ambiguous(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a task to `date`'s list and keep the list sorted by time.
/// Returns the new task's id.
///
/// Expects validated input (see [`NewTask::parse`](crate::model::task::NewTask::parse)):
/// a non-blank description.
pub fn add_task<K: KvStore>(
    store: &mut TaskStore<K>,
    date: &DateKey,
    time: TaskTime,
    description: String,
) -> Result<TaskId, TaskError> {
    let mut tasks = store.try_get(date)?;
    let task = Task::new(time, description);
    let id = task.id;
    tasks.push(task);
    sort_by_time(&mut tasks);
    store.set(date, &tasks)?;
    debug!(date = %date, id = %id.short(), "task added");
    Ok(id)
}

/// Remove the addressed task and return it. Removing the last task of a day
/// removes the day's entry.
pub fn delete_task<K: KvStore>(
    store: &mut TaskStore<K>,
    date: &DateKey,
    task_ref: TaskRef,
) -> Result<Task, TaskError> {
    let mut tasks = store.try_get(date)?;
    let index = position(&tasks, date, task_ref)?;
    let removed = tasks.remove(index);
    store.set(date, &tasks)?;
    debug!(date = %date, id = %removed.id.short(), "task deleted");
    Ok(removed)
}

/// Flip the addressed task's done flag and return the new value.
///
/// An unknown index or id is an error, the same as for [`delete_task`].
pub fn toggle_task<K: KvStore>(
    store: &mut TaskStore<K>,
    date: &DateKey,
    task_ref: TaskRef,
) -> Result<bool, TaskError> {
    let mut tasks = store.try_get(date)?;
    let index = position(&tasks, date, task_ref)?;
    let task = &mut tasks[index];
    task.done = !task.done;
    let done = task.done;
    store.set(date, &tasks)?;
    debug!(date = %date, index, done, "task toggled");
    Ok(done)
}

/// Remove every done task from `date`. Returns how many were removed.
pub fn clear_done<K: KvStore>(store: &mut TaskStore<K>, date: &DateKey) -> Result<usize, TaskError> {
    let mut tasks = store.try_get(date)?;
    let before = tasks.len();
    tasks.retain(|t| !t.done);
    let removed = before - tasks.len();
    if removed > 0 {
        store.set(date, &tasks)?;
        debug!(date = %date, removed, "done tasks cleared");
    }
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Stable sort by time: tasks at the same time keep their insertion order.
pub fn sort_by_time(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.time.cmp(&b.time));
}

/// Resolve a [`TaskRef`] to a position in `tasks`.
pub fn position(tasks: &[Task], date: &DateKey, task_ref: TaskRef) -> Result<usize, TaskError> {
    match task_ref {
        TaskRef::Index(index) if index < tasks.len() => Ok(index),
        TaskRef::Index(index) => Err(TaskError::IndexOutOfRange {
            date: *date,
            index,
            len: tasks.len(),
        }),
        TaskRef::Id(id) => tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(format!("{} on {}", id.short(), date))),
    }
}

/// Find the single task whose id starts with `prefix`, searching one date or
/// all of them. Returns the date it lives on and its full id.
pub fn resolve_id_prefix<K: KvStore>(
    store: &TaskStore<K>,
    prefix: &str,
    date: Option<&DateKey>,
) -> Result<(DateKey, TaskId), TaskError> {
    let dates = match date {
        Some(d) => vec![*d],
        None => store.all_dates(),
    };

    let mut found: Option<(DateKey, TaskId)> = None;
    for d in dates {
        for task in store.get(&d) {
            if task.id.matches_prefix(prefix) {
                if found.is_some() {
                    return Err(TaskError::Ambiguous(prefix.to_string()));
                }
                found = Some((d, task.id));
            }
        }
    }
    found.ok_or_else(|| TaskError::NotFound(prefix.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryKv;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn time(s: &str) -> TaskTime {
        TaskTime::parse(s).unwrap()
    }

    /// (time, description, done) triples for compact comparisons
    fn summary(tasks: &[Task]) -> Vec<(String, String, bool)> {
        tasks
            .iter()
            .map(|t| (t.time.to_string(), t.description.clone(), t.done))
            .collect()
    }

    fn sample_store() -> TaskStore<MemoryKv> {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        add_task(&mut store, &d, time("09:00"), "Standup".into()).unwrap();
        add_task(&mut store, &d, time("08:00"), "Coffee".into()).unwrap();
        add_task(&mut store, &d, time("12:30"), "Lunch".into()).unwrap();
        store
    }

    // --- add ---

    #[test]
    fn test_add_sorts_by_time() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        add_task(&mut store, &d, time("09:00"), "Standup".into()).unwrap();
        add_task(&mut store, &d, time("08:00"), "Coffee".into()).unwrap();

        assert_eq!(
            summary(&store.get(&d)),
            vec![
                ("08:00".into(), "Coffee".into(), false),
                ("09:00".into(), "Standup".into(), false),
            ]
        );
    }

    #[test]
    fn test_add_same_time_keeps_insertion_order() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        add_task(&mut store, &d, time("09:00"), "First".into()).unwrap();
        add_task(&mut store, &d, time("08:00"), "Early".into()).unwrap();
        add_task(&mut store, &d, time("09:00"), "Second".into()).unwrap();
        add_task(&mut store, &d, time("09:00"), "Third".into()).unwrap();

        let descs: Vec<String> = store.get(&d).into_iter().map(|t| t.description).collect();
        assert_eq!(descs, vec!["Early", "First", "Second", "Third"]);
    }

    #[test]
    fn test_add_returns_id_of_stored_task() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        let id = add_task(&mut store, &d, time("09:00"), "Standup".into()).unwrap();
        let tasks = store.get(&d);
        let task = tasks.iter().find(|t| t.id == id).unwrap();
        assert_eq!(task.description, "Standup");
        assert!(!task.done);
    }

    #[test]
    fn test_add_does_not_touch_other_dates() {
        let mut store = sample_store();
        add_task(&mut store, &key("2025-06-02"), time("07:00"), "Run".into()).unwrap();
        assert_eq!(store.get(&key("2025-06-01")).len(), 3);
        assert_eq!(store.all_dates(), vec![key("2025-06-01"), key("2025-06-02")]);
    }

    #[test]
    fn test_add_refuses_to_overwrite_corrupt_list() {
        let mut kv = MemoryKv::new();
        kv.set("todo-2025-06-01", "{{{").unwrap();
        let mut store = TaskStore::new(kv);
        let err = add_task(&mut store, &key("2025-06-01"), time("08:00"), "x".into());
        assert!(matches!(err, Err(TaskError::Store(StoreError::Corrupt { .. }))));
        assert_eq!(store.kv().get("todo-2025-06-01").unwrap().as_deref(), Some("{{{"));
    }

    // --- delete ---

    #[test]
    fn test_delete_by_index() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        let removed = delete_task(&mut store, &d, TaskRef::Index(1)).unwrap();
        assert_eq!(removed.description, "Standup");
        assert_eq!(
            summary(&store.get(&d)),
            vec![
                ("08:00".into(), "Coffee".into(), false),
                ("12:30".into(), "Lunch".into(), false),
            ]
        );
    }

    #[test]
    fn test_delete_stale_index_fails() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        delete_task(&mut store, &d, TaskRef::Index(2)).unwrap();

        let err = delete_task(&mut store, &d, TaskRef::Index(2)).unwrap_err();
        assert!(matches!(
            err,
            TaskError::IndexOutOfRange { index: 2, len: 2, .. }
        ));
        assert_eq!(store.get(&d).len(), 2);
    }

    #[test]
    fn test_delete_by_id_survives_reordering() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        let standup = add_task(&mut store, &d, time("09:00"), "Standup".into()).unwrap();
        // Shifts Standup from position 0 to 1
        add_task(&mut store, &d, time("08:00"), "Coffee".into()).unwrap();

        let removed = delete_task(&mut store, &d, TaskRef::Id(standup)).unwrap();
        assert_eq!(removed.description, "Standup");
        assert!(matches!(
            delete_task(&mut store, &d, TaskRef::Id(standup)),
            Err(TaskError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_last_task_removes_date() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        add_task(&mut store, &d, time("08:00"), "Coffee".into()).unwrap();
        delete_task(&mut store, &d, TaskRef::Index(0)).unwrap();
        assert!(store.all_dates().is_empty());
        assert_eq!(store.kv().get("todo-2025-06-01").unwrap(), None);
    }

    #[test]
    fn test_delete_on_empty_date_fails() {
        let mut store = TaskStore::new(MemoryKv::new());
        assert!(matches!(
            delete_task(&mut store, &key("2025-06-01"), TaskRef::Index(0)),
            Err(TaskError::IndexOutOfRange { index: 0, len: 0, .. })
        ));
    }

    // --- toggle ---

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        let original = store.get(&d);

        assert!(toggle_task(&mut store, &d, TaskRef::Index(1)).unwrap());
        assert!(store.get(&d)[1].done);
        assert!(!toggle_task(&mut store, &d, TaskRef::Index(1)).unwrap());
        assert_eq!(store.get(&d), original);
    }

    #[test]
    fn test_toggle_out_of_range_is_error_and_no_change() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        let original = store.get(&d);
        assert!(matches!(
            toggle_task(&mut store, &d, TaskRef::Index(3)),
            Err(TaskError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
        assert_eq!(store.get(&d), original);
    }

    #[test]
    fn test_toggle_by_id() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        let lunch = store.get(&d)[2].id;
        assert!(toggle_task(&mut store, &d, TaskRef::Id(lunch)).unwrap());
        assert!(store.get(&d).iter().find(|t| t.id == lunch).unwrap().done);
    }

    #[test]
    fn test_ids_from_list_without_ids_are_usable() {
        let mut kv = MemoryKv::new();
        kv.set(
            "todo-2030-05-05",
            r#"[{"time":"08:00","task":"Coffee","done":false},{"time":"09:00","task":"Standup","done":false}]"#,
        )
        .unwrap();
        let mut store = TaskStore::new(kv);
        let d = key("2030-05-05");

        let shown = store.get(&d)[1].id;
        let (date, id) = resolve_id_prefix(&store, &shown.short(), None).unwrap();
        assert_eq!((date, id), (d, shown));
        assert!(toggle_task(&mut store, &d, TaskRef::Id(shown)).unwrap());
        assert!(store.get(&d)[1].done);
        assert_eq!(store.get(&d)[1].id, shown);
    }

    // --- clear ---

    #[test]
    fn test_clear_done() {
        let mut store = sample_store();
        let d = key("2025-06-01");
        toggle_task(&mut store, &d, TaskRef::Index(0)).unwrap();
        toggle_task(&mut store, &d, TaskRef::Index(2)).unwrap();

        assert_eq!(clear_done(&mut store, &d).unwrap(), 2);
        assert_eq!(
            summary(&store.get(&d)),
            vec![("09:00".into(), "Standup".into(), false)]
        );
        assert_eq!(clear_done(&mut store, &d).unwrap(), 0);
    }

    #[test]
    fn test_clear_all_done_removes_date() {
        let mut store = TaskStore::new(MemoryKv::new());
        let d = key("2025-06-01");
        add_task(&mut store, &d, time("08:00"), "Coffee".into()).unwrap();
        toggle_task(&mut store, &d, TaskRef::Index(0)).unwrap();
        clear_done(&mut store, &d).unwrap();
        assert!(store.all_dates().is_empty());
    }

    // --- id prefix ---

    #[test]
    fn test_resolve_id_prefix() {
        let mut store = sample_store();
        let other = key("2025-06-02");
        let run = add_task(&mut store, &other, time("07:00"), "Run".into()).unwrap();

        let full = run.to_string();
        assert_eq!(resolve_id_prefix(&store, &full, None).unwrap(), (other, run));
        assert_eq!(
            resolve_id_prefix(&store, &run.short(), Some(&other)).unwrap(),
            (other, run)
        );
        assert!(matches!(
            resolve_id_prefix(&store, &run.short(), Some(&key("2025-06-01"))),
            Err(TaskError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_id_prefix_ambiguous() {
        let mut kv = MemoryKv::new();
        kv.set(
            "todo-2025-06-01",
            r#"[{"id":"aaaa0000-0000-4000-8000-000000000001","time":"08:00","task":"a","done":false},
                {"id":"aaaa0000-0000-4000-8000-000000000002","time":"09:00","task":"b","done":false}]"#,
        )
        .unwrap();
        let store = TaskStore::new(kv);
        assert!(matches!(
            resolve_id_prefix(&store, "aaaa", None),
            Err(TaskError::Ambiguous(_))
        ));
        let (_, id) = resolve_id_prefix(&store, "aaaa0000-0000-4000-8000-000000000002", None).unwrap();
        assert_eq!(id.to_string(), "aaaa0000-0000-4000-8000-000000000002");
    }
}
