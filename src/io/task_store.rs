use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::io::kv::{KvStore, StoreError};
use crate::model::date_key::DateKey;
use crate::model::task::{Task, TaskId, TaskTime};

/// Every task-list entry key starts with this prefix, followed by the DateKey
pub const KEY_PREFIX: &str = "todo-";

/// Storage key for a date's task list
pub fn storage_key(date: &DateKey) -> String {
    format!("{}{}", KEY_PREFIX, date)
}

/// On-disk task shape. `id` is optional so lists written before tasks carried
/// ids still load; `done` defaults to false for the same reason.
#[derive(Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<TaskId>,
    time: TaskTime,
    task: String,
    #[serde(default)]
    done: bool,
}

/// Per-date task lists on top of a [`KvStore`].
///
/// The only write path is [`TaskStore::set`], which never persists an empty
/// list: an absent entry and an empty day are the same thing.
#[derive(Debug)]
pub struct TaskStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> TaskStore<K> {
    pub fn new(kv: K) -> Self {
        TaskStore { kv }
    }

    #[cfg(test)]
    pub(crate) fn kv(&self) -> &K {
        &self.kv
    }

    /// The stored list for `date`, or an empty one. Never fails: unreadable
    /// entries are logged and read as empty.
    pub fn get(&self, date: &DateKey) -> Vec<Task> {
        match self.read(date) {
            Ok((tasks, _)) => tasks,
            Err(e) => {
                warn!(date = %date, error = %e, "unreadable task list, showing it as empty");
                Vec::new()
            }
        }
    }

    /// Like [`get`](Self::get) but reports corrupt or unreadable entries.
    ///
    /// Lists stored without task ids get fresh ids and are written back once,
    /// so ids handed out from here stay stable.
    pub fn try_get(&mut self, date: &DateKey) -> Result<Vec<Task>, StoreError> {
        let (tasks, upgraded) = self.read(date)?;
        if upgraded {
            info!(date = %date, count = tasks.len(), "assigned ids to legacy task list");
            self.set(date, &tasks)?;
        }
        Ok(tasks)
    }

    /// Replace the list for `date`. An empty list removes the entry.
    pub fn set(&mut self, date: &DateKey, tasks: &[Task]) -> Result<(), StoreError> {
        let key = storage_key(date);
        if tasks.is_empty() {
            debug!(date = %date, "removing empty task list");
            return self.kv.remove(&key);
        }
        let json = serde_json::to_string(tasks).map_err(|source| StoreError::EncodeError {
            date: *date,
            source,
        })?;
        debug!(date = %date, count = tasks.len(), "saving task list");
        self.kv.set(&key, &json)
    }

    /// Every date with a stored list, ascending.
    /// Keys that are not `todo-<YYYY-MM-DD>` are skipped.
    pub fn all_dates(&self) -> Vec<DateKey> {
        let keys = match self.kv.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "could not enumerate stored dates");
                return Vec::new();
            }
        };
        let mut dates: Vec<DateKey> = keys
            .iter()
            .filter_map(|k| k.strip_prefix(KEY_PREFIX))
            .filter_map(|d| DateKey::parse(d).ok())
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    fn read(&self, date: &DateKey) -> Result<(Vec<Task>, bool), StoreError> {
        let Some(raw) = self.kv.get(&storage_key(date))? else {
            return Ok((Vec::new(), false));
        };
        let stored: Vec<StoredTask> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                date: *date,
                source,
            })?;

        let mut upgraded = false;
        let tasks = stored
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                let id = s.id.unwrap_or_else(|| {
                    upgraded = true;
                    TaskId::legacy(date, index, &s.time, &s.task)
                });
                Task {
                    id,
                    time: s.time,
                    description: s.task,
                    done: s.done,
                }
            })
            .collect();
        Ok((tasks, upgraded))
    }
}
