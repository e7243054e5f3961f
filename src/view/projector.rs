//! Read-only projections from the task store into display-ready groups.
//!
//! Nothing here writes to the store; every function reads current state and
//! returns owned data.

use crate::io::kv::KvStore;
use crate::io::task_store::TaskStore;
use crate::model::date_key::DateKey;
use crate::model::task::Task;
use crate::util::date::{is_future_on, is_past_on};

/// A single day's tasks, or nothing to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderModel {
    /// The date has no stored tasks
    Empty,
    /// Tasks in time order (never empty)
    Tasks(Vec<Task>),
}

/// Date ordering for multi-day projections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One date and its tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub date: DateKey,
    pub tasks: Vec<Task>,
}

pub fn project_single_date<K: KvStore>(store: &TaskStore<K>, date: &DateKey) -> RenderModel {
    let tasks = store.get(date);
    if tasks.is_empty() {
        RenderModel::Empty
    } else {
        RenderModel::Tasks(tasks)
    }
}

/// Every stored date accepted by `predicate`, in `order`, with its tasks.
/// Dates that read back empty are left out.
pub fn project_date_range<K, P>(store: &TaskStore<K>, predicate: P, order: Order) -> Vec<DateGroup>
where
    K: KvStore,
    P: Fn(&DateKey) -> bool,
{
    let mut dates: Vec<DateKey> = store.all_dates().into_iter().filter(|d| predicate(d)).collect();
    if order == Order::Desc {
        dates.reverse();
    }
    dates
        .into_iter()
        .filter_map(|date| {
            let tasks = store.get(&date);
            (!tasks.is_empty()).then_some(DateGroup { date, tasks })
        })
        .collect()
}

/// Days before `today`, most recent first
pub fn project_past<K: KvStore>(store: &TaskStore<K>, today: &DateKey) -> Vec<DateGroup> {
    project_date_range(store, |d| is_past_on(d, today), Order::Desc)
}

/// Days after `today`, soonest first
pub fn project_future<K: KvStore>(store: &TaskStore<K>, today: &DateKey) -> Vec<DateGroup> {
    project_date_range(store, |d| is_future_on(d, today), Order::Asc)
}
