use regex::Regex;

use crate::io::kv::KvStore;
use crate::io::task_store::TaskStore;
use crate::model::date_key::DateKey;
use crate::model::task::Task;

/// A task whose description matched
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub date: DateKey,
    pub task: Task,
}

/// Search every stored description. Hits come back oldest date first, and
/// in list order within a date.
pub fn search_tasks<K: KvStore>(store: &TaskStore<K>, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for date in store.all_dates() {
        for task in store.get(&date) {
            if re.is_match(&task.description) {
                hits.push(SearchHit { date, task });
            }
        }
    }
    hits
}
