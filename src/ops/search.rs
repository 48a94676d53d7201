use std::ops::Range;

use regex::Regex;

use crate::model::store::Store;
use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Title,
    Description,
    Label,
}

/// A search hit for a task field
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Compile a user pattern case-insensitively, falling back to a literal
/// match when it is not a valid regex.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Search every task's ID, title, description and label titles.
pub fn search_tasks(store: &Store, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for task in &store.tasks {
        search_task(re, task, &mut hits);
    }
    hits
}

fn search_task(re: &Regex, task: &Task, hits: &mut Vec<SearchHit>) {
    let mut push = |field: MatchField, text: &str| {
        let spans = find_matches(re, text);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id.clone(),
                field,
                spans,
            });
        }
    };
    push(MatchField::Id, &task.id);
    push(MatchField::Title, &task.title);
    push(MatchField::Description, &task.description);
    for label in &task.labels {
        push(MatchField::Label, &label.title);
    }
}

/// Criteria for `tb list` and the board view
#[derive(Debug, Default)]
pub struct TaskFilter<'a> {
    pub status: Option<&'a str>,
    pub label: Option<&'a str>,
    /// Restrict to one module, in that module's order
    pub module: Option<&'a str>,
    pub pattern: Option<&'a Regex>,
}

/// Tasks matching every set criterion.
///
/// With a module filter the result follows the module's task order
/// (newest first); otherwise store order.
pub fn filter_tasks<'s>(store: &'s Store, filter: &TaskFilter<'_>) -> Vec<&'s Task> {
    let candidates: Vec<&Task> = match filter.module {
        Some(module_id) => store
            .module(module_id)
            .map(|m| m.tasks.iter().filter_map(|id| store.task(id)).collect())
            .unwrap_or_default(),
        None => store.tasks.iter().collect(),
    };

    candidates
        .into_iter()
        .filter(|t| filter.status.is_none_or(|s| t.status == s))
        .filter(|t| filter.label.is_none_or(|l| t.labels.iter().any(|x| x.title == l)))
        .filter(|t| {
            filter.pattern.is_none_or(|re| {
                let mut hits = Vec::new();
                search_task(re, t, &mut hits);
                !hits.is_empty()
            })
        })
        .collect()
}
