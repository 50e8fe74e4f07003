use std::collections::HashSet;

use crate::domain::Item;

/// Select the candidates whose permalink is not already known.
///
/// `existing` must be the items of the same source as `candidates`. The
/// result keeps candidate order and neither input is modified. A candidate
/// list repeating a permalink contributes it once.
pub fn merge_new<'a, I>(existing: I, candidates: &[Item]) -> Vec<Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut known: HashSet<&str> = existing.into_iter().map(|i| i.permalink.as_str()).collect();

    candidates
        .iter()
        .filter(|c| known.insert(c.permalink.as_str()))
        .cloned()
        .collect()
}
