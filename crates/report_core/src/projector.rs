use std::collections::HashMap;

use crate::ResultItem;

pub const PREVIEW_WORDS: usize = 25;
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedItem {
    pub item: ResultItem,
    /// 1-based position inside the group.
    pub local_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileGroup {
    pub file_name: String,
    pub items: Vec<GroupedItem>,
}

/// Groups results by file name, in first-seen order, keeping relative order
/// inside each group.
pub fn project(results: &[ResultItem]) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for item in results {
        let name = item.file_name_or_unknown();
        let slot = *slots.entry(name).or_insert_with(|| {
            groups.push(FileGroup {
                file_name: name.to_string(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        let local_index = group.items.len() + 1;
        group.items.push(GroupedItem {
            item: item.clone(),
            local_index,
        });
    }

    groups
}

/// Inverse of [`project`]: groups in order, then items in local order.
pub fn flatten(groups: &[FileGroup]) -> Vec<ResultItem> {
    groups
        .iter()
        .flat_map(|group| group.items.iter().map(|grouped| grouped.item.clone()))
        .collect()
}

/// First `max_words` whitespace-delimited words plus [`TRUNCATION_MARKER`];
/// shorter text comes back untouched.
pub fn preview(text: &str, max_words: usize) -> String {
    let mut words = text.split_whitespace();
    let head: Vec<&str> = words.by_ref().take(max_words).collect();
    if words.next().is_none() {
        return text.to_string();
    }
    format!("{}{TRUNCATION_MARKER}", head.join(" "))
}
