use serde::{Deserialize, Serialize};

use crate::model::{Folder, Tag, TagId};

/// The user's tag include-list. Empty means "show everything".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct TagFilter {
    tags: Vec<Tag>,
}

impl From<Vec<Tag>> for TagFilter {
    fn from(tags: Vec<Tag>) -> Self {
        Self::new(tags)
    }
}

impl From<TagFilter> for Vec<Tag> {
    fn from(filter: TagFilter) -> Self {
        filter.tags
    }
}

impl TagFilter {
    pub fn new(tags: Vec<Tag>) -> Self {
        let mut filter = Self::default();
        for tag in tags {
            if !filter.contains(tag.id) {
                filter.tags.push(tag);
            }
        }
        filter
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Adds the tag if absent, removes it otherwise. Returns whether it is now active.
    pub fn toggle(&mut self, tag: &Tag) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| t.id == tag.id) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn matches(&self, folder: &Folder) -> bool {
        self.is_empty() || self.tags.iter().any(|t| folder.has_tag(t.id))
    }
}

/// Tags known to the backend that `folder` does not carry yet, compared by name.
pub fn unused_tags(all: &[Tag], folder: &Folder) -> Vec<Tag> {
    all.iter()
        .filter(|t| !folder.tags.iter().any(|own| own.name == t.name))
        .cloned()
        .collect()
}

/// Tag names are stored lower-cased and trimmed.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

pub fn add_tag_local(folder: &mut Folder, tag: Tag) {
    if !folder.tags.iter().any(|t| t.name == tag.name) {
        folder.tags.push(tag);
    }
}

pub fn remove_tag_local(folder: &mut Folder, name: &str) -> Option<Tag> {
    let pos = folder.tags.iter().position(|t| t.name == name)?;
    Some(folder.tags.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::folder;
    use std::collections::HashSet;

    fn tag(id: TagId, name: &str) -> Tag {
        Tag { id, name: name.to_string() }
    }

    #[test]
    fn empty_filter_shows_all_folders() {
        let folders = vec![folder(1, "a", &[(3, "rust")]), folder(2, "b", &[])];
        let filter = TagFilter::default();
        assert_eq!(folders.iter().filter(|f| filter.matches(f)).count(), 2);
    }

    #[test]
    fn filter_keeps_folders_sharing_a_tag() {
        let folders = vec![
            folder(1, "a", &[(3, "rust")]),
            folder(2, "b", &[(4, "go")]),
            folder(3, "c", &[(4, "go"), (3, "rust")]),
            folder(4, "d", &[]),
        ];
        let filter = TagFilter::new(vec![tag(3, "rust")]);
        let ids: Vec<u32> = folders.iter().filter(|f| filter.matches(f)).map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut filter = TagFilter::default();
        assert!(filter.toggle(&tag(3, "rust")));
        assert!(filter.contains(3));
        assert!(!filter.toggle(&tag(3, "rust")));
        assert!(filter.is_empty());
    }

    #[test]
    fn duplicates_are_dropped_on_construction() {
        let filter = TagFilter::new(vec![tag(1, "a"), tag(1, "a"), tag(2, "b")]);
        assert_eq!(filter.tags().len(), 2);
    }

    #[test]
    fn stored_duplicates_collapse_so_one_toggle_clears() {
        let raw = r#"[{"id":3,"name":"rust"},{"id":3,"name":"rust"}]"#;
        let mut filter: TagFilter = serde_json::from_str(raw).unwrap();
        assert_eq!(filter.tags().len(), 1);
        assert!(!filter.toggle(&tag(3, "rust")));
        assert!(!filter.contains(3));
    }

    #[test]
    fn add_then_remove_restores_tag_set() {
        let mut f = folder(1, "a", &[(3, "rust"), (5, "web")]);
        let before: HashSet<Tag> = f.tags.iter().cloned().collect();
        add_tag_local(&mut f, tag(9, "async"));
        assert_eq!(f.tags.len(), 3);
        let removed = remove_tag_local(&mut f, "async");
        assert_eq!(removed, Some(tag(9, "async")));
        let after: HashSet<Tag> = f.tags.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn unused_tags_compare_by_name() {
        let f = folder(1, "a", &[(3, "rust")]);
        let all = vec![tag(3, "rust"), tag(4, "go")];
        assert_eq!(unused_tags(&all, &f), vec![tag(4, "go")]);
        assert_eq!(normalize_tag_name("  Async "), Some("async".to_string()));
        assert_eq!(normalize_tag_name("   "), None);
    }
}
