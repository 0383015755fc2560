//! The home page data pipeline: scans arrive per root folder, get merged,
//! then filtered and sorted for display.

use std::collections::HashSet;

use crate::filter::TagFilter;
use crate::model::{Folder, FolderId};

pub const RECENTS_LIMIT: usize = 4;

/// Folds a freshly scanned batch into what is already on screen. Later
/// arrivals replace earlier copies of the same folder.
pub fn merge_folders(existing: &[Folder], incoming: Vec<Folder>) -> Vec<Folder> {
    let mut merged: Vec<Folder> = existing.to_vec();
    for folder in incoming {
        match merged.iter_mut().find(|f| f.id == folder.id) {
            Some(slot) => *slot = folder,
            None => merged.push(folder),
        }
    }
    merged
}

/// Drops folders that no longer belong to a registered root.
pub fn retain_roots(folders: &[Folder], roots: &[String]) -> Vec<Folder> {
    folders
        .iter()
        .filter(|f| f.main_folder_path.is_empty() || roots.iter().any(|r| r == &f.main_folder_path))
        .cloned()
        .collect()
}

pub fn visible_collection(folders: &[Folder], filter: &TagFilter, missing: &HashSet<FolderId>) -> Vec<Folder> {
    let mut shown: Vec<Folder> = folders
        .iter()
        .filter(|f| !missing.contains(&f.id) && filter.matches(f))
        .cloned()
        .collect();
    shown.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
    shown
}

pub fn recents(folders: &[Folder], limit: usize) -> Vec<Folder> {
    let mut played: Vec<Folder> = folders
        .iter()
        .filter(|f| f.last_played_video.is_some())
        .cloned()
        .collect();
    played.sort_by(|a, b| b.last_played_at.cmp(&a.last_played_at));
    played.truncate(limit);
    played
}

pub fn last_path_segment(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Two-letter badge: initials of the first two words, or the first two
/// letters of a single word.
pub fn monogram(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        many => many
            .iter()
            .take(2)
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{folder, video};
    use crate::model::{parse_timestamp, Tag};

    #[test]
    fn merge_tolerates_out_of_order_completion() {
        let first = vec![folder(1, "a", &[]), folder(2, "b", &[])];
        let mut updated = folder(2, "b-renamed", &[]);
        updated.tags.push(Tag { id: 1, name: "x".into() });
        let second = vec![updated.clone(), folder(3, "c", &[])];

        let ab = merge_folders(&merge_folders(&[], first.clone()), second.clone());
        let ba = merge_folders(&merge_folders(&[], second), first);
        assert_eq!(ab.len(), 3);
        assert_eq!(ba.len(), 3);
        assert_eq!(ab.iter().find(|f| f.id == 2), Some(&updated));
    }

    #[test]
    fn visible_collection_sorts_and_filters() {
        let folders = vec![folder(1, "zeta", &[(3, "rust")]), folder(2, "Alpha", &[(3, "rust")]), folder(3, "beta", &[])];
        let mut missing = HashSet::new();
        let all = visible_collection(&folders, &TagFilter::default(), &missing);
        let names: Vec<&str> = all.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);

        missing.insert(1);
        let filter = TagFilter::new(vec![Tag { id: 3, name: "rust".into() }]);
        let shown = visible_collection(&folders, &filter, &missing);
        assert_eq!(shown.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn retain_roots_drops_unregistered_folders() {
        let mut other = folder(2, "b", &[]);
        other.main_folder_path = "/elsewhere".into();
        let kept = retain_roots(&[folder(1, "a", &[]), other], &["/courses".to_string()]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn recents_are_newest_first() {
        let mut a = folder(1, "a", &[]);
        a.last_played_video = Some(video(1, "x", "1:00", 5));
        a.last_played_at = parse_timestamp("2024-01-01T10:00:00");
        let mut b = folder(2, "b", &[]);
        b.last_played_video = Some(video(2, "y", "1:00", 5));
        b.last_played_at = parse_timestamp("2024-03-01T10:00:00");
        let never = folder(3, "c", &[]);
        let ids: Vec<u32> = recents(&[a, never, b], RECENTS_LIMIT).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn labels() {
        assert_eq!(last_path_segment("/home/me/Courses/"), "Courses");
        assert_eq!(last_path_segment("C:\\media\\talks"), "talks");
        assert_eq!(monogram("rust for beginners"), "RF");
        assert_eq!(monogram("kubernetes"), "KU");
        assert_eq!(monogram("  "), "");
    }
}
