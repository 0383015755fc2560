use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Subfolder, Video, VideoId};
use crate::progress::{ProgressOverrides, VideoStatus};

fn by_name(a: &Video, b: &Video) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sorted_videos(section: &Subfolder) -> Vec<Video> {
    let mut videos = section.videos.clone();
    videos.sort_by(by_name);
    videos
}

/// Every video of the course in the order the explorer lists them.
pub fn playlist(contents: &[Subfolder]) -> Vec<Video> {
    contents.iter().flat_map(sorted_videos).collect()
}

pub fn find_video(contents: &[Subfolder], video_id: VideoId) -> Option<Video> {
    contents.iter().flat_map(|s| s.videos.iter()).find(|v| v.id == video_id).cloned()
}

/// Picks the video to open when a course is shown: the explicitly requested
/// one if it exists, otherwise the first not yet complete, otherwise the
/// very first.
pub fn initial_selection(
    contents: &[Subfolder],
    overrides: &ProgressOverrides,
    requested: Option<VideoId>,
) -> Option<Video> {
    if let Some(found) = requested.and_then(|id| find_video(contents, id)) {
        return Some(overrides.apply(&found));
    }
    let ordered = playlist(contents);
    ordered
        .iter()
        .find(|v| overrides.status_of(v) != VideoStatus::Complete)
        .or_else(|| ordered.first())
        .map(|v| overrides.apply(v))
}

pub fn neighbours(list: &[Video], current: VideoId) -> (Option<Video>, Option<Video>) {
    match list.iter().position(|v| v.id == current) {
        Some(i) => {
            let prev = if i > 0 { list.get(i - 1).cloned() } else { None };
            (prev, list.get(i + 1).cloned())
        }
        None => (None, None),
    }
}

pub fn display_video_name(name: &str) -> String {
    static EXT: OnceLock<Regex> = OnceLock::new();
    let re = EXT.get_or_init(|| Regex::new(r"\.\w+$").expect("extension pattern"));
    re.replace(name, "").into_owned()
}

pub fn display_section_name(name: &str) -> String {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    let re = ORDINAL.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("ordinal pattern"));
    re.replace(name, "").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{section, video};

    fn course() -> Vec<Subfolder> {
        vec![
            section(1, "1. Basics", vec![video(12, "b.mp4", "1:00", 60), video(11, "A.mp4", "1:00", 60)]),
            section(2, "2. Advanced", vec![video(22, "d.mp4", "2:00", 30), video(21, "c.mp4", "2:00", 0)]),
        ]
    }

    #[test]
    fn videos_sort_by_name_within_a_section() {
        let names: Vec<String> = playlist(&course()).into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["A.mp4", "b.mp4", "c.mp4", "d.mp4"]);
    }

    #[test]
    fn selects_first_unwatched_in_folder_then_video_order() {
        let picked = initial_selection(&course(), &ProgressOverrides::new(), None).unwrap();
        assert_eq!(picked.id, 21);
    }

    #[test]
    fn falls_back_to_first_video_when_everything_is_watched() {
        let mut overrides = ProgressOverrides::new();
        overrides.record(21, 120);
        overrides.record(22, 120);
        let picked = initial_selection(&course(), &overrides, None).unwrap();
        assert_eq!(picked.id, 11);
        assert!(initial_selection(&[], &overrides, None).is_none());
    }

    #[test]
    fn requested_video_wins_when_present() {
        let picked = initial_selection(&course(), &ProgressOverrides::new(), Some(12)).unwrap();
        assert_eq!(picked.id, 12);
        let picked = initial_selection(&course(), &ProgressOverrides::new(), Some(999)).unwrap();
        assert_eq!(picked.id, 21);
    }

    #[test]
    fn selection_carries_override_progress() {
        let mut overrides = ProgressOverrides::new();
        overrides.record(21, 45);
        let picked = initial_selection(&course(), &overrides, None).unwrap();
        assert_eq!(picked.progress, 45);
    }

    #[test]
    fn neighbours_follow_explorer_order() {
        let list = playlist(&course());
        let (prev, next) = neighbours(&list, 12);
        assert_eq!(prev.map(|v| v.id), Some(11));
        assert_eq!(next.map(|v| v.id), Some(21));
        let (prev, next) = neighbours(&list, 11);
        assert!(prev.is_none());
        assert_eq!(next.map(|v| v.id), Some(12));
        assert_eq!(neighbours(&list, 22).1, None);
    }

    #[test]
    fn display_names() {
        assert_eq!(display_video_name("01 intro.mp4"), "01 intro");
        assert_eq!(display_video_name("no-extension"), "no-extension");
        assert_eq!(display_section_name("3. Error handling"), "ERROR HANDLING");
        assert_eq!(display_section_name("Appendix"), "APPENDIX");
    }
}
