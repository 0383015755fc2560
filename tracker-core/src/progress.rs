//! Completion bookkeeping for videos and folders.

use std::collections::HashMap;

use crate::model::{Folder, Video, VideoId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoStatus {
    New,
    InProgress,
    Complete,
}

impl VideoStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            VideoStatus::New => "status-new",
            VideoStatus::InProgress => "status-progress",
            VideoStatus::Complete => "status-complete",
        }
    }
}

pub fn completion_percentage(progress: u32, duration_secs: u32) -> f64 {
    if duration_secs == 0 {
        return if progress > 0 { 100.0 } else { 0.0 };
    }
    (progress as f64 / duration_secs as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn status(progress: u32, duration_secs: u32) -> VideoStatus {
    if progress >= duration_secs && progress > 0 {
        VideoStatus::Complete
    } else if progress == 0 {
        // A zero-length video with no progress is still "new".
        VideoStatus::New
    } else {
        VideoStatus::InProgress
    }
}

/// Progress reported by the player during this page session, ahead of the
/// server's copy. Last write wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressOverrides {
    by_video: HashMap<VideoId, u32>,
}

impl ProgressOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, video_id: VideoId, progress: u32) {
        self.by_video.insert(video_id, progress);
    }

    pub fn get(&self, video_id: VideoId) -> Option<u32> {
        self.by_video.get(&video_id).copied()
    }

    pub fn effective(&self, video: &Video) -> u32 {
        self.get(video.id).unwrap_or(video.progress)
    }

    pub fn status_of(&self, video: &Video) -> VideoStatus {
        status(self.effective(video), video.duration_secs())
    }

    /// Returns a copy of `video` carrying the freshest known progress.
    pub fn apply(&self, video: &Video) -> Video {
        let mut v = video.clone();
        v.progress = self.effective(video);
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FolderStats {
    pub number_of_videos: usize,
    pub started_videos: usize,
    pub completed_videos: usize,
    /// Share of videos that have been started, rounded to a whole percent.
    pub completion_percentage: u32,
}

impl FolderStats {
    pub fn status(&self) -> VideoStatus {
        if self.started_videos == 0 {
            VideoStatus::New
        } else if self.number_of_videos > 0 && self.completed_videos == self.number_of_videos {
            VideoStatus::Complete
        } else {
            VideoStatus::InProgress
        }
    }
}

pub fn folder_stats(folder: &Folder, overrides: &ProgressOverrides) -> FolderStats {
    let mut number_of_videos = 0;
    let mut started_videos = 0;
    let mut completed_videos = 0;
    for video in folder.videos() {
        number_of_videos += 1;
        match overrides.status_of(video) {
            VideoStatus::New => {}
            VideoStatus::InProgress => started_videos += 1,
            VideoStatus::Complete => {
                started_videos += 1;
                completed_videos += 1;
            }
        }
    }
    let completion_percentage = if number_of_videos == 0 {
        0
    } else {
        (started_videos as f64 / number_of_videos as f64 * 100.0).round() as u32
    };
    FolderStats { number_of_videos, started_videos, completed_videos, completion_percentage }
}

pub fn remaining_seconds(video: &Video) -> u32 {
    video.duration_secs().saturating_sub(video.progress)
}

pub fn format_remaining(secs: u32) -> String {
    if secs < 60 {
        format!("{} secs left", secs)
    } else {
        format!("{:.1} mins left", secs as f64 / 60.0)
    }
}

/// Gradient used for a progress bar at the given percentage.
pub fn bar_gradient(percentage: f64) -> Option<&'static str> {
    if percentage >= 100.0 {
        Some("linear-gradient(to right, #4caf50, #81c784)")
    } else if percentage > 0.0 {
        Some("linear-gradient(to right, #f97316, #ec4899)")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::parse_duration;
    use crate::model::fixtures::{folder, section, video};

    #[test]
    fn percentage_stays_in_range_and_is_monotonic() {
        for d in ["5:00", "1:05:00"] {
            let secs = parse_duration(d).unwrap();
            let mut previous = -1.0;
            for p in 0..=secs {
                let pct = completion_percentage(p, secs);
                assert!((0.0..=100.0).contains(&pct));
                assert!(pct >= previous);
                previous = pct;
            }
        }
    }

    #[test]
    fn half_way_through_ten_minutes() {
        assert_eq!(completion_percentage(300, parse_duration("10:00").unwrap()), 50.0);
    }

    #[test]
    fn full_hour_is_complete() {
        let secs = parse_duration("1:00:00").unwrap();
        assert_eq!(status(3600, secs), VideoStatus::Complete);
        assert_eq!(completion_percentage(3600, secs), 100.0);
        assert_eq!(completion_percentage(9000, secs), 100.0);
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(status(0, 600), VideoStatus::New);
        assert_eq!(status(1, 600), VideoStatus::InProgress);
        assert_eq!(status(599, 600), VideoStatus::InProgress);
        assert_eq!(status(600, 600), VideoStatus::Complete);
        assert_eq!(status(0, 0), VideoStatus::New);
    }

    #[test]
    fn overrides_win_over_server_progress() {
        let v = video(1, "a.mp4", "10:00", 0);
        let mut overrides = ProgressOverrides::new();
        assert_eq!(overrides.status_of(&v), VideoStatus::New);
        overrides.record(1, 120);
        overrides.record(1, 600);
        assert_eq!(overrides.effective(&v), 600);
        assert_eq!(overrides.status_of(&v), VideoStatus::Complete);
        assert_eq!(overrides.apply(&v).progress, 600);
    }

    #[test]
    fn folder_stats_count_started_videos() {
        let mut f = folder(1, "course", &[]);
        f.subfolders = vec![
            section(10, "1. a", vec![video(1, "a", "1:00", 60), video(2, "b", "1:00", 5)]),
            section(11, "2. b", vec![video(3, "c", "1:00", 0), video(4, "d", "1:00", 0)]),
        ];
        let stats = folder_stats(&f, &ProgressOverrides::new());
        assert_eq!(stats.number_of_videos, 4);
        assert_eq!(stats.started_videos, 2);
        assert_eq!(stats.completed_videos, 1);
        assert_eq!(stats.completion_percentage, 50);
        assert_eq!(stats.status(), VideoStatus::InProgress);

        let empty = folder(2, "empty", &[]);
        let stats = folder_stats(&empty, &ProgressOverrides::new());
        assert_eq!(stats.completion_percentage, 0);
        assert_eq!(stats.status(), VideoStatus::New);
    }

    #[test]
    fn remaining_time_labels() {
        let v = video(1, "a", "10:00", 570);
        assert_eq!(remaining_seconds(&v), 30);
        assert_eq!(format_remaining(30), "30 secs left");
        assert_eq!(format_remaining(750), "12.5 mins left");
        assert_eq!(remaining_seconds(&video(2, "b", "1:00", 90)), 0);
    }
}
