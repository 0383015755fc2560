//! Player-side bookkeeping: lifecycle of the loaded video, when to push
//! progress to the backend, and what the keyboard does.

use std::time::Duration;

use crate::model::{Video, VideoId};

/// Minimum playback advance between two routine progress writes.
pub const FLUSH_INTERVAL_SECS: f64 = 15.0;
pub const SEEK_STEP_SECS: f64 = 5.0;
pub const AUTOPLAY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
}

/// Decides which `timeupdate` notifications turn into backend writes.
///
/// The media element fires these at an unspecified sub-second rate, so the
/// policy only looks at positions, never at call counts.
#[derive(Clone, Debug, PartialEq)]
pub struct FlushThrottle {
    anchor: f64,
    last_flushed: Option<f64>,
}

impl FlushThrottle {
    pub fn new(start: f64) -> Self {
        Self { anchor: start.max(0.0), last_flushed: None }
    }

    /// Forces the baseline, used after writes that bypass `observe`.
    pub fn mark(&mut self, position: f64) {
        self.last_flushed = Some(position);
    }

    pub fn observe(&mut self, current: f64, duration: f64) -> bool {
        let baseline = self.last_flushed.unwrap_or(self.anchor);
        let at_start = current <= 0.0;
        let at_end = duration > 0.0 && current >= duration;
        // A boundary is written once on arrival, not on every tick spent there.
        let parked = match self.last_flushed {
            Some(last) => (at_start && last <= 0.0) || (at_end && last >= duration),
            None => false,
        };
        let due = current - baseline >= FLUSH_INTERVAL_SECS || current < baseline || at_start || at_end;
        if due && !parked {
            self.last_flushed = Some(current);
            true
        } else {
            false
        }
    }
}

/// A progress write the caller should send to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressFlush {
    pub video_id: VideoId,
    pub seconds: u32,
}

impl ProgressFlush {
    fn at(video_id: VideoId, position: f64) -> Self {
        Self { video_id, seconds: position.max(0.0).round() as u32 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndAction {
    ShowOverlay,
    /// Show the overlay and advance after `AUTOPLAY_DELAY`.
    AdvanceAfterDelay,
    /// Move to the next video right away.
    AdvanceNow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartPosition {
    pub seconds: f64,
    pub ended: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    video_id: VideoId,
    stored_progress: u32,
    expected_duration: u32,
    duration: f64,
    position: f64,
    phase: PlaybackPhase,
    completed_on_load: bool,
    throttle: FlushThrottle,
}

impl Playback {
    pub fn load(video: &Video) -> Self {
        let duration = video.duration_secs();
        Self {
            video_id: video.id,
            stored_progress: video.progress,
            expected_duration: duration,
            duration: duration as f64,
            position: video.progress as f64,
            phase: PlaybackPhase::Loading,
            completed_on_load: duration > 0 && video.progress >= duration,
            throttle: FlushThrottle::new(video.progress as f64),
        }
    }

    pub fn video_id(&self) -> VideoId {
        self.video_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn overlay_visible(&self) -> bool {
        self.phase == PlaybackPhase::Ended
    }

    /// The media element knows the real length now. Returns where to seek.
    pub fn metadata_loaded(&mut self, media_duration: f64) -> StartPosition {
        if media_duration.is_finite() && media_duration > 0.0 {
            self.duration = media_duration;
        } else {
            self.duration = self.expected_duration as f64;
        }
        let start = (self.stored_progress as f64).min(self.duration);
        self.position = start;
        self.throttle = FlushThrottle::new(start);
        let ended = self.completed_on_load || (self.duration > 0.0 && start >= self.duration.round());
        if ended {
            self.completed_on_load = true;
            self.phase = PlaybackPhase::Ended;
        } else {
            self.phase = PlaybackPhase::Ready;
        }
        StartPosition { seconds: start, ended }
    }

    pub fn playing(&mut self) {
        if self.phase != PlaybackPhase::Loading {
            self.phase = PlaybackPhase::Playing;
        }
    }

    pub fn paused(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.phase = PlaybackPhase::Paused;
        }
    }

    pub fn time_update(&mut self, current: f64) -> Option<ProgressFlush> {
        if self.phase == PlaybackPhase::Loading || !current.is_finite() {
            return None;
        }
        self.position = current;
        self.throttle
            .observe(current, self.duration)
            .then(|| ProgressFlush::at(self.video_id, current))
    }

    pub fn ended(&mut self, autoplay: bool, has_next: bool) -> EndAction {
        self.phase = PlaybackPhase::Ended;
        if autoplay && has_next && !self.completed_on_load {
            EndAction::AdvanceAfterDelay
        } else {
            EndAction::ShowOverlay
        }
    }

    /// Forces progress to the full length. The user asked for it, so the
    /// next video follows immediately whatever the autoplay setting.
    pub fn mark_complete(&mut self, has_next: bool) -> (ProgressFlush, EndAction) {
        self.position = self.duration;
        self.phase = PlaybackPhase::Ended;
        self.throttle.mark(self.duration);
        let action = if has_next { EndAction::AdvanceNow } else { EndAction::ShowOverlay };
        (ProgressFlush::at(self.video_id, self.duration), action)
    }

    pub fn restart(&mut self) -> ProgressFlush {
        self.position = 0.0;
        self.completed_on_load = false;
        self.phase = PlaybackPhase::Playing;
        self.throttle.mark(0.0);
        ProgressFlush::at(self.video_id, 0.0)
    }

    /// Target position for a relative seek, clamped to the media bounds.
    pub fn seek_by(&self, delta: f64) -> f64 {
        (self.position + delta).clamp(0.0, self.duration.max(0.0))
    }

    pub fn can_toggle(&self) -> bool {
        self.phase != PlaybackPhase::Loading && self.position < self.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    SeekBy(f64),
    FocusNotes,
    BlurNotes,
}

/// Maps a `KeyboardEvent.key` to a player action. While the note editor has
/// focus only Escape gets through.
pub fn key_action(key: &str, editor_focused: bool) -> Option<KeyAction> {
    let key = key.to_lowercase();
    if editor_focused && key != "escape" {
        return None;
    }
    match key.as_str() {
        " " => Some(KeyAction::TogglePlay),
        "arrowright" => Some(KeyAction::SeekBy(SEEK_STEP_SECS)),
        "arrowleft" => Some(KeyAction::SeekBy(-SEEK_STEP_SECS)),
        "m" => Some(KeyAction::FocusNotes),
        "escape" => Some(KeyAction::BlurNotes),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::video;

    fn ready(progress: u32) -> Playback {
        let mut p = Playback::load(&video(9, "lesson.mp4", "10:00", progress));
        p.metadata_loaded(600.0);
        p.playing();
        p
    }

    #[test]
    fn flush_timeline() {
        let mut p = ready(0);
        let mut flushed = Vec::new();
        let timeline = [0.0, 0.0, 0.3, 4.0, 14.9, 15.0, 15.5, 16.0, 2.0, 2.4, 10.0, 17.0, 599.0, 600.0, 600.0];
        for t in timeline {
            if let Some(f) = p.time_update(t) {
                flushed.push(f.seconds);
            }
        }
        assert_eq!(flushed, vec![0, 15, 2, 17, 599, 600]);
    }

    #[test]
    fn throttle_is_independent_of_callback_rate() {
        let mut sparse = FlushThrottle::new(0.0);
        let mut dense = FlushThrottle::new(0.0);
        let sparse_hits: Vec<f64> = [1.0, 16.0, 31.0].into_iter().filter(|t| sparse.observe(*t, 600.0)).collect();
        let dense_hits: Vec<f64> = (1..=310)
            .map(|i| i as f64 * 0.1)
            .filter(|t| dense.observe(*t, 600.0))
            .collect();
        assert_eq!(sparse_hits, vec![16.0, 31.0]);
        assert_eq!(dense_hits.len(), 2);
    }

    #[test]
    fn updates_before_metadata_are_ignored() {
        let mut p = Playback::load(&video(1, "a", "10:00", 300));
        assert_eq!(p.time_update(0.0), None);
        let start = p.metadata_loaded(600.0);
        assert_eq!(start, StartPosition { seconds: 300.0, ended: false });
        assert_eq!(p.time_update(300.2), None);
    }

    #[test]
    fn completed_video_loads_straight_into_ended() {
        let mut p = Playback::load(&video(1, "a", "10:00", 600));
        let start = p.metadata_loaded(600.2);
        assert!(start.ended);
        assert!(p.overlay_visible());
        assert_eq!(p.ended(true, true), EndAction::ShowOverlay);
    }

    #[test]
    fn autoplay_only_chains_fresh_views() {
        let mut p = ready(0);
        assert_eq!(p.ended(true, true), EndAction::AdvanceAfterDelay);
        let mut p = ready(0);
        assert_eq!(p.ended(false, true), EndAction::ShowOverlay);
        let mut p = ready(0);
        assert_eq!(p.ended(true, false), EndAction::ShowOverlay);
    }

    #[test]
    fn restart_and_mark_complete() {
        let mut p = ready(120);
        let (done, action) = p.mark_complete(false);
        assert_eq!(done, ProgressFlush { video_id: 9, seconds: 600 });
        assert_eq!(action, EndAction::ShowOverlay);
        assert!(p.overlay_visible());
        assert_eq!(p.time_update(600.0), None);

        let again = p.restart();
        assert_eq!(again.seconds, 0);
        assert!(!p.overlay_visible());
        assert!(p.can_toggle());
        assert_eq!(p.time_update(0.0), None);
        assert!(p.time_update(15.0).is_some());
    }

    #[test]
    fn mark_complete_moves_on_without_autoplay() {
        let mut p = ready(120);
        let (done, action) = p.mark_complete(true);
        assert_eq!(done, ProgressFlush { video_id: 9, seconds: 600 });
        assert_eq!(action, EndAction::AdvanceNow);

        let mut last = ready(120);
        assert_eq!(last.mark_complete(false).1, EndAction::ShowOverlay);
    }

    #[test]
    fn seeking_is_clamped() {
        let mut p = ready(2);
        p.time_update(2.0);
        assert_eq!(p.seek_by(-SEEK_STEP_SECS), 0.0);
        p.time_update(598.0);
        assert_eq!(p.seek_by(SEEK_STEP_SECS), 600.0);
    }

    #[test]
    fn keys_respect_editor_focus() {
        assert_eq!(key_action(" ", false), Some(KeyAction::TogglePlay));
        assert_eq!(key_action("ArrowLeft", false), Some(KeyAction::SeekBy(-5.0)));
        assert_eq!(key_action("M", false), Some(KeyAction::FocusNotes));
        assert_eq!(key_action(" ", true), None);
        assert_eq!(key_action("m", true), None);
        assert_eq!(key_action("Escape", true), Some(KeyAction::BlurNotes));
        assert_eq!(key_action("q", false), None);
    }
}
