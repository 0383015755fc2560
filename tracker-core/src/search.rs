//! Search-as-you-type bookkeeping. The UI issues three lookups per query and
//! feeds results back here; anything answering an older query is ignored.

use std::time::Duration;

use crate::model::{Folder, FolderId, Tag, Video, VideoId};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const RESULT_LIMIT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Lookup<T> {
    pub loading: bool,
    pub items: Vec<T>,
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self { loading: false, items: Vec::new() }
    }
}

impl<T> Lookup<T> {
    fn start(&mut self) {
        self.loading = true;
    }

    fn finish(&mut self, items: Vec<T>, limit: Option<usize>) {
        self.loading = false;
        self.items = items;
        if let Some(limit) = limit {
            self.items.truncate(limit);
        }
    }

    fn fail(&mut self) {
        self.loading = false;
    }
}

/// Ticket identifying which query a response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    query: String,
    generation: u64,
    pub tags: Lookup<Tag>,
    pub folders: Lookup<Folder>,
    pub videos: Lookup<Video>,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Records a settled query. Returns a ticket when lookups should be
    /// issued, `None` when the query is blank and everything was cleared.
    pub fn begin(&mut self, query: &str) -> Option<Generation> {
        self.generation += 1;
        self.query = query.trim().to_string();
        if self.query.is_empty() {
            self.tags = Lookup::default();
            self.folders = Lookup::default();
            self.videos = Lookup::default();
            return None;
        }
        self.tags.start();
        self.folders.start();
        self.videos.start();
        Some(Generation(self.generation))
    }

    /// Forgets the query and invalidates every in-flight lookup.
    pub fn reset(&mut self) {
        self.begin("");
    }

    fn current(&self, ticket: Generation) -> bool {
        ticket.0 == self.generation
    }

    pub fn tags_done(&mut self, ticket: Generation, result: Option<Vec<Tag>>) -> bool {
        if !self.current(ticket) {
            return false;
        }
        match result {
            Some(items) => self.tags.finish(items, None),
            None => self.tags.fail(),
        }
        true
    }

    pub fn folders_done(&mut self, ticket: Generation, result: Option<Vec<Folder>>) -> bool {
        if !self.current(ticket) {
            return false;
        }
        match result {
            Some(items) => self.folders.finish(items, Some(RESULT_LIMIT)),
            None => self.folders.fail(),
        }
        true
    }

    pub fn videos_done(&mut self, ticket: Generation, result: Option<Vec<Video>>) -> bool {
        if !self.current(ticket) {
            return false;
        }
        match result {
            Some(items) => self.videos.finish(items, Some(RESULT_LIMIT)),
            None => self.videos.fail(),
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Splits `text` around case-insensitive occurrences of `query`.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return vec![Segment { text: text.to_string(), matched: false }];
    }
    // Work on char indices so non-ASCII case folding cannot split a code point.
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<String> = chars.iter().map(|c| c.to_lowercase().collect()).collect();
    let needle_chars: Vec<String> = needle.chars().map(|c| c.to_string()).collect();
    let n = needle_chars.len();

    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut i = 0;
    while i < chars.len() {
        if i + n <= chars.len() && lowered[i..i + n] == needle_chars[..] {
            if !plain.is_empty() {
                segments.push(Segment { text: std::mem::take(&mut plain), matched: false });
            }
            segments.push(Segment { text: chars[i..i + n].iter().collect(), matched: true });
            i += n;
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }
    if !plain.is_empty() {
        segments.push(Segment { text: plain, matched: false });
    }
    segments
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchTarget {
    Folder(FolderId),
    Video { folder_id: FolderId, video_id: VideoId },
}

impl SearchTarget {
    pub fn for_video(video: &Video) -> Option<Self> {
        video.folder_id.map(|folder_id| SearchTarget::Video { folder_id, video_id: video.id })
    }

    pub fn route(&self) -> String {
        match self {
            SearchTarget::Folder(id) => format!("/folder/{}", id),
            SearchTarget::Video { folder_id, video_id } => format!("/folder/{}?videoIdToPlay={}", folder_id, video_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{folder, video};

    #[test]
    fn blank_query_clears_without_lookups() {
        let mut state = SearchState::default();
        assert!(state.begin("   ").is_none());
        assert!(!state.is_active());
        assert!(!state.tags.loading);
    }

    #[test]
    fn lookups_resolve_independently_and_are_capped() {
        let mut state = SearchState::default();
        let ticket = state.begin("rust").unwrap();
        assert!(state.tags.loading && state.folders.loading && state.videos.loading);

        let many: Vec<Folder> = (1..=5).map(|i| folder(i, "rust", &[])).collect();
        assert!(state.folders_done(ticket, Some(many)));
        assert_eq!(state.folders.items.len(), RESULT_LIMIT);
        assert!(!state.folders.loading);
        assert!(state.tags.loading);

        assert!(state.videos_done(ticket, None));
        assert!(!state.videos.loading);
        assert!(state.videos.items.is_empty());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut state = SearchState::default();
        let old = state.begin("ru").unwrap();
        let new = state.begin("rust").unwrap();
        assert!(!state.videos_done(old, Some(vec![video(1, "old", "1:00", 0)])));
        assert!(state.videos.loading);
        assert!(state.videos_done(new, Some(vec![video(2, "new", "1:00", 0)])));
        assert_eq!(state.videos.items[0].id, 2);
        state.reset();
        assert!(!state.tags_done(new, Some(Vec::new())));
    }

    #[test]
    fn highlight_is_case_insensitive() {
        let segs = highlight("Learn Rust the rusty way", "rust");
        let marked: Vec<&str> = segs.iter().filter(|s| s.matched).map(|s| s.text.as_str()).collect();
        assert_eq!(marked, vec!["Rust", "rust"]);
        let joined: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "Learn Rust the rusty way");
        assert_eq!(highlight("a.b", ".").iter().filter(|s| s.matched).count(), 1);
        assert_eq!(highlight("abc", ""), vec![Segment { text: "abc".into(), matched: false }]);
    }

    #[test]
    fn routes() {
        assert_eq!(SearchTarget::Folder(4).route(), "/folder/4");
        let mut v = video(9, "a", "1:00", 0);
        assert!(SearchTarget::for_video(&v).is_none());
        v.folder_id = Some(4);
        assert_eq!(SearchTarget::for_video(&v).unwrap().route(), "/folder/4?videoIdToPlay=9");
    }
}
