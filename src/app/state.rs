use leptos::prelude::*;
use log::{debug, error};
use tracker_core::filter::TagFilter;
use tracker_core::model::{Tag, VideoId};
use tracker_core::palette::{ColorAssigner, ColorKey, ColorPair, PALETTE};
use tracker_core::progress::ProgressOverrides;
use tracker_core::PrefsError;

use crate::app::storage::preferences;
use crate::app::utils::JsRandom;

/// Page-wide state shared by the home page, the course page and the header.
///
/// Built once from local storage when the app starts; every mutation goes
/// through the methods below so storage stays in step.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub roots: RwSignal<Vec<String>>,
    pub tag_filter: RwSignal<TagFilter>,
    pub autoplay: RwSignal<bool>,
    pub progress: RwSignal<ProgressOverrides>,
    colors: StoredValue<ColorAssigner>,
}

impl AppContext {
    pub fn init() -> Self {
        let prefs = preferences();
        let roots = prefs.root_folders();
        let tag_filter = prefs.tag_filter();
        debug!("restored {} root folders, {} filter tags", roots.len(), tag_filter.tags().len());
        Self {
            roots: RwSignal::new(roots),
            tag_filter: RwSignal::new(tag_filter),
            autoplay: RwSignal::new(prefs.autoplay()),
            progress: RwSignal::new(ProgressOverrides::new()),
            colors: StoredValue::new(ColorAssigner::new()),
        }
    }

    pub fn add_root(&self, path: &str) -> Result<(), PrefsError> {
        let roots = preferences().add_root(path)?;
        self.roots.set(roots);
        Ok(())
    }

    pub fn remove_root(&self, path: &str) -> Result<(), PrefsError> {
        let roots = preferences().remove_root(path)?;
        self.roots.set(roots);
        Ok(())
    }

    pub fn toggle_filter_tag(&self, tag: &Tag) {
        self.tag_filter.update(|f| {
            f.toggle(tag);
        });
        self.persist_filter();
    }

    pub fn clear_filter(&self) {
        self.tag_filter.update(|f| f.clear());
        self.persist_filter();
    }

    fn persist_filter(&self) {
        let filter = self.tag_filter.get_untracked();
        if let Err(e) = preferences().save_tag_filter(&filter) {
            error!("could not save tag filter: {}", e);
        }
    }

    pub fn set_autoplay(&self, enabled: bool) {
        self.autoplay.set(enabled);
        if let Err(e) = preferences().set_autoplay(enabled) {
            error!("could not save autoplay preference: {}", e);
        }
    }

    pub fn record_progress(&self, video_id: VideoId, seconds: u32) {
        self.progress.update(|p| p.record(video_id, seconds));
    }

    pub fn color(&self, key: ColorKey) -> ColorPair {
        self.colors
            .try_update_value(|c| c.color_for(key, &mut JsRandom))
            .unwrap_or(PALETTE[0])
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
