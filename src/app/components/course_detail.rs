use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_params, use_query_map};
use leptos_router::params::Params;
use log::{error, info};
use tracker_core::explorer::{initial_selection, neighbours, playlist};
use tracker_core::model::{FolderId, Subfolder, Video, VideoId};

use crate::app::api::use_api;
use crate::app::components::library_explorer::LibraryExplorer;
use crate::app::components::video_player::VideoPlayer;
use crate::app::state::use_app;
use crate::app::utils::MountGuard;

#[derive(Params, PartialEq, Clone, Debug)]
struct CourseParams {
    id: Option<FolderId>,
}

#[derive(Clone, PartialEq)]
struct Selection {
    video: Video,
    autostart: bool,
}

/// `/folder/:id` with an optional `?videoIdToPlay=` request.
#[component]
pub fn CourseDetail() -> impl IntoView {
    let api = use_api();
    let app = use_app();
    let mounted = MountGuard::new();
    let params = use_params::<CourseParams>();
    let query = use_query_map();

    let folder_id = Memo::new(move |_| params.with(|p| p.as_ref().ok().and_then(|p| p.id)));
    let requested = Memo::new(move |_| {
        query.with(|q| q.get("videoIdToPlay").and_then(|v| v.parse::<VideoId>().ok()))
    });

    let contents = RwSignal::new(Vec::<Subfolder>::new());
    let (loaded, set_loaded) = signal(false);
    let selection = RwSignal::new(None::<Selection>);

    Effect::new(move |_| {
        let Some(id) = folder_id.get() else {
            error!("course route without a usable id");
            return;
        };
        contents.set(Vec::new());
        selection.set(None);
        set_loaded.set(false);
        let api = api.clone();
        let mounted = mounted.clone();
        spawn_local(async move {
            let result = api.subfolders(id).await;
            // A different course may have been opened meanwhile.
            if !mounted.alive() || folder_id.get_untracked() != Some(id) {
                return;
            }
            match result {
                Ok(sections) => {
                    info!("course {} has {} sections", id, sections.len());
                    contents.set(sections);
                }
                Err(e) => error!("loading course {} failed: {}", id, e),
            }
            set_loaded.set(true);
        });
    });

    Effect::new(move |_| {
        let wanted = requested.get();
        contents.with(|sections| {
            if sections.is_empty() {
                return;
            }
            let picked = app.progress.with_untracked(|p| initial_selection(sections, p, wanted));
            selection.set(picked.map(|video| Selection { video, autostart: wanted.is_some() }));
        });
    });

    let order = Memo::new(move |_| contents.with(|c| playlist(c)));
    let current_id = Memo::new(move |_| selection.with(|s| s.as_ref().map(|s| s.video.id)));
    let around = Memo::new(move |_| match current_id.get() {
        Some(id) => order.with(|list| neighbours(list, id)),
        None => (None, None),
    });

    let select = Callback::new(move |video: Video| {
        let video = app.progress.with_untracked(|p| p.apply(&video));
        selection.set(Some(Selection { video, autostart: true }));
    });

    view! {
        <div class="course-detail">
            <aside class="course-sidebar">
                <LibraryExplorer contents=contents active=current_id on_select=select/>
            </aside>
            <div class="course-main">
                {move || {
                    current_id.track();
                    match selection.get_untracked() {
                        Some(Selection { video, autostart }) => view! {
                            <VideoPlayer
                                video=video
                                autostart=autostart
                                prev=Signal::derive(move || around.get().0)
                                next=Signal::derive(move || around.get().1)
                                on_select=select
                            />
                        }
                        .into_any(),
                        None if loaded.get() => view! {
                            <p class="empty-hint">"This course has no videos."</p>
                        }
                        .into_any(),
                        None => view! { <div class="loading-bar"></div> }.into_any(),
                    }
                }}
            </div>
        </div>
    }
}
