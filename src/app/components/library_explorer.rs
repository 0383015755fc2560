use leptos::html;
use leptos::prelude::*;
use tracker_core::duration::format_clock;
use tracker_core::explorer::{display_section_name, display_video_name, sorted_videos};
use tracker_core::model::{Subfolder, Video, VideoId};
use tracker_core::progress::VideoStatus;

use crate::app::state::use_app;
use crate::app::utils::scroll_into_view;

fn status_icon(status: VideoStatus) -> &'static str {
    match status {
        VideoStatus::New => "✨",
        VideoStatus::InProgress => "◔",
        VideoStatus::Complete => "✔",
    }
}

#[component]
fn VideoRow(video: Video, active: Signal<Option<VideoId>>, on_select: Callback<Video>) -> impl IntoView {
    let app = use_app();
    let id = video.id;
    let row = NodeRef::<html::Li>::new();
    let is_active = move || active.get() == Some(id);
    let status = {
        let video = video.clone();
        Memo::new(move |_| app.progress.with(|p| p.status_of(&video)))
    };

    Effect::new(move |_| {
        if is_active() {
            if let Some(el) = row.get() {
                scroll_into_view(&el);
            }
        }
    });

    let name = display_video_name(&video.name);
    let duration = format_clock(video.duration_secs());
    let clicked = video;

    view! {
        <li
            node_ref=row
            class=move || format!("video-row {}", status.get().css_class())
            class:active=is_active
            class:watched=move || !is_active() && status.get() == VideoStatus::Complete
            on:click=move |_| on_select.run(clicked.clone())
        >
            <span class="video-icon">
                {move || if is_active() { "" } else { status_icon(status.get()) }}
            </span>
            <span class="video-name">{name}</span>
            <span class="video-duration">
                {move || if is_active() { "▶".to_string() } else { duration.clone() }}
            </span>
        </li>
    }
}

/// Course sections in backend order, each listing its videos by name.
#[component]
pub fn LibraryExplorer(
    #[prop(into)] contents: Signal<Vec<Subfolder>>,
    #[prop(into)] active: Signal<Option<VideoId>>,
    on_select: Callback<Video>,
) -> impl IntoView {
    view! {
        <nav class="library">
            <For
                each=move || contents.get()
                key=|section| section.id
                children=move |section| {
                    view! {
                        <div class="library-section">
                            <div class="section-name">{display_section_name(&section.name)}</div>
                            <hr/>
                            <ul>
                                {sorted_videos(&section)
                                    .into_iter()
                                    .map(|video| view! { <VideoRow video=video active=active on_select=on_select/> })
                                    .collect_view()}
                            </ul>
                        </div>
                    }
                }
            />
        </nav>
    }
}
