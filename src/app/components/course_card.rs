use leptos::prelude::*;
use tracker_core::collection::monogram;
use tracker_core::explorer::display_video_name;
use tracker_core::model::Folder;
use tracker_core::palette::ColorKey;
use tracker_core::progress::{
    bar_gradient, completion_percentage, folder_stats, format_remaining, remaining_seconds, VideoStatus,
};

use crate::app::state::use_app;

#[component]
fn ProgressBar(#[prop(into)] percentage: Signal<f64>) -> impl IntoView {
    let style = move || {
        let pct = percentage.get().clamp(0.0, 100.0);
        match bar_gradient(pct) {
            Some(gradient) => format!("width: {}%; background-image: {}", pct, gradient),
            None => format!("width: {}%", pct),
        }
    };
    view! {
        <div class="progress-track">
            <div class="progress-fill" style=style></div>
        </div>
    }
}

fn status_icon(status: VideoStatus) -> &'static str {
    match status {
        VideoStatus::New => "✨",
        VideoStatus::InProgress => "⏳",
        VideoStatus::Complete => "✅",
    }
}

#[component]
pub fn CourseCard(folder: Folder) -> impl IntoView {
    let app = use_app();
    let href = format!("/folder/{}", folder.id);
    let stats = {
        let folder = folder.clone();
        Memo::new(move |_| app.progress.with(|p| folder_stats(&folder, p)))
    };
    let count_label = move || {
        let n = stats.get().number_of_videos;
        format!("{} {}", n, if n == 1 { "video" } else { "videos" })
    };

    view! {
        <a class="course-card" href=href>
            <div>
                <h3 class="course-name">{folder.name.clone()}</h3>
                <span class=move || format!("status-icon {}", stats.get().status().css_class())>
                    {move || status_icon(stats.get().status())}
                </span>
                <p class="course-path mono">"📁 " {folder.path.clone()}</p>
            </div>
            <div>
                <div class="course-meta">
                    <span>{count_label}</span>
                    <span>{move || format!("{}% completed", stats.get().completion_percentage)}</span>
                </div>
                <ProgressBar percentage=Signal::derive(move || stats.get().completion_percentage as f64)/>
            </div>
        </a>
    }
}

/// Compact card for the "continue watching" strip. Links straight to the
/// last played video.
#[component]
pub fn RecentCard(folder: Folder) -> impl IntoView {
    let app = use_app();
    let color = app.color(ColorKey::Folder(folder.id));
    let Some(last) = folder.last_played_video.clone() else {
        return ().into_any();
    };
    let href = format!("/folder/{}?videoIdToPlay={}", folder.id, last.id);
    let video = Memo::new(move |_| app.progress.with(|p| p.apply(&last)));
    let pct = Signal::derive(move || video.with(|v| completion_percentage(v.progress, v.duration_secs())));

    view! {
        <a class="recent-card" href=href>
            <div
                class="monogram"
                style=format!("background: {}; color: {}", color.background(), color.darker)
            >
                {monogram(&folder.name)}
            </div>
            <div class="recent-body">
                <div class="recent-title">{move || video.with(|v| display_video_name(&v.name))}</div>
                <div class="recent-meta">
                    <span class="recent-course">{folder.name.clone()}</span>
                    <span class="recent-left">
                        "🏁 " {move || video.with(|v| format_remaining(remaining_seconds(v)))}
                    </span>
                </div>
                <ProgressBar percentage=pct/>
            </div>
        </a>
    }
    .into_any()
}
