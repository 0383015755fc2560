use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_use::{use_event_listener, use_window};
use log::{debug, error, warn};
use tracker_core::explorer::display_video_name;
use tracker_core::model::Video;
use tracker_core::playback::{key_action, EndAction, KeyAction, Playback, ProgressFlush, AUTOPLAY_DELAY};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::app::api::use_api;
use crate::app::components::notes::{blur_note_editor, focus_note_editor, note_editor_focused, NotesPanel};
use crate::app::state::use_app;
use crate::app::utils::{typing_in_field, MountGuard};

fn start(el: &HtmlVideoElement) {
    match el.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!("playback did not start: {:?}", e);
            }
        }),
        Err(e) => warn!("play() threw: {:?}", e),
    }
}

/// One mounted player per selected video. `autostart` is set when the user
/// (or autoplay) picked the video explicitly.
#[component]
pub fn VideoPlayer(
    video: Video,
    autostart: bool,
    #[prop(into)] prev: Signal<Option<Video>>,
    #[prop(into)] next: Signal<Option<Video>>,
    on_select: Callback<Video>,
) -> impl IntoView {
    let api = use_api();
    let app = use_app();
    let mounted = MountGuard::new();
    let video_ref = NodeRef::<html::Video>::new();
    let playback = RwSignal::new(Playback::load(&video));
    let (loading, set_loading) = signal(true);
    let overlay = Memo::new(move |_| playback.with(|p| p.overlay_visible()));
    let src = api.video_source(&video.path);
    let video_id = video.id;

    let flush = move |write: ProgressFlush| {
        app.record_progress(write.video_id, write.seconds);
        let api = api.clone();
        spawn_local(async move {
            if let Err(e) = api.update_progress(write.video_id, write.seconds).await {
                error!("saving progress of video {} failed: {}", write.video_id, e);
            }
        });
    };

    let on_metadata = move |_: ev::Event| {
        let Some(el) = video_ref.get_untracked() else { return };
        let Some(pos) = playback.try_update(|p| p.metadata_loaded(el.duration())) else {
            return;
        };
        debug!("video {} resumes at {}s", video_id, pos.seconds);
        el.set_current_time(pos.seconds);
        if autostart && !pos.ended {
            start(&el);
        } else {
            let _ = el.pause();
        }
    };

    let on_time = {
        let flush = flush.clone();
        move |_: ev::Event| {
            let Some(el) = video_ref.get_untracked() else { return };
            if let Some(write) = playback.try_update(|p| p.time_update(el.current_time())).flatten() {
                flush(write);
            }
        }
    };

    let on_ended = move |_: ev::Event| {
        let autoplay = app.autoplay.get_untracked();
        let upcoming = next.get_untracked();
        let action = playback.try_update(|p| p.ended(autoplay, upcoming.is_some()));
        if let (Some(EndAction::AdvanceAfterDelay), Some(upcoming)) = (action, upcoming) {
            let mounted = mounted.clone();
            set_timeout(
                move || {
                    if mounted.alive() {
                        on_select.run(upcoming);
                    }
                },
                AUTOPLAY_DELAY,
            );
        }
    };

    let restart = {
        let flush = flush.clone();
        move |_: ev::MouseEvent| {
            let Some(el) = video_ref.get_untracked() else { return };
            if let Some(write) = playback.try_update(|p| p.restart()) {
                el.set_current_time(0.0);
                start(&el);
                flush(write);
            }
        }
    };

    let mark_complete = move |_: ev::MouseEvent| {
        let Some(el) = video_ref.get_untracked() else { return };
        let upcoming = next.get_untracked();
        if let Some((write, action)) = playback.try_update(|p| p.mark_complete(upcoming.is_some())) {
            let _ = el.pause();
            el.set_current_time(playback.with_untracked(|p| p.duration()));
            flush(write);
            if let (EndAction::AdvanceNow, Some(upcoming)) = (action, upcoming) {
                on_select.run(upcoming);
            }
        }
    };

    let _ = use_event_listener(use_window(), ev::keydown, move |e: web_sys::KeyboardEvent| {
        if e.ctrl_key() || e.meta_key() || e.alt_key() {
            return;
        }
        let editor_focused = note_editor_focused();
        if !editor_focused && typing_in_field() {
            return;
        }
        let Some(action) = key_action(&e.key(), editor_focused) else { return };
        let Some(el) = video_ref.get_untracked() else { return };
        match action {
            KeyAction::TogglePlay => {
                e.prevent_default();
                if playback.with_untracked(|p| p.can_toggle()) {
                    if el.paused() {
                        start(&el);
                    } else {
                        let _ = el.pause();
                    }
                }
            }
            KeyAction::SeekBy(delta) => {
                e.prevent_default();
                el.set_current_time(playback.with_untracked(|p| p.seek_by(delta)));
            }
            KeyAction::FocusNotes => {
                e.prevent_default();
                focus_note_editor();
            }
            KeyAction::BlurNotes => blur_note_editor(),
        }
    });

    let nav_button = move |target: Signal<Option<Video>>, class: &'static str| {
        move || {
            target.get().map(|v| {
                let label = display_video_name(&v.name);
                view! {
                    <button class=class on:click=move |_| on_select.run(v.clone())>
                        <span class="nav-arrow">{if class == "nav-prev" { "◀" } else { "▶" }}</span>
                        <span class="nav-label">{label}</span>
                    </button>
                }
            })
        }
    };

    view! {
        <div class="player">
            <Show when=move || loading.get()>
                <div class="loading-bar"></div>
            </Show>
            <div class="player-frame">
                <video
                    node_ref=video_ref
                    src=src
                    controls=true
                    preload="metadata"
                    on:loadedmetadata=on_metadata
                    on:timeupdate=on_time
                    on:canplay=move |_| set_loading.set(false)
                    on:play=move |_| playback.update(|p| p.playing())
                    on:pause=move |_| playback.update(|p| p.paused())
                    on:ended=on_ended
                ></video>
                <Show when=move || overlay.get()>
                    <div class="player-overlay">
                        <button class="restart-btn" title="Watch again" on:click=restart.clone()>"↻"</button>
                    </div>
                </Show>
            </div>
            <div class="player-controls">
                <div class="nav-slot">{nav_button(prev, "nav-prev")}</div>
                <div class="player-toggles">
                    <label class="autoplay-toggle">
                        <input
                            type="checkbox"
                            prop:checked=move || app.autoplay.get()
                            on:change=move |ev| app.set_autoplay(event_target_checked(&ev))
                        />
                        "Autoplay"
                    </label>
                    <button class="btn-ghost" on:click=mark_complete disabled=move || overlay.get()>
                        "Mark complete"
                    </button>
                </div>
                <div class="nav-slot right">{nav_button(next, "nav-next")}</div>
            </div>
            <NotesPanel video_id=video_id/>
        </div>
    }
}
