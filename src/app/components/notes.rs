use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use tracker_core::model::{Note, VideoId};
use tracker_core::notes::{format_note_timestamp, prepare_note, sanitize_markup, sort_notes_newest_first};
use wasm_bindgen::JsCast;

use crate::app::api::use_api;
use crate::app::components::confirm_modal::ConfirmModal;
use crate::app::utils::{exec_format, format_active, scroll_into_view, MountGuard};

pub const NOTE_EDITOR_ID: &str = "note-editor";

fn editor_element() -> Option<web_sys::HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(NOTE_EDITOR_ID)?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()
}

pub fn note_editor_focused() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
        .map(|el| el.id() == NOTE_EDITOR_ID)
        .unwrap_or(false)
}

pub fn focus_note_editor() {
    if let Some(el) = editor_element() {
        let _ = el.focus();
    }
}

pub fn blur_note_editor() {
    if let Some(el) = editor_element() {
        let _ = el.blur();
    }
}

#[derive(Clone, Copy, Default, PartialEq)]
struct FormatState {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl FormatState {
    fn read() -> Self {
        Self {
            bold: format_active("bold"),
            italic: format_active("italic"),
            underline: format_active("underline"),
        }
    }
}

#[component]
fn NoteEditor(video_id: VideoId, on_saved: Callback<()>) -> impl IntoView {
    let api = use_api();
    let mounted = MountGuard::new();
    let editor = NodeRef::<html::Div>::new();
    let formats = RwSignal::new(FormatState::default());
    let (focused, set_focused) = signal(false);
    let (sending, set_sending) = signal(false);

    let refresh_formats = move || formats.set(FormatState::read());

    let send = move || {
        let Some(el) = editor.get_untracked() else { return };
        if sending.get_untracked() {
            return;
        }
        let Some(content) = prepare_note(&el.inner_html()) else {
            return;
        };
        set_sending.set(true);
        let api = api.clone();
        let mounted = mounted.clone();
        spawn_local(async move {
            let result = api.add_note(video_id, &content).await;
            if !mounted.alive() {
                return;
            }
            set_sending.set(false);
            match result {
                Ok(note) => {
                    info!("saved note {} for video {}", note.id, video_id);
                    el.set_inner_html("");
                    let _ = el.blur();
                    formats.set(FormatState::default());
                    on_saved.run(());
                }
                Err(e) => error!("saving note failed: {}", e),
            }
        });
    };

    let on_keydown = {
        let send = send.clone();
        move |e: ev::KeyboardEvent| {
            if e.ctrl_key() || e.meta_key() {
                let command = match e.key().to_lowercase().as_str() {
                    "b" => "bold",
                    "i" => "italic",
                    "u" => "underline",
                    _ => return,
                };
                e.prevent_default();
                exec_format(command);
                refresh_formats();
            } else if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                send();
            }
        }
    };

    let format_button = move |command: &'static str, label: &'static str, on: fn(&FormatState) -> bool| {
        view! {
            <button
                class=format!("format-btn format-{}", command)
                class:on=move || formats.with(on)
                on:mousedown=|e| e.prevent_default()
                on:click=move |_| {
                    exec_format(command);
                    refresh_formats();
                    if let Some(el) = editor.get_untracked() {
                        let _ = el.focus();
                    }
                }
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="note-editor" class:focused=focused>
            <div
                id=NOTE_EDITOR_ID
                node_ref=editor
                class="note-input"
                contenteditable="true"
                data-placeholder="Add a note"
                on:focus=move |_| set_focused.set(true)
                on:blur=move |_| set_focused.set(false)
                on:keydown=on_keydown
                on:keyup=move |_| refresh_formats()
                on:mouseup=move |_| refresh_formats()
            ></div>
            <div class="note-toolbar">
                <div class="format-buttons">
                    {format_button("bold", "B", |f| f.bold)}
                    {format_button("italic", "I", |f| f.italic)}
                    {format_button("underline", "U", |f| f.underline)}
                </div>
                <button
                    class="send-btn"
                    class:ready=focused
                    disabled=sending
                    title="Save note"
                    on:click=move |_| send()
                >
                    "➤"
                </button>
            </div>
        </div>
    }
}

#[component]
fn NoteCard(note: Note, on_deleted: Callback<()>) -> impl IntoView {
    let api = use_api();
    let mounted = MountGuard::new();
    let (confirming, set_confirming) = signal(false);
    let note_id = note.id;

    let confirm = Callback::new(move |_: ()| {
        set_confirming.set(false);
        let api = api.clone();
        let mounted = mounted.clone();
        spawn_local(async move {
            match api.delete_note(note_id).await {
                Ok(()) => {
                    info!("deleted note {}", note_id);
                    if mounted.alive() {
                        on_deleted.run(());
                    }
                }
                Err(e) => error!("deleting note {} failed: {}", note_id, e),
            }
        });
    });

    view! {
        <article class="note-card">
            <div class="note-time">{format_note_timestamp(&note.created_at)}</div>
            <div class="note-body" inner_html=sanitize_markup(note.content.trim())></div>
            <div class="note-actions">
                <button class="btn-link" on:click=move |_| set_confirming.set(true)>"Delete"</button>
            </div>
            <Show when=move || confirming.get()>
                <ConfirmModal
                    message="🗑️ Are you sure you want to delete this note?"
                    on_confirm=confirm
                    on_cancel=Callback::new(move |_| set_confirming.set(false))
                />
            </Show>
        </article>
    }
}

/// Editor plus the note list for one video, newest first.
#[component]
pub fn NotesPanel(video_id: VideoId) -> impl IntoView {
    let api = use_api();
    let mounted = MountGuard::new();
    let notes = RwSignal::new(Vec::<Note>::new());
    let list = NodeRef::<html::Div>::new();

    let reload = move |reveal: bool| {
        let api = api.clone();
        let mounted = mounted.clone();
        spawn_local(async move {
            match api.notes(video_id).await {
                Ok(mut fetched) => {
                    if !mounted.alive() {
                        return;
                    }
                    sort_notes_newest_first(&mut fetched);
                    notes.set(fetched);
                    if reveal {
                        if let Some(el) = list.get_untracked() {
                            scroll_into_view(&el);
                        }
                    }
                }
                Err(e) => error!("loading notes for video {} failed: {}", video_id, e),
            }
        });
    };
    reload(false);

    let on_saved = {
        let reload = reload.clone();
        Callback::new(move |_: ()| reload(true))
    };
    let on_deleted = Callback::new(move |_: ()| reload(false));

    view! {
        <section class="notes">
            <span class="notes-title">"Notes"</span>
            <NoteEditor video_id=video_id on_saved=on_saved/>
            <div class="pro-tip">
                "Pro tip 💡 press " <kbd>"m"</kbd> " to add note"
            </div>
            <div class="note-list" node_ref=list>
                <For
                    each=move || notes.get()
                    key=|note| note.id
                    children=move |note| view! { <NoteCard note=note on_deleted=on_deleted/> }
                />
            </div>
        </section>
    }
}
