use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_use::{use_event_listener, use_window};
use log::{debug, error, info, warn};
use tracker_core::PrefsError;

use crate::app::api::use_api;
use crate::app::state::use_app;
use crate::app::utils::MountGuard;

const INVALID_PATH: &str = "🚫 Invalid path entered. Enter the full folder path.";

/// Root folder management: lists stored roots (click to remove) and
/// validates new ones against the backend before storing them.
#[component]
pub fn Popup(on_close: Callback<()>, on_roots_changed: Callback<()>) -> impl IntoView {
    let api = use_api();
    let app = use_app();
    let mounted = MountGuard::new();

    let (path, set_path) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (error_message, set_error_message) = signal(String::new());
    let (busy, set_busy) = signal(false);
    let input_ref = NodeRef::<html::Input>::new();

    let notify = move |ok: Option<String>, err: Option<String>| {
        set_message.set(ok.unwrap_or_default());
        set_error_message.set(err.unwrap_or_default());
    };

    Effect::new(move |_| {
        if let Some(el) = input_ref.get() {
            let _ = el.focus();
        }
    });

    let _ = use_event_listener(use_window(), ev::keydown, move |e: web_sys::KeyboardEvent| {
        if e.key() == "Escape" {
            on_close.run(());
        }
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let candidate = path.get_untracked().trim().to_string();
        if candidate.is_empty() || busy.get_untracked() {
            return;
        }
        if app.roots.with_untracked(|r| r.contains(&candidate)) {
            notify(None, Some("🚨 This folder is already in the list.".into()));
            return;
        }
        set_busy.set(true);
        let api = api.clone();
        let mounted = mounted.clone();
        spawn_local(async move {
            let outcome = match api.folder_exists(&candidate).await {
                Ok(true) => match api.register_main_folder(&candidate).await {
                    Ok(Some(registered)) => {
                        debug!("backend registered {} as root {}", registered.path, registered.id);
                        Ok(())
                    }
                    Ok(None) => Ok(()),
                    Err(e) => {
                        error!("registering {} failed: {}", candidate, e);
                        Err("🚫 The backend refused this folder.".to_string())
                    }
                },
                Ok(false) => Err(INVALID_PATH.to_string()),
                Err(e) => {
                    warn!("folder check for {} failed: {}", candidate, e);
                    Err(INVALID_PATH.to_string())
                }
            };
            if !mounted.alive() {
                return;
            }
            set_busy.set(false);
            match outcome.and_then(|_| {
                app.add_root(&candidate).map_err(|e| match e {
                    PrefsError::DuplicateRoot(_) => "🚨 This folder is already in the list.".to_string(),
                    other => other.to_string(),
                })
            }) {
                Ok(()) => {
                    info!("added root folder {}", candidate);
                    set_path.set(String::new());
                    notify(Some("🎉 Folder added successfully!".into()), None);
                    on_roots_changed.run(());
                }
                Err(msg) => notify(None, Some(msg)),
            }
        });
    };

    let remove = move |root: String| match app.remove_root(&root) {
        Ok(()) => {
            info!("removed root folder {}", root);
            notify(Some("🗑️ Folder removed successfully!".into()), None);
            on_roots_changed.run(());
        }
        Err(e) => notify(None, Some(e.to_string())),
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal popup">
                <button class="modal-close" aria-label="Close popup" on:click=move |_| on_close.run(())>"×"</button>
                <h3>"Existing Folders"</h3>
                <div class="root-list">
                    {move || {
                        let roots = app.roots.get();
                        if roots.is_empty() {
                            return view! {
                                <p class="empty-hint">"No folders available. Add a new folder below 👇"</p>
                            }
                            .into_any();
                        }
                        roots
                            .into_iter()
                            .map(|root| {
                                let label = root.clone();
                                view! {
                                    <div class="root-item" title="Click to remove" on:click=move |_| remove(root.clone())>
                                        {label}
                                    </div>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </div>
                <h2>"Add a new folder"</h2>
                <form class="inline-form" on:submit=submit>
                    <input
                        node_ref=input_ref
                        type="text"
                        placeholder="Enter new folder path"
                        prop:value=path
                        on:input=move |ev| set_path.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=busy>"⏎"</button>
                </form>
                <Show when=move || !message.get().is_empty()>
                    <p class="form-note">{message}</p>
                </Show>
                <Show when=move || !error_message.get().is_empty()>
                    <p class="form-note error">{error_message}</p>
                </Show>
            </div>
        </div>
    }
}
