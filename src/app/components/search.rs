use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_use::{on_click_outside, use_debounce_fn_with_arg, use_document, use_event_listener};
use log::{debug, error};
use tracker_core::model::Tag;
use tracker_core::search::{highlight, SearchState, SearchTarget, SEARCH_DEBOUNCE};

use crate::app::api::use_api;
use crate::app::components::tag_chip::TagChip;
use crate::app::state::use_app;
use crate::app::utils::typing_in_field;

fn highlighted(text: &str, query: &str) -> impl IntoView {
    highlight(text, query)
        .into_iter()
        .map(|seg| {
            let class = if seg.matched { "match" } else { "" };
            view! { <span class=class>{seg.text}</span> }
        })
        .collect_view()
}

#[component]
pub fn Search() -> impl IntoView {
    let api = use_api();
    let app = use_app();
    let navigate = StoredValue::new_local(use_navigate());

    let (input, set_input) = signal(String::new());
    let (open, set_open) = signal(false);
    let state = RwSignal::new(SearchState::default());
    let input_ref = NodeRef::<html::Input>::new();
    let panel_ref = NodeRef::<html::Div>::new();

    let run_lookups = use_debounce_fn_with_arg(
        move |query: String| {
            let Some(ticket) = state.try_update(|s| s.begin(&query)).flatten() else {
                return;
            };
            debug!("search: {:?}", query);
            let (a, q) = (api.clone(), query.clone());
            spawn_local(async move {
                let result = a.tags(&q).await.map_err(|e| error!("tag search failed: {}", e)).ok();
                state.update(|s| {
                    s.tags_done(ticket, result);
                });
            });
            let (a, q) = (api.clone(), query.clone());
            spawn_local(async move {
                let result = a.search_folders(&q).await.map_err(|e| error!("folder search failed: {}", e)).ok();
                state.update(|s| {
                    s.folders_done(ticket, result);
                });
            });
            let a = api.clone();
            spawn_local(async move {
                let result = a.search_videos(&query).await.map_err(|e| error!("video search failed: {}", e)).ok();
                state.update(|s| {
                    s.videos_done(ticket, result);
                });
            });
        },
        SEARCH_DEBOUNCE.as_millis() as f64,
    );

    let close = move |clear: bool| {
        set_open.set(false);
        if clear {
            set_input.set(String::new());
            state.update(|s| s.reset());
        }
        if let Some(el) = input_ref.get_untracked() {
            let _ = el.blur();
        }
    };

    let _ = use_event_listener(use_document(), ev::keydown, move |e: web_sys::KeyboardEvent| {
        match e.key().as_str() {
            "/" if !typing_in_field() => {
                e.prevent_default();
                if let Some(el) = input_ref.get_untracked() {
                    let _ = el.focus();
                }
            }
            "Escape" if open.get_untracked() => close(true),
            _ => {}
        }
    });

    let _ = on_click_outside(panel_ref, move |_| {
        if open.get_untracked() && !typing_in_field() {
            set_open.set(false);
        }
    });

    let go = move |target: SearchTarget| {
        close(false);
        navigate.with_value(|nav| nav(&target.route(), Default::default()));
    };

    let on_tag = Callback::new(move |tag: Tag| {
        app.toggle_filter_tag(&tag);
        close(false);
        navigate.with_value(|nav| nav("/", Default::default()));
    });

    view! {
        <div class="search" node_ref=panel_ref>
            <div class="search-box" class:focused=open>
                <span class="search-icon">"⌕"</span>
                <input
                    node_ref=input_ref
                    type="text"
                    placeholder="Search content here..."
                    prop:value=input
                    on:focus=move |_| set_open.set(true)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_input.set(value.clone());
                        if value.trim().is_empty() {
                            state.update(|s| s.reset());
                        } else {
                            run_lookups(value);
                        }
                    }
                />
                <span class="search-hint" on:click=move |_| close(true)>
                    {move || if open.get() { "×" } else { "/" }}
                </span>
            </div>
            <Show when=move || open.get() && state.with(|s| s.is_active())>
                <div class="search-results">
                    <section>
                        <div class="result-heading">
                            "Tags"
                            <Show when=move || state.with(|s| s.tags.loading)>
                                <span class="spinner"></span>
                            </Show>
                        </div>
                        <div class="result-tags">
                            {move || {
                                let tags = state.with(|s| s.tags.items.clone());
                                if tags.is_empty() {
                                    view! { <p class="empty-hint">"No tag found"</p> }.into_any()
                                } else {
                                    tags.into_iter()
                                        .map(|tag| view! { <TagChip tag=tag on_click=on_tag/> })
                                        .collect_view()
                                        .into_any()
                                }
                            }}
                        </div>
                    </section>
                    <section>
                        <div class="result-heading">
                            "Folder name"
                            <Show when=move || state.with(|s| s.folders.loading)>
                                <span class="spinner"></span>
                            </Show>
                        </div>
                        {move || {
                            let (folders, query) = state.with(|s| (s.folders.items.clone(), s.query().to_string()));
                            if folders.is_empty() {
                                return view! { <p class="empty-hint">"No folder found"</p> }.into_any();
                            }
                            folders.into_iter()
                                .map(|folder| {
                                    let id = folder.id;
                                    view! {
                                        <div class="result-row mono" on:click=move |_| go(SearchTarget::Folder(id))>
                                            "📂 " {highlighted(&folder.path, &query)}
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </section>
                    <section>
                        <div class="result-heading">
                            "Content"
                            <Show when=move || state.with(|s| s.videos.loading)>
                                <span class="spinner"></span>
                            </Show>
                        </div>
                        {move || {
                            let (videos, query) = state.with(|s| (s.videos.items.clone(), s.query().to_string()));
                            if videos.is_empty() {
                                return view! { <p class="empty-hint">"No video found"</p> }.into_any();
                            }
                            videos.into_iter()
                                .map(|video| {
                                    let target = SearchTarget::for_video(&video);
                                    view! {
                                        <div
                                            class="result-row"
                                            class:disabled=target.is_none()
                                            on:click=move |_| {
                                                if let Some(t) = target {
                                                    go(t);
                                                }
                                            }
                                        >
                                            "🎬 " {highlighted(&video.name, &query)}
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </section>
                </div>
            </Show>
        </div>
    }
}
