use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use tracker_core::collection::{merge_folders, recents, retain_roots, visible_collection, RECENTS_LIMIT};
use tracker_core::model::{Folder, FolderId, Tag};

use crate::app::api::{use_api, ApiClient};
use crate::app::components::course_card::{CourseCard, RecentCard};
use crate::app::components::popup::Popup;
use crate::app::components::tag_chip::TagChip;
use crate::app::components::tag_manager::TagManager;
use crate::app::state::use_app;
use crate::app::utils::MountGuard;

/// Shared between the per-root scans so each can fold its batch in on arrival.
#[derive(Clone)]
struct Collection {
    api: ApiClient,
    mounted: MountGuard,
    folders: RwSignal<Vec<Folder>>,
    missing: RwSignal<HashSet<FolderId>>,
    pending: RwSignal<usize>,
}

impl Collection {
    fn scan_roots(&self, roots: Vec<String>) {
        info!("scanning {} root folders", roots.len());
        for root in roots {
            let this = self.clone();
            this.pending.update(|n| *n += 1);
            spawn_local(async move {
                let result = this.api.scan_main_folder(&root).await;
                if !this.mounted.alive() {
                    return;
                }
                this.pending.update(|n| *n = n.saturating_sub(1));
                match result {
                    Ok(batch) => {
                        debug!("{} yielded {} folders", root, batch.len());
                        this.absorb(batch);
                    }
                    Err(e) => error!("scanning {} failed: {}", root, e),
                }
            });
        }
    }

    fn absorb(&self, batch: Vec<Folder>) {
        let checks: Vec<(FolderId, String)> = batch.iter().map(|f| (f.id, f.path.clone())).collect();
        self.folders.update(|all| *all = merge_folders(all, batch));
        for (id, path) in checks {
            self.check_exists(id, path);
        }
    }

    fn check_exists(&self, id: FolderId, path: String) {
        let this = self.clone();
        spawn_local(async move {
            let exists = match this.api.folder_exists(&path).await {
                Ok(exists) => exists,
                Err(e) => {
                    warn!("existence check for {} failed: {}", path, e);
                    false
                }
            };
            if !this.mounted.alive() {
                return;
            }
            this.missing.update(|m| {
                if exists {
                    m.remove(&id);
                } else {
                    m.insert(id);
                }
            });
        });
    }

    fn refresh(&self, id: FolderId) {
        let Some(path) = self.folders.with_untracked(|all| all.iter().find(|f| f.id == id).map(|f| f.path.clone()))
        else {
            return;
        };
        let this = self.clone();
        spawn_local(async move {
            match this.api.scan_folder(&path).await {
                Ok(folder) if this.mounted.alive() => this.folders.update(|all| *all = merge_folders(all, vec![folder])),
                Ok(_) => {}
                Err(e) => error!("rescanning {} failed: {}", path, e),
            }
        });
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app();
    let collection = Collection {
        api: use_api(),
        mounted: MountGuard::new(),
        folders: RwSignal::new(Vec::new()),
        missing: RwSignal::new(HashSet::new()),
        pending: RwSignal::new(0),
    };
    let folders = collection.folders;
    let missing = collection.missing;
    let pending = collection.pending;

    let (popup_open, set_popup_open) = signal(false);
    let (manager_open, set_manager_open) = signal(false);

    collection.scan_roots(app.roots.get_untracked());

    let visible = Memo::new(move |_| {
        folders.with(|all| {
            missing.with(|m| app.tag_filter.with(|filter| visible_collection(all, filter, m)))
        })
    });
    let recent = Memo::new(move |_| {
        folders.with(|all| {
            missing.with(|m| {
                let present: Vec<Folder> = all.iter().filter(|f| !m.contains(&f.id)).cloned().collect();
                recents(&present, RECENTS_LIMIT)
            })
        })
    });
    let known_tags = Memo::new(move |_| {
        let mut tags: Vec<Tag> = Vec::new();
        folders.with(|all| {
            for tag in all.iter().flat_map(|f| f.tags.iter()) {
                if !tags.iter().any(|t| t.id == tag.id) {
                    tags.push(tag.clone());
                }
            }
        });
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    });

    let on_roots_changed = {
        let collection = collection.clone();
        Callback::new(move |_: ()| {
            let roots = app.roots.get_untracked();
            folders.update(|all| *all = retain_roots(all, &roots));
            collection.scan_roots(roots);
        })
    };
    let on_folder_changed = {
        let collection = collection.clone();
        Callback::new(move |id: FolderId| collection.refresh(id))
    };
    let toggle_tag = Callback::new(move |tag: Tag| app.toggle_filter_tag(&tag));

    view! {
        <div class="home">
            <div class="home-actions">
                <button class="btn-ghost" on:click=move |_| set_manager_open.set(true)>"Manage tags"</button>
                <button class="btn-primary" on:click=move |_| set_popup_open.set(true)>"Add folder"</button>
            </div>
            <Show when=move || popup_open.get()>
                <Popup on_close=Callback::new(move |_| set_popup_open.set(false)) on_roots_changed=on_roots_changed/>
            </Show>
            <Show when=move || manager_open.get()>
                <TagManager
                    folders=folders
                    on_close=Callback::new(move |_| set_manager_open.set(false))
                    on_folder_changed=on_folder_changed
                />
            </Show>

            <Show when=move || !recent.with(|r| r.is_empty())>
                <h2 class="section-title">"Continue watching"</h2>
                <div class="recent-strip">
                    <For
                        each=move || recent.get()
                        key=|f| (f.id, f.last_played_video.as_ref().map(|v| v.id))
                        children=|folder| view! { <RecentCard folder=folder/> }
                    />
                </div>
            </Show>

            <div class="filter-bar">
                <span class="filter-label">"Filter"</span>
                {move || {
                    let active = app.tag_filter.get();
                    let mut chips = known_tags.get();
                    for tag in active.tags() {
                        if !chips.iter().any(|t| t.id == tag.id) {
                            chips.push(tag.clone());
                        }
                    }
                    chips
                        .into_iter()
                        .map(|tag| {
                            let inactive = !active.contains(tag.id);
                            view! { <TagChip tag=tag inactive=inactive on_click=toggle_tag/> }
                        })
                        .collect_view()
                }}
                <Show when=move || !app.tag_filter.with(|f| f.is_empty())>
                    <button class="btn-link" on:click=move |_| app.clear_filter()>"clear"</button>
                </Show>
            </div>

            <h2 class="section-title">
                "Scanned collection"
                <Show when=move || { pending.get() > 0 }>
                    <span class="spinner"></span>
                </Show>
            </h2>
            {move || {
                let shown = visible.get();
                if shown.is_empty() {
                    let hint = if pending.get() > 0 {
                        "Scanning your folders..."
                    } else if app.tag_filter.with(|f| f.is_empty()) {
                        "🥺 No courses available. Try adding a new folder."
                    } else {
                        "No course carries the selected tags."
                    };
                    return view! { <p class="empty-hint">{hint}</p> }.into_any();
                }
                view! {
                    <div class="course-grid">
                        {shown.into_iter().map(|folder| view! { <CourseCard folder=folder/> }).collect_view()}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}
