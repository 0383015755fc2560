use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use tracker_core::collection::last_path_segment;
use tracker_core::filter::{add_tag_local, normalize_tag_name, remove_tag_local, unused_tags};
use tracker_core::model::{Folder, FolderId, Tag};

use crate::app::api::use_api;
use crate::app::components::tag_chip::TagChip;
use crate::app::state::use_app;
use crate::app::utils::{lock_body_scroll, MountGuard};

fn update_folder(folders: RwSignal<Vec<Folder>>, id: FolderId, f: impl FnOnce(&mut Folder)) {
    folders.update(|all| {
        if let Some(folder) = all.iter_mut().find(|x| x.id == id) {
            f(folder);
        }
    });
}

/// Root list on the left, the root's courses beneath it, and the tag editor
/// for the selected course on the right.
#[component]
pub fn TagManager(
    folders: RwSignal<Vec<Folder>>,
    on_close: Callback<()>,
    on_folder_changed: Callback<FolderId>,
) -> impl IntoView {
    let api = use_api();
    let app = use_app();
    let mounted = MountGuard::new();

    lock_body_scroll(true);
    on_cleanup(|| lock_body_scroll(false));

    let expanded = RwSignal::new(None::<String>);
    let selected = RwSignal::new(None::<FolderId>);
    let all_tags = RwSignal::new(Vec::<Tag>::new());
    let (new_tag, set_new_tag) = signal(String::new());
    let (status, set_status) = signal(String::new());

    let load_tags = {
        let api = api.clone();
        let mounted = mounted.clone();
        move || {
            let api = api.clone();
            let mounted = mounted.clone();
            spawn_local(async move {
                match api.tags("").await {
                    Ok(tags) if mounted.alive() => all_tags.set(tags),
                    Ok(_) => {}
                    Err(e) => error!("loading tags failed: {}", e),
                }
            });
        }
    };
    load_tags();

    let selected_folder = Memo::new(move |_| {
        let id = selected.get()?;
        folders.with(|all| all.iter().find(|f| f.id == id).cloned())
    });

    let add_tag = {
        let api = api.clone();
        let mounted = mounted.clone();
        move |raw: String| {
            let (Some(name), Some(folder_id)) = (normalize_tag_name(&raw), selected.get_untracked()) else {
                return;
            };
            let api = api.clone();
            let mounted = mounted.clone();
            spawn_local(async move {
                match api.add_tag(folder_id, &name).await {
                    Ok(tag) => {
                        info!("tagged folder {} with {}", folder_id, tag.name);
                        if !mounted.alive() {
                            return;
                        }
                        update_folder(folders, folder_id, |f| add_tag_local(f, tag.clone()));
                        all_tags.update(|all| {
                            if !all.iter().any(|t| t.name == tag.name) {
                                all.push(tag);
                            }
                        });
                        set_new_tag.set(String::new());
                        set_status.set(String::new());
                        on_folder_changed.run(folder_id);
                    }
                    Err(e) => {
                        error!("adding tag {} failed: {}", name, e);
                        if mounted.alive() {
                            set_status.set(format!("Could not add #{}.", name));
                        }
                    }
                }
            });
        }
    };

    let remove_tag = {
        let api = api.clone();
        let mounted = mounted.clone();
        Callback::new(move |tag: Tag| {
            let Some(folder_id) = selected.get_untracked() else { return };
            let api = api.clone();
            let mounted = mounted.clone();
            spawn_local(async move {
                match api.remove_tag(folder_id, &tag.name).await {
                    Ok(()) => {
                        if mounted.alive() {
                            update_folder(folders, folder_id, |f| {
                                remove_tag_local(f, &tag.name);
                            });
                            on_folder_changed.run(folder_id);
                        }
                    }
                    Err(e) => error!("removing tag {} failed: {}", tag.name, e),
                }
            });
        })
    };

    let suggest = {
        let add_tag = add_tag.clone();
        Callback::new(move |tag: Tag| add_tag(tag.name))
    };

    let delete_unmapped = {
        let api = api.clone();
        let load_tags = load_tags.clone();
        move |_: leptos::ev::MouseEvent| {
            let api = api.clone();
            let load_tags = load_tags.clone();
            let mounted = mounted.clone();
            spawn_local(async move {
                match api.delete_unmapped_tags().await {
                    Ok(()) => {
                        if mounted.alive() {
                            set_status.set("Unmapped tags deleted.".into());
                            load_tags();
                        }
                    }
                    Err(e) => {
                        error!("deleting unmapped tags failed: {}", e);
                        if mounted.alive() {
                            set_status.set("Failed to delete unmapped tags.".into());
                        }
                    }
                }
            });
        }
    };

    let toggle_root = move |root: String| {
        selected.set(None);
        expanded.update(|cur| {
            *cur = if cur.as_deref() == Some(root.as_str()) { None } else { Some(root) };
        });
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal tag-manager">
                <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                <div class="modal-title">"Folder Manager"</div>
                <div class="tag-manager-body">
                    <ul class="root-tree">
                        <For
                            each=move || app.roots.get()
                            key=|root| root.clone()
                            children=move |root| {
                                let label = last_path_segment(&root);
                                let is_open = {
                                    let root = root.clone();
                                    move || expanded.with(|e| e.as_deref() == Some(root.as_str()))
                                };
                                let courses = {
                                    let root = root.clone();
                                    move || {
                                        let mut list: Vec<Folder> = folders.with(|all| {
                                            all.iter().filter(|f| f.main_folder_path == root).cloned().collect()
                                        });
                                        list.sort_by_key(|f| f.name.to_lowercase());
                                        list
                                    }
                                };
                                let open_for_row = is_open.clone();
                                view! {
                                    <li>
                                        <div
                                            class="root-row"
                                            class:active=move || open_for_row() && selected.get().is_none()
                                            on:click=move |_| toggle_root(root.clone())
                                        >
                                            <span class="chevron" class:open=is_open.clone()>"▾"</span>
                                            "📁 " {label}
                                        </div>
                                        <Show when=is_open.clone()>
                                            <ul class="course-list">
                                                {
                                                    let courses = courses.clone();
                                                    move || courses()
                                                        .into_iter()
                                                        .map(|course| {
                                                            let id = course.id;
                                                            view! {
                                                                <li
                                                                    class="course-row"
                                                                    class:active=move || selected.get() == Some(id)
                                                                    on:click=move |_| selected.set(Some(id))
                                                                >
                                                                    {course.name}
                                                                </li>
                                                            }
                                                        })
                                                        .collect_view()
                                                }
                                            </ul>
                                        </Show>
                                    </li>
                                }
                            }
                        />
                    </ul>
                    <div class="tag-editor">
                        {move || match selected_folder.get() {
                            None => view! { <p class="empty-hint">"Select a subfolder to see its details."</p> }.into_any(),
                            Some(folder) => {
                                let unused = all_tags.with(|all| unused_tags(all, &folder));
                                let add_tag = add_tag.clone();
                                view! {
                                    <h2>{folder.name.clone()}</h2>
                                    <p class="mono">{folder.path.clone()}</p>
                                    <div class="tag-row">
                                        {if folder.tags.is_empty() {
                                            view! { <p class="empty-hint">"No tags, add some below"</p> }.into_any()
                                        } else {
                                            folder.tags.iter().cloned()
                                                .map(|tag| view! { <TagChip tag=tag on_remove=remove_tag/> })
                                                .collect_view()
                                                .into_any()
                                        }}
                                    </div>
                                    <form
                                        class="inline-form"
                                        on:submit=move |ev| {
                                            ev.prevent_default();
                                            add_tag(new_tag.get_untracked());
                                        }
                                    >
                                        <input
                                            type="text"
                                            placeholder="# add a tag"
                                            prop:value=new_tag
                                            on:input=move |ev| set_new_tag.set(event_target_value(&ev))
                                        />
                                        <button type="submit">"⏎"</button>
                                    </form>
                                    {(!unused.is_empty()).then(|| view! {
                                        <p class="form-note">"Click these to tag folder directly"</p>
                                    })}
                                    <div class="tag-row">
                                        {unused.into_iter()
                                            .map(|tag| view! { <TagChip tag=tag on_click=suggest/> })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any()
                            }
                        }}
                        <p class="form-note">{status}</p>
                    </div>
                </div>
                <button class="danger-link" on:click=delete_unmapped>"🗑️ Delete Unmapped Tags"</button>
            </div>
        </div>
    }
}
