use leptos::prelude::*;
use tracker_core::model::Tag;
use tracker_core::palette::ColorKey;

use crate::app::state::use_app;

/// `#name` pill. Active chips take their tag's palette gradient, inactive
/// ones render dashed and transparent.
#[component]
pub fn TagChip(
    tag: Tag,
    #[prop(optional)] inactive: bool,
    #[prop(optional)] on_click: Option<Callback<Tag>>,
    #[prop(optional)] on_remove: Option<Callback<Tag>>,
) -> impl IntoView {
    let app = use_app();
    let color = app.color(ColorKey::Tag(tag.id));
    let style = if inactive {
        "background: transparent".to_string()
    } else {
        format!("background: {}; color: {}", color.background(), color.font)
    };
    let class = if inactive { "tag-chip inactive" } else { "tag-chip" };
    let label = format!("#{}", tag.name.to_lowercase());
    let clicked = tag.clone();
    let removed = tag;

    view! {
        <span
            class=class
            class:clickable=on_click.is_some()
            style=style
            on:click=move |_| {
                if let Some(cb) = on_click {
                    cb.run(clicked.clone());
                }
            }
        >
            {label}
            {on_remove.map(|cb| {
                view! {
                    <button
                        class="tag-remove"
                        title="Remove tag"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            cb.run(removed.clone());
                        }
                    >
                        "×"
                    </button>
                }
            })}
        </span>
    }
}
