use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::components::search::Search;

#[component]
pub fn Header() -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <header class="app-header">
            <div class="brand" on:click=move |_| navigate("/", Default::default())>
                <span class="brand-mark">"▶"</span>
                <div>
                    <p class="brand-title">"course-tracker"</p>
                    <p class="brand-subtitle">"track what you watch"</p>
                </div>
            </div>
            <Search/>
        </header>
    }
}
