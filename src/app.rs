use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

pub mod api;
pub mod components;
pub mod config;
pub mod state;
pub mod storage;
pub mod utils;

use crate::app::api::ApiClient;
use crate::app::components::course_detail::CourseDetail;
use crate::app::components::header::Header;
use crate::app::components::home::HomePage;
use crate::app::config::ApiConfig;
use crate::app::state::AppContext;

#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::from_env();
    log::info!("backend at {}", config.base_url);
    provide_context(ApiClient::new(config));
    provide_context(AppContext::init());

    view! {
        <Router>
            <div class="app">
                <Header/>
                <main class="main-content">
                    <Routes fallback=|| view! { <p class="empty-hint">"Nothing here."</p> }>
                        <Route path=path!("/") view=HomePage/>
                        <Route path=path!("/folder/:id") view=CourseDetail/>
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
