use leptos::prelude::*;

use crate::app::utils::lock_body_scroll;

#[component]
pub fn ConfirmModal(
    #[prop(into)] message: String,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    lock_body_scroll(true);
    on_cleanup(|| lock_body_scroll(false));

    view! {
        <div class="modal-backdrop">
            <div class="modal confirm">
                <h2>"Confirm Action"</h2>
                <p>{message}</p>
                <div class="modal-actions">
                    <button class="btn-ghost" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button class="btn-primary" on:click=move |_| on_confirm.run(())>"Delete"</button>
                </div>
            </div>
        </div>
    }
}
