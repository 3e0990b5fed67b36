use super::{message_panel::MessagePanel, scene_view::SceneView};
use crate::config::SceneConfig;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| SceneConfig::load());
    let message = use_state(String::new);

    let on_message = {
        let message = message.clone();
        Callback::from(move |text: String| message.set(text))
    };

    html! {
        <div id="root" style="display:flex; justify-content:center; align-items:center; min-width:0; width:100vw; height:100vh; box-sizing:border-box; border:4px solid #dc2626;">
            <div style="flex:1; min-width:0; height:100%;">
                <SceneView config={config} on_message={on_message} />
            </div>
            <MessagePanel message={(*message).clone()} />
        </div>
    }
}
