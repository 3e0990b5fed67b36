use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct MessagePanelProps {
    pub message: String,
}

#[function_component(MessagePanel)]
pub fn message_panel(props: &MessagePanelProps) -> Html {
    html! {
        <div id="message-panel" style="flex:1; display:grid; place-items:center; align-content:center; gap:6px; font-size:16px;">
            <span style="font-weight:600;">{"Message:"}</span>
            <span>{ props.message.clone() }</span>
        </div>
    }
}
