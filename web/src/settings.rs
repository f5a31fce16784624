use crate::utils::*;
use pairs_core as game;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub level: game::Level,
}

impl StorageKey for Settings {
    const KEY: &'static str = "pairs:settings";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub settings: Settings,
    pub presets: game::Presets,
    pub on_apply: Callback<Settings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let SettingsProps {
        open,
        settings,
        presets,
        on_apply,
        on_close,
    } = props;

    let levels = presets.iter().map(|preset| {
        let level = preset.level;
        let current = settings.level == level;
        let onclick = {
            let on_apply = on_apply.clone();
            Callback::from(move |_: MouseEvent| on_apply.emit(Settings { level }))
        };
        html! {
            <li>
                <button class={classes!(current.then_some("current"))} {onclick}>
                    <strong>{level.name()}</strong>
                    <small>{format!("{0}×{0}", preset.grid_size)}</small>
                </button>
            </li>
        }
    });
    let cancel = {
        let on_close = on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <dialog id="settings" open={*open}>
            <article>
                <h2>{"Difficulty"}</h2>
                <ul>{ for levels }</ul>
                <footer>
                    <button type="reset" onclick={cancel}>{"Cancel"}</button>
                </footer>
            </article>
        </dialog>
    }
}
