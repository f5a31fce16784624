use clap::Parser;
use wasm_bindgen::prelude::*;

mod config;
mod game;
mod settings;
mod utils;

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let (args, args_error) = match Args::try_parse_from(location_hash.split(['#', '&'])) {
        Ok(args) => (args, None),
        Err(err) => (Args::default(), Some(err)),
    };
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            web_sys::console::error_1(&format!("Error initializing logger: {}", err).into());
        }
    }
    if let Some(err) = args_error {
        log::warn!("ignoring flags in {:?}: {}", location_hash, err);
    }
    log::debug!("seed: {:?}", args.game);

    log::debug!("App started");
    match document().get_element_by_id("game") {
        Some(root) => {
            yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
        }
        None => {
            log::warn!("Could not find id=\"game\" element, rendering into body");
            yew::Renderer::<game::GameView>::with_props(args.game).render();
        }
    }
}
