//! Worduel - word duels in the terminal
//!
//! Two players take turns setting a secret word for each other and
//! guessing it. Game state lives on the Worduel service; this client
//! polls it and renders the current scene as text.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use worduel_core::{Route, Scene};
use worduel_net::{DuelService, GraphqlClient};

mod config;
mod input;
mod poller;
mod render;
mod state;
#[cfg(test)]
mod testing;
mod viewmodel;

use config::{Config, ConfigError};
use input::Command;
use state::AppState;
use viewmodel::Screen;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] worduel_core::Error),
    #[error(transparent)]
    Net(#[from] worduel_net::Error),
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("worduel: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(endpoint = %config.endpoint, "Starting Worduel");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let route = initial_route(std::env::args().skip(1));
    if let Err(e) = runtime.block_on(run(config, route)) {
        tracing::error!("Worduel stopped: {}", e);
        std::process::exit(1);
    }
}

/// `worduel`, `worduel DUEL_ID`, `worduel duel DUEL_ID` or `worduel watch GAME_ID`
fn initial_route(mut args: impl Iterator<Item = String>) -> Route {
    match (args.next(), args.next()) {
        (Some(kind), Some(id)) if kind == "watch" => Route::Spectate(id),
        (Some(kind), Some(id)) if kind == "duel" => Route::Duel(id),
        (Some(id), None) => Route::Duel(id),
        _ => Route::Home,
    }
}

enum Input {
    Line(Option<String>),
    Poll(poller::PollEvent),
}

async fn run(config: Config, route: Route) -> Result<(), StartupError> {
    let data_dir = config.data_dir()?;
    let service = GraphqlClient::new(
        config.endpoint.clone(),
        config.solution_encoding,
        config.request_timeout(),
    )?;
    let state = Arc::new(AppState::new(config, service, &data_dir)?);

    state.verify_identity().await?;
    state.navigate(route);

    let mut screen = Screen::for_state(&state).await;
    let mut shown: Option<Scene> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show(&state, &screen, &mut shown);

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            event = screen.next_event() => Input::Poll(event),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => {
                if let Some(command) = input::parse(&line) {
                    if !handle(&state, &mut screen, command).await {
                        break;
                    }
                }
            }
            Input::Poll(event) => screen.apply(event),
        }

        if !screen.is_current(&state) {
            screen = Screen::for_state(&state).await;
            shown = None;
        }
        show(&state, &screen, &mut shown);
    }

    tracing::info!("Goodbye");
    Ok(())
}

/// Returns false when the user asked to leave
async fn handle<S>(state: &Arc<AppState<S>>, screen: &mut Screen<S>, command: Command) -> bool
where
    S: DuelService + Send + Sync + 'static,
{
    match (command, screen) {
        (Command::Quit, _) => return false,
        (Command::Help, _) => println!("{}", input::HELP),
        (Command::Home, _) => state.navigate(Route::Home),
        (Command::Open(id), _) => state.navigate(Route::Duel(id)),
        (Command::Watch(id), _) => state.navigate(Route::Spectate(id)),
        (Command::Text(name), Screen::Username) => {
            viewmodel::register(state, &name).await;
        }
        (Command::New(word), Screen::Home(vm)) => {
            vm.create(&word).await;
        }
        (Command::Random, Screen::Home(vm)) => {
            if let Some(word) = vm.random_word().await {
                println!("Random word: {} (`new` to use it)", word);
            }
        }
        (Command::Accept, Screen::Duel(vm)) => vm.accept().await,
        (Command::Text(letters), Screen::Duel(vm)) => {
            for c in letters.chars() {
                vm.type_char(c);
            }
        }
        (Command::Delete, Screen::Duel(vm)) => vm.delete_char(),
        (Command::Enter, Screen::Duel(vm)) => vm.enter().await,
        (Command::Next(word), Screen::Duel(vm)) => {
            vm.create_next_game(&word).await;
        }
        _ => state.notify_error("Not available here, type `help` for commands"),
    }
    true
}

fn show<S>(state: &AppState<S>, screen: &Screen<S>, shown: &mut Option<Scene>)
where
    S: DuelService + Send + Sync + 'static,
{
    for notice in state.drain_notices() {
        println!("{}", render::render_notice(&notice));
    }

    let scene = screen.scene(state);
    if shown.as_ref() == Some(&scene) {
        return;
    }

    println!("{}", render::render_scene(&scene));
    if let (Screen::Home(vm), Some(me)) = (screen, state.identity_id()) {
        println!("Recent duels:\n{}", render::render_recent(vm.recent(), &me));
    }
    *shown = Some(scene);
}
