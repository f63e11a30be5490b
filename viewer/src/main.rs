#[cfg(feature = "window")]
mod state;

use color_eyre::eyre::Result;
use loader::{prefabs, SystemDescription};
use std::io::ErrorKind;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viewer::config::{Settings, DEFAULT_SETTINGS_PATH};
use viewer::controller::{CloudTrigger, OverlayTrigger, ViewConfig};
use viewer::{AssetStore, Controller, Session};

const DEFAULT_SYSTEM_PATH: &str = "systems/galilean.json5";

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let system_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SYSTEM_PATH);
    let settings_path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_SETTINGS_PATH);

    let description = load_system(system_path)?;
    let settings = Settings::from_file(settings_path)?;
    info!(?settings, "viewer settings");

    let session = Session::initialize(&description)?;
    let view = ViewConfig::from_settings(&settings);
    let assets = AssetStore::new(&settings.assets_dir);
    let trigger: Box<dyn OverlayTrigger> = Box::new(CloudTrigger::from_settings(&settings));
    run(session, view, assets, trigger)
}

/// The system at `path`, or the built-in one if there is no such file.
fn load_system(path: &str) -> Result<SystemDescription> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(loader::load(&contents)?),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path, "no system file, using the built-in Galilean system");
            Ok(prefabs::systems::galilean()?)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(not(feature = "window"))]
fn run(
    session: Session,
    view: ViewConfig,
    assets: AssetStore,
    trigger: Box<dyn OverlayTrigger>,
) -> Result<()> {
    use viewer::terminal::{self, TextRenderer, HELP};

    let stdout = std::io::stdout();
    let renderer = TextRenderer::new(stdout.lock());
    let mut controller = Controller::new(session, renderer, view, assets, trigger);
    controller.start()?;
    eprintln!("{}", HELP);

    let stdin = std::io::stdin();
    terminal::run(&mut controller, stdin.lock(), std::io::stderr())?;
    Ok(())
}

#[cfg(feature = "window")]
fn run(
    session: Session,
    view: ViewConfig,
    assets: AssetStore,
    trigger: Box<dyn OverlayTrigger>,
) -> Result<()> {
    use color_eyre::eyre::eyre;
    use ggez::{
        conf::{Conf, WindowMode, WindowSetup},
        event, ContextBuilder,
    };
    use state::{FrameSlot, State};

    let (ref mut ctx, ref mut event_loop) = ContextBuilder::new("galilean_moons", "gamma-delta")
        .conf(Conf::new())
        .window_setup(WindowSetup {
            title: viewer::render::TITLE.to_owned(),
            ..Default::default()
        })
        .window_mode(WindowMode {
            resizable: true,
            ..Default::default()
        })
        .build()
        .map_err(|err| eyre!("couldn't open a window: {}", err))?;

    let assets_dir = assets.dir().to_path_buf();
    let controller = Controller::new(session, FrameSlot::default(), view, assets, trigger);
    let state = &mut State::new(ctx, controller, &assets_dir);
    state.start()?;

    event::run(ctx, event_loop, state).map_err(|err| eyre!("window closed: {}", err))?;
    match state.fault() {
        Some(fault) => Err(fault.clone().into()),
        None => Ok(()),
    }
}
