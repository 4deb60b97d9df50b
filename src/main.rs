#[macro_use]
extern crate tracing;

use std::collections::VecDeque;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use bakesale::animation::Clock;
use bakesale::cli::{Cli, Sub};
use bakesale::navigation::{Fetch, Frame, Mode, Navigator};
use bakesale::provider::{DealsProvider, FixtureProvider};
use bakesale::script::{self, ScriptStep};
use bakesale_config::{Config, ConfigPath};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct State {
    navigator: Navigator,
    provider: FixtureProvider,
    clock: Clock,
    script: VecDeque<ScriptStep>,
    start: Duration,
    last_frame: Option<Frame>,
    signal: LoopSignal,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if env::var_os("RUST_BACKTRACE").is_none() {
        env::set_var("RUST_BACKTRACE", "1");
    }

    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "bakesale=debug,info".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    let _client = tracy_client::Client::start();

    let config_path = config_path(cli.config)?;

    let (deals, script, viewport_width) = match cli.subcommand {
        Sub::Validate => {
            config_path.load()?;
            info!("config at {:?} is valid", config_path.path());
            return Ok(());
        }
        Sub::Run {
            deals,
            script,
            viewport_width,
        } => (deals, script, viewport_width),
    };

    info!("starting version {}", bakesale::utils::version());

    let config = match config_path.load() {
        Ok(config) => config,
        Err(err) => {
            warn!("{err:?}");
            Config::default()
        }
    };

    let provider = FixtureProvider::load(&deals)?;
    let script = match script {
        Some(path) => script::load(&path)?,
        None => Vec::new(),
    };

    let mut clock = Clock::new();
    let slowdown = config.animations.slowdown.0;
    clock.set_rate(if slowdown <= f64::EPSILON {
        0.
    } else {
        1. / slowdown
    });
    clock.set_complete_instantly(config.animations.off);

    let navigator = Navigator::new(clock.clone(), viewport_width, Rc::new(config));
    replay(navigator, provider, clock, script)?;

    info!("replay finished");
    Ok(())
}

/// Runs the frame loop until the script is exhausted and everything settled.
fn replay(
    navigator: Navigator,
    provider: FixtureProvider,
    clock: Clock,
    script: Vec<ScriptStep>,
) -> anyhow::Result<Navigator> {
    let mut event_loop = EventLoop::<State>::try_new()?;
    let mut state = State {
        navigator,
        provider,
        start: clock.now_unadjusted(),
        clock,
        script: script.into(),
        last_frame: None,
        signal: event_loop.get_signal(),
    };

    event_loop
        .handle()
        .insert_source(Timer::immediate(), |_, _, state| {
            state.on_frame();
            TimeoutAction::ToDuration(FRAME_INTERVAL)
        })
        .map_err(|err| err.error)?;

    event_loop.run(None, &mut state, |_| ())?;

    Ok(state.navigator)
}

fn config_path(cli_path: Option<PathBuf>) -> anyhow::Result<ConfigPath> {
    if let Some(path) = cli_path {
        return Ok(ConfigPath::Explicit(path));
    }

    if let Some(path) = env::var_os("BAKESALE_CONFIG") {
        return Ok(ConfigPath::Explicit(path.into()));
    }

    let dirs = ProjectDirs::from("", "", "bakesale")
        .ok_or_else(|| anyhow::anyhow!("error retrieving home directory"))?;
    Ok(ConfigPath::Regular(dirs.config_dir().join("config.kdl")))
}

impl State {
    fn on_frame(&mut self) {
        let _span = tracy_client::span!("State::on_frame");

        // Latch the time once for the whole frame.
        self.clock.clear();
        let elapsed = self.clock.now_unadjusted().saturating_sub(self.start);

        while let Some(step) = self.script.front() {
            if step.timestamp() > elapsed {
                break;
            }

            trace!("replaying {step:?}");
            step.apply(&mut self.navigator);
            self.script.pop_front();
        }

        self.navigator.advance_animations();
        self.run_fetches();

        let frame = self.navigator.frame();
        if self.last_frame.as_ref() != Some(&frame) {
            if self.last_frame.as_ref().map(|last| last.mode) != Some(frame.mode) {
                info!("mode: {:?}", frame.mode);
            }
            debug!("{frame:?}");
            self.last_frame = Some(frame);
        }

        // The splash title never settles.
        let animating =
            self.navigator.are_animations_ongoing() && self.navigator.mode() != Mode::Splash;
        if self.script.is_empty() && !animating && !self.navigator.is_search_pending() {
            self.signal.stop();
        }
    }

    fn run_fetches(&mut self) {
        for fetch in self.navigator.take_fetches() {
            debug!("fetching {fetch:?}");

            match fetch {
                Fetch::InitialDeals => {
                    let result = self.provider.fetch_initial_deals();
                    self.navigator.on_initial_deals(result);
                }
                Fetch::Search(term) => {
                    let result = self.provider.fetch_deals_by_search_term(&term);
                    self.navigator.on_search_results(&term, result);
                }
                Fetch::Detail(id) => {
                    let result = self.provider.fetch_deal_detail(&id);
                    self.navigator.on_detail_fetched(result);
                }
            }
        }
    }
}
