//! Console driver for a single gallery.
//!
//! Reads one command per line from stdin, turns it into gallery events or
//! API calls, and logs everything the engine asks the surface to do.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use flume::Receiver;
use tracing::{debug, info, warn};

use tilepanes::layout::Placement;
use tilepanes::models::{Direction, NavigationState};
use tilepanes::ui::{EventBus, GalleryEvent, GallerySurface, NavigationInput, ThemeController};
use tilepanes::GalleryConfig;

const DEFAULT_WIDTH: f32 = 800.0;
const DEFAULT_ITEMS: usize = 24;

/// Command line: `tilepanes [CONFIG.toml] [--width PX] [--items N]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub width: f32,
    pub items: usize,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Self {
            config: None,
            width: DEFAULT_WIDTH,
            items: DEFAULT_ITEMS,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--width" => {
                    let value = args.next().context("--width needs a value")?;
                    parsed.width = parse_arg(&value)?;
                }
                "--items" => {
                    let value = args.next().context("--items needs a value")?;
                    parsed.items = parse_arg(&value)?;
                }
                flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
                path => {
                    if parsed.config.is_some() {
                        bail!("Unexpected argument: {path}");
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }

    pub fn load_config(&self) -> Result<GalleryConfig> {
        match &self.config {
            Some(path) => GalleryConfig::load_from_path(path),
            None => GalleryConfig::load_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayAction {
    Start,
    Stop,
    Pause,
    Resume,
}

impl FromStr for AutoplayAction {
    type Err = anyhow::Error;

    fn from_str(word: &str) -> Result<Self> {
        Ok(match word {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            _ => bail!("Unknown autoplay action: {word}"),
        })
    }
}

/// One line of the command script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(f32),
    Reload(usize),
    GoTo(i64),
    Next,
    Previous,
    Bullet(usize),
    Arrow(Direction),
    Scroll(Direction, usize),
    Play,
    Click(usize),
    Hover(bool),
    Autoplay(AutoplayAction),
    Wait(Duration),
    State,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().context("Empty command")?;
        let arg = words.next();

        let command = match (name, arg) {
            ("resize", Some(width)) => Self::Resize(parse_arg(width)?),
            ("reload", Some(items)) => Self::Reload(parse_arg(items)?),
            ("goto", Some(pane)) => Self::GoTo(parse_arg(pane)?),
            ("next", None) => Self::Next,
            ("prev", None) => Self::Previous,
            ("bullet", Some(index)) => Self::Bullet(parse_arg(index)?),
            ("arrow", Some(side)) => Self::Arrow(parse_side(side)?),
            ("scroll", Some(side)) => {
                let tiles = words.next().context("scroll needs a tile count")?;
                Self::Scroll(parse_side(side)?, parse_arg(tiles)?)
            }
            ("play", None) => Self::Play,
            ("click", Some(slot)) => Self::Click(parse_arg(slot)?),
            ("hover", Some("on")) => Self::Hover(true),
            ("hover", Some("off")) => Self::Hover(false),
            ("autoplay", Some(action)) => Self::Autoplay(action.parse()?),
            ("wait", Some(ms)) => Self::Wait(Duration::from_millis(parse_arg(ms)?)),
            ("state", None) => Self::State,
            ("quit", None) => Self::Quit,
            _ => bail!("Unknown command: {line}"),
        };

        if let Some(extra) = words.next() {
            bail!("Unexpected argument: {extra}");
        }
        Ok(command)
    }
}

fn parse_side(word: &str) -> Result<Direction> {
    Ok(match word {
        "left" => Direction::Previous,
        "right" => Direction::Next,
        _ => bail!("Expected left or right, got {word}"),
    })
}

fn parse_arg<T>(word: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse()
        .with_context(|| format!("Invalid argument: {word}"))
}

/// Surface that only logs what it is asked to show.
#[derive(Debug)]
pub struct ConsoleSurface {
    width: f32,
    items: usize,
}

impl ConsoleSurface {
    pub fn new(width: f32, items: usize) -> Self {
        Self { width, items }
    }
}

impl GallerySurface for ConsoleSurface {
    fn container_width(&self) -> f32 {
        self.width
    }

    fn item_count(&self) -> usize {
        self.items
    }

    fn render_pane(&mut self, pane: usize, items: &[usize]) {
        match (items.first(), items.last()) {
            (Some(first), Some(last)) => {
                info!(pane, first, last, count = items.len(), "Render pane")
            }
            _ => info!(pane, "Render empty pane"),
        }
    }

    fn open_lightbox(&mut self, item_index: usize) {
        info!(item = item_index, "Open lightbox");
    }

    fn sync_navigation(&mut self, state: &NavigationState) {
        info!(
            controls = state.control_count,
            highlighted = ?state.highlighted,
            visible = state.visible,
            "Navigation"
        );
    }

    fn apply_placement(&mut self, placement: &Placement) {
        debug!(
            grid = ?placement.grid,
            navigation = ?placement.navigation,
            height = placement.total_height,
            "Placement"
        );
    }

    fn set_loading(&mut self, loading: bool) {
        info!(loading, "Preloader");
    }
}

pub struct App {
    config: GalleryConfig,
    width: f32,
    items: usize,
}

impl App {
    pub fn new(config: GalleryConfig, width: f32, items: usize) -> Self {
        Self {
            config,
            width,
            items,
        }
    }

    /// Runs the command script from stdin on a single-threaded runtime.
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        runtime.block_on(self.drive())
    }

    async fn drive(self) -> Result<()> {
        let mut session = Session::new(self.config, self.width, self.items)?;
        let inbox = session.inbox.clone();
        let lines = spawn_stdin_reader()?;

        loop {
            tokio::select! {
                line = lines.recv_async() => {
                    let Ok(line) = line else {
                        debug!("stdin closed");
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if session.execute(command).await.is_break() {
                                break;
                            }
                        }
                        Err(err) => warn!(error = %err, "Ignoring command"),
                    }
                }
                Ok(event) = inbox.recv_async() => session.deliver(event),
            }
        }

        session.shutdown();
        Ok(())
    }
}

struct Session {
    theme: ThemeController<ConsoleSurface>,
    bus: EventBus,
    inbox: Receiver<GalleryEvent>,
}

impl Session {
    /// Must run inside a tokio runtime when autoplay is configured.
    fn new(config: GalleryConfig, width: f32, items: usize) -> Result<Self> {
        let bus = EventBus::new();
        let theme = ThemeController::init(config, ConsoleSurface::new(width, items), &bus)
            .context("Failed to initialize gallery")?;
        let inbox = theme.inbox();
        Ok(Self { theme, bus, inbox })
    }

    async fn execute(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Resize(width) => {
                self.theme.surface_mut().width = width;
                self.bus.publish(GalleryEvent::Resized { width });
            }
            Command::Reload(items) => {
                self.bus.publish(GalleryEvent::ReloadStarted);
                self.theme.dispatch_pending();
                self.theme.surface_mut().items = items;
                self.bus.publish(GalleryEvent::ReloadCompleted);
            }
            Command::GoTo(pane) => log_failure(self.theme.go_to_pane(pane)),
            Command::Next => log_failure(self.theme.next_pane()),
            Command::Previous => log_failure(self.theme.previous_pane()),
            Command::Scroll(direction, tiles) => {
                log_failure(self.theme.scroll_tiles(direction, tiles))
            }
            Command::Bullet(index) => self.navigate(NavigationInput::Bullet(index)),
            Command::Arrow(direction) => self.navigate(NavigationInput::Arrow(direction)),
            Command::Play => self.navigate(NavigationInput::PlayPause),
            Command::Click(slot) => {
                self.bus.publish(GalleryEvent::TileClicked { slot });
            }
            Command::Hover(true) => {
                self.bus.publish(GalleryEvent::PointerEntered);
            }
            Command::Hover(false) => {
                self.bus.publish(GalleryEvent::PointerLeft);
            }
            Command::Autoplay(AutoplayAction::Start) => self.theme.start_autoplay(),
            Command::Autoplay(AutoplayAction::Stop) => self.theme.stop_autoplay(),
            Command::Autoplay(AutoplayAction::Pause) => self.theme.pause_autoplay(),
            Command::Autoplay(AutoplayAction::Resume) => self.theme.resume_autoplay(),
            Command::Wait(duration) => self.wait(duration).await,
            Command::State => self.log_state(),
            Command::Quit => return ControlFlow::Break(()),
        }
        self.theme.dispatch_pending();
        ControlFlow::Continue(())
    }

    fn navigate(&self, input: NavigationInput) {
        self.bus.publish(GalleryEvent::Navigation(input));
    }

    /// Sleeps while still delivering autoplay ticks.
    async fn wait(&mut self, duration: Duration) {
        let inbox = self.inbox.clone();
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                Ok(event) = inbox.recv_async() => self.deliver(event),
            }
        }
    }

    fn deliver(&mut self, event: GalleryEvent) {
        if self.theme.handle_event(event).is_continue() {
            self.theme.dispatch_pending();
        }
    }

    fn log_state(&self) {
        let snapshot = self.theme.snapshot();
        let navigation = self.theme.navigation_state();
        info!(
            items = snapshot.item_count,
            width = snapshot.container_width,
            tiles_per_pane = snapshot.tiles_per_pane,
            panes = snapshot.total_panes,
            active = ?snapshot.active_pane,
            navigation_visible = navigation.visible,
            autoplay = ?self.theme.autoplay_state(),
            "State"
        );
    }

    fn shutdown(&mut self) {
        self.bus.publish(GalleryEvent::Shutdown);
        self.theme.dispatch_pending();
        self.theme.destroy();
    }
}

fn log_failure(result: tilepanes::Result<()>) {
    if let Err(err) = result {
        warn!(error = %err, "Command failed");
    }
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = flume::unbounded();
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to read stdin");
                        break;
                    }
                }
            }
        })
        .context("Failed to spawn stdin reader")?;
    Ok(rx)
}
