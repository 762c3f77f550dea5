//! The render loop that drives every view.
//!
//! One task owns all mutable state. It waits on three sources at once: the
//! shutdown signal, keys forwarded from a dedicated reader thread, and the
//! periodic ticker. The terminal is restored on every way out of the loop.

use crate::common::{Key, Mode};
use crate::events::SystemEvent;
use crate::keys::KeySource;
use crate::screen::Screen;
use crate::time::{BlinkPhase, SystemClock, TickEvent};
use crate::views::{render_nav, ViewProvider};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace, warn};

pub use crate::events::ExitReason;

const KEY_CHANNEL_CAPACITY: usize = 64;

/// The state every view renders from.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// The view currently on screen.
    pub mode: Mode,
    pub blink: BlinkPhase,
    pub tick_count: u64,
}

impl RenderState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            blink: BlinkPhase::new(),
            tick_count: 0,
        }
    }

    /// Whether blinking separators are drawn in the current phase.
    pub fn show_separator(&self) -> bool {
        self.blink.is_visible()
    }
}

enum KeyOutcome {
    Exit(ExitReason),
    Redraw,
    Ignored,
}

/// Owns the views and runs them against a screen and a key source.
///
/// Views are shown in registration order; the arrow keys cycle through
/// them and `1`..`9` jump straight to one.
pub struct RenderEngine {
    tick_interval: Duration,
    views: Vec<Box<dyn ViewProvider>>,
    state: RenderState,
    show_nav: Option<bool>,
    system_event_sender: broadcast::Sender<SystemEvent>,
}

impl RenderEngine {
    pub fn new(tick_interval: Duration) -> Self {
        let (system_event_sender, _) = broadcast::channel(64);
        Self {
            tick_interval,
            views: Vec::new(),
            state: RenderState::new(Mode::Clock),
            show_nav: None,
            system_event_sender,
        }
    }

    pub fn with_view(mut self, view: impl ViewProvider + 'static) -> Self {
        self.views.push(Box::new(view));
        self
    }

    /// The view shown first. Falls back to the first registered view when
    /// no view has this mode.
    pub fn initial_mode(mut self, mode: Mode) -> Self {
        self.state.mode = mode;
        self
    }

    /// Forces the mode bar on or off. By default it is shown only when more
    /// than one view is registered.
    pub fn show_nav(mut self, show: bool) -> Self {
        self.show_nav = Some(show);
        self
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }

    /// Runs until a quit key, Ctrl+C, or the active view finishing.
    pub async fn run<S, K>(&mut self, screen: &mut S, keys: K) -> anyhow::Result<ExitReason>
    where
        S: Screen,
        K: KeySource,
    {
        self.run_until(screen, keys, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Like [`run`](Self::run), with `shutdown` standing in for Ctrl+C.
    pub async fn run_until<S, K, F>(
        &mut self,
        screen: &mut S,
        keys: K,
        shutdown: F,
    ) -> anyhow::Result<ExitReason>
    where
        S: Screen,
        K: KeySource,
        F: Future<Output = ()>,
    {
        if self.views.is_empty() {
            anyhow::bail!("no views registered with the render engine");
        }
        if self.active_index().is_none() {
            let first = self.views[0].mode();
            debug!("No view for {}, starting on {}", self.state.mode, first);
            self.state.mode = first;
        }

        info!(
            "Render engine starting: {} view(s) at {:?}",
            self.views.len(),
            self.tick_interval
        );
        let key_rx = spawn_key_reader(keys).context("failed to start the key reader")?;

        if let Err(e) = screen.enter() {
            let _ = screen.leave();
            return Err(e).context("failed to prepare the terminal");
        }
        let outcome = self.event_loop(screen, key_rx, shutdown).await;
        let restored = screen.leave();

        let reason = outcome?;
        restored.context("failed to restore the terminal")?;
        self.system_event_sender
            .send(SystemEvent::EngineShutdown { reason })
            .ok();
        info!("Render engine stopped: {:?}", reason);
        Ok(reason)
    }

    async fn event_loop<S, F>(
        &mut self,
        screen: &mut S,
        mut key_rx: mpsc::Receiver<Key>,
        shutdown: F,
    ) -> anyhow::Result<ExitReason>
    where
        S: Screen,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut clock = SystemClock::new(self.tick_interval);
        let mut keys_open = true;

        self.redraw(screen, true)?;
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: tokio::time::Instant::now(),
            })
            .ok();
        if self.active_finished() {
            return Ok(ExitReason::Finished);
        }

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown signal received.");
                    return Ok(ExitReason::Interrupted);
                }
                key = key_rx.recv(), if keys_open => match key {
                    Some(key) => match self.handle_key(key) {
                        KeyOutcome::Exit(reason) => return Ok(reason),
                        KeyOutcome::Redraw => self.redraw(screen, true)?,
                        KeyOutcome::Ignored => {}
                    },
                    None => {
                        debug!("Key input closed; still ticking.");
                        keys_open = false;
                    }
                },
                tick = clock.next() => {
                    self.on_tick(&tick);
                    self.redraw(screen, false)?;
                    if self.active_finished() {
                        return Ok(ExitReason::Finished);
                    }
                }
            }
        }
    }

    fn on_tick(&mut self, tick: &TickEvent) {
        trace!("Tick #{} received.", tick.tick_count);
        self.state.tick_count = tick.tick_count;
        self.state.blink.advance();
        let now = Local::now();
        for view in self.views.iter_mut() {
            view.on_tick(tick, &self.state, now);
        }
    }

    fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if key.is_char('q') {
            return KeyOutcome::Exit(ExitReason::Quit);
        }
        let count = self.views.len();
        let current = self.active_index().unwrap_or(0);
        match key {
            Key::Interrupt => return KeyOutcome::Exit(ExitReason::Interrupted),
            Key::Left => return self.switch_to((current + count - 1) % count),
            Key::Right => return self.switch_to((current + 1) % count),
            Key::Byte(b @ b'1'..=b'9') if usize::from(b - b'1') < count => {
                return self.switch_to(usize::from(b - b'1'));
            }
            _ => {}
        }

        let active = self.state.mode;
        let mut handled = false;
        for view in self.views.iter_mut() {
            let is_active = view.mode() == active;
            handled |= view.on_key(key, is_active);
        }
        if handled {
            KeyOutcome::Redraw
        } else {
            KeyOutcome::Ignored
        }
    }

    fn switch_to(&mut self, index: usize) -> KeyOutcome {
        let to = self.views[index].mode();
        let from = self.state.mode;
        if from != to {
            info!("Mode changed: {} -> {}", from, to);
            self.state.mode = to;
            self.system_event_sender
                .send(SystemEvent::ModeChanged { from, to })
                .ok();
        }
        KeyOutcome::Redraw
    }

    fn active_index(&self) -> Option<usize> {
        self.views
            .iter()
            .position(|view| view.mode() == self.state.mode)
    }

    fn active_finished(&self) -> bool {
        self.active_index()
            .is_some_and(|i| self.views[i].is_finished())
    }

    fn nav_visible(&self) -> bool {
        self.show_nav.unwrap_or(self.views.len() > 1)
    }

    fn frame(&self, now: DateTime<Local>) -> String {
        let mut frame = if self.nav_visible() {
            render_nav(&self.views, self.state.mode)
        } else {
            String::new()
        };
        if let Some(i) = self.active_index() {
            frame.push_str(&self.views[i].render(&self.state, now));
        }
        frame
    }

    fn redraw<S: Screen>(&self, screen: &mut S, clear: bool) -> anyhow::Result<()> {
        screen
            .draw(&self.frame(Local::now()), clear)
            .context("failed to draw frame")
    }
}

/// Moves the blocking key source onto its own thread. The thread ends when
/// the source reaches end of input or the loop drops the receiver; a read
/// that never returns simply leaves it parked until the process exits.
fn spawn_key_reader<K: KeySource>(mut keys: K) -> io::Result<mpsc::Receiver<Key>> {
    let (tx, rx) = mpsc::channel(KEY_CHANNEL_CAPACITY);
    std::thread::Builder::new()
        .name("key-reader".to_string())
        .spawn(move || loop {
            match keys.next_key() {
                Ok(Some(key)) => {
                    if tx.blocking_send(key).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Reading keys failed: {}", e);
                    break;
                }
            }
        })?;
    Ok(rx)
}
