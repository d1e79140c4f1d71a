use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{GameEngine, GamePhase, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Render at ~30 FPS, independent of game speed
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Timer for the next game tick, first firing one full period from now
fn arm_tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Keyboard play in the terminal.
///
/// Owns the collaborators around the engine: key translation, the tick
/// scheduler, rendering and high score storage.
pub struct HumanMode<S: HighScoreStore> {
    engine: GameEngine,
    store: S,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// The tick timer must be recreated before the next tick
    rearm_ticks: bool,
}

impl<S: HighScoreStore> HumanMode<S> {
    pub fn new(engine: GameEngine, store: S) -> Self {
        Self {
            engine,
            store,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            rearm_ticks: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut armed_period = self.engine.tick_interval();
        let mut tick_timer = arm_tick_timer(armed_period);

        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            let running = self.engine.phase() == GamePhase::Playing && !self.engine.is_paused();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick, only while a game is running
                _ = tick_timer.tick(), if running => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // The interval shrinks as food is eaten; follow it
            let current = self.engine.tick_interval();
            if self.rearm_ticks || current != armed_period {
                armed_period = current;
                tick_timer = arm_tick_timer(armed_period);
                self.rearm_ticks = false;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);

            // Turning and pausing are only forwarded during play
            if action.needs_playing() && self.engine.phase() != GamePhase::Playing {
                return Ok(());
            }

            match action {
                KeyAction::Turn(direction) => {
                    self.engine.set_direction_intent(direction);
                }
                KeyAction::TogglePause => {
                    self.engine.toggle_pause();
                    self.metrics.on_pause_changed(self.engine.is_paused());
                    self.rearm_ticks = true;
                }
                KeyAction::Start => {
                    self.start_game();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        let outcome = self.engine.tick();

        if let TickOutcome::Ate {
            new_high_score: Some(high_score),
            ..
        } = outcome
        {
            // Losing the record on disk should not end the game
            if let Err(err) = self.store.save(high_score) {
                warn!("Failed to save high score: {:#}", err);
            }
        }

        if outcome != TickOutcome::Idle && self.engine.phase() == GamePhase::GameOver {
            info!("Final score {}", self.engine.score());
            self.metrics.on_game_over();
        }
    }

    fn start_game(&mut self) {
        self.engine.start();
        self.metrics.on_game_start();
        self.rearm_ticks = true;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
