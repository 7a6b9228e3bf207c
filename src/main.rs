//! Terminal gridfall runner.
//!
//! Owns everything the simulation core is not allowed to know about: the
//! terminal, the clock, the key bindings, and the high-score file. One loop
//! iteration renders the current state, waits for a single key or the
//! gravity deadline, and feeds exactly one event into the session.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};

use gridfall::core::{Board, BoardSink, GameSession, SessionSnapshot, Step};
use gridfall::gravity::GravityTimer;
use gridfall::input::{is_force_quit, map_key};
use gridfall::scores::{self, HighScores};
use gridfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use gridfall::types::{GameEvent, KeyBindings, Phase};

fn main() -> Result<()> {
    let bindings = parse_args()?;
    let scores = HighScores::at_default_location()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &bindings, &scores);

    // Always try to restore terminal state.
    let _ = term.exit();

    if result.is_ok() {
        if let Ok(table) = scores.load() {
            if !table.is_empty() {
                print!("{}", scores::format_table(&table));
            }
        }
    }
    result
}

fn parse_args() -> Result<KeyBindings> {
    let mut bindings = KeyBindings::default();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--keys" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| anyhow!("--keys: missing value"))?;
                bindings = KeyBindings::from_str(value).ok_or_else(|| {
                    anyhow!(
                        "--keys: want 8 distinct characters in order: \
                         left, reverse rotate, rotate, right, drop, pause, quit, restart"
                    )
                })?;
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(bindings)
}

/// Repaints each intermediate board state of a clear cascade, so the player
/// sees rows vanish and fall one at a time.
struct CascadeFrames<'a> {
    view: &'a GameView,
    term: &'a mut TerminalRenderer,
    fb: &'a mut FrameBuffer,
}

impl BoardSink for CascadeFrames<'_> {
    fn board_step(&mut self, board: &Board) {
        self.view.render_board_into(board.cells(), self.fb);
        // Mid-cascade repaints are best effort; the next full frame catches up.
        let _ = self.term.draw(self.fb);
    }
}

fn run(term: &mut TerminalRenderer, bindings: &KeyBindings, scores: &HighScores) -> Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1);
    let mut session = GameSession::new(seed);

    let view = GameView::default();
    let mut gravity = GravityTimer::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let mut next_tick = Instant::now() + gravity.interval();
    let mut recorded = false;

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, bindings, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Gravity only runs while a piece is falling; paused and finished
        // games wait for keys with no deadline.
        let was_falling = session.phase() == Phase::Falling;
        let event = next_event(bindings, was_falling.then_some(next_tick))?;

        let step = {
            let mut sink = CascadeFrames {
                view: &view,
                term: &mut *term,
                fb: &mut fb,
            };
            session.step(event, &mut sink)
        };
        if step == Step::Quit {
            break;
        }

        match event {
            GameEvent::Tick => {
                gravity.on_tick(session.level());
                next_tick = Instant::now() + gravity.interval();
            }
            // A restart that took effect starts the speed curve over; one
            // swallowed while paused must not.
            GameEvent::Restart if session.phase() == Phase::Falling => {
                gravity.reset();
                next_tick = Instant::now() + gravity.interval();
            }
            _ => {
                if !was_falling && session.phase() == Phase::Falling {
                    // Leaving pause: start a fresh gravity window.
                    next_tick = Instant::now() + gravity.interval();
                }
            }
        }

        match session.phase() {
            Phase::GameOver | Phase::Won => {
                if !recorded {
                    // A failing score file must not take down the game.
                    let _ = scores.record(session.score_report());
                    recorded = true;
                }
            }
            Phase::Falling => recorded = false,
            Phase::Paused => {}
        }
    }

    Ok(())
}

/// Wait for the next event: a bound key press, or `Tick` when the gravity
/// deadline passes. Unbound keys are swallowed without consuming a step.
fn next_event(bindings: &KeyBindings, deadline: Option<Instant>) -> Result<GameEvent> {
    loop {
        let timeout = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(60),
        };
        if !event::poll(timeout)? {
            if deadline.is_some() {
                return Ok(GameEvent::Tick);
            }
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if is_force_quit(key) {
                    return Ok(GameEvent::Quit);
                }
                if let Some(ev) = map_key(key, bindings) {
                    return Ok(ev);
                }
            }
            _ => {}
        }
    }
}
