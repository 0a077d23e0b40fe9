/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::direction::Direction;
use sim::step::{self, StepResult};
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// GameOver → Menu happens automatically after this long.
const GAME_OVER_DELAY: Duration = Duration::from_millis(3000);

fn main() {
    let game_config = match GameConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let mut world = WorldState::new(game_config.grid);
    let mut renderer = Renderer::new(game_config.colors);

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &game_config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let mut game_over_at: Option<Instant> = None;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_input(world, &kb, config, &mut last_tick) {
            break;
        }

        advance(world, Instant::now(), &mut last_tick, &mut game_over_at);

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Advance the phase machine by one frame at time `now`.
/// At most one tick fires per call: a new tick is only armed here,
/// after the previous one has fully run.
fn advance(
    world: &mut WorldState,
    now: Instant,
    last_tick: &mut Instant,
    game_over_at: &mut Option<Instant>,
) {
    match world.phase {
        Phase::Playing => {
            if now.duration_since(*last_tick) >= world.tick_rate {
                *last_tick = now;
                let result = step::step(world);
                if result == StepResult::Collided || world.won {
                    world.phase = Phase::GameOver;
                    *game_over_at = Some(now);
                }
            }
        }
        Phase::GameOver => {
            if game_over_at.map_or(true, |t| now.duration_since(t) >= GAME_OVER_DELAY) {
                *game_over_at = None;
                world.phase = Phase::Menu;
            }
        }
        Phase::Menu | Phase::Paused => {}
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Phase-dependent input handling. Returns true to exit the program.
fn handle_input(
    world: &mut WorldState,
    kb: &InputState,
    config: &GameConfig,
    last_tick: &mut Instant,
) -> bool {
    match world.phase {
        // ── Menu ──
        Phase::Menu => {
            if kb.any_pressed(KEYS_UP) || kb.any_pressed(KEYS_RIGHT) {
                world.level = world.level.next();
            } else if kb.any_pressed(KEYS_DOWN) || kb.any_pressed(KEYS_LEFT) {
                world.level = world.level.prev();
            } else if kb.any_pressed(KEYS_CONFIRM) {
                // The speed level is latched here; the selector has no
                // effect until the next game starts.
                world.start_game(config.speeds.delay_for(world.level));
                *last_tick = Instant::now();
            } else if kb.any_pressed(KEYS_QUIT) {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            // Apply presses in arrival order: with several direction
            // keys between two ticks, the last one wins.
            for key in kb.presses() {
                if let Some(dir) = direction_for(key.code) {
                    world.set_direction(dir);
                } else if KEYS_PAUSE.contains(&key.code) {
                    world.phase = Phase::Paused;
                }
            }
        }

        // ── Paused ──
        Phase::Paused => {
            // Everything except the pause toggle is ignored; the game
            // state is untouched while paused.
            if kb.any_pressed(KEYS_PAUSE) {
                world.phase = Phase::Playing;
                // Resume acts as a fresh tick boundary: back-date the
                // clock so the next tick fires immediately.
                *last_tick = Instant::now()
                    .checked_sub(world.tick_rate)
                    .unwrap_or_else(Instant::now);
            }
        }

        // ── Game Over ──
        Phase::GameOver => {
            // Returns to the menu on its own; no input needed.
        }
    }

    false
}
