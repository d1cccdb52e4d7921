/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::Direction;
use sim::event::GameEvent;
use sim::lifecycle;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_MUTE, KEYS_QUIT, KEYS_START};
use ui::renderer::Renderer;
use ui::sound::{cue_for, SoundEngine};

fn main() {
    // Restore the terminal before the default hook prints a panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    init_logging();

    let config = GameConfig::load();
    let mut world = WorldState::new(config.timing.clone(), config.seed);
    info!(seed = ?config.seed, "session created");

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if sound.is_none() {
        warn!("no audio output device; sound disabled");
    }

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing!");
    println!("High Score: {}", world.high_score);
}

// ── Logging ──

/// Log to a file so the TUI is never disturbed.
/// `PACMAZE_LOG` overrides the default `info` filter.
fn init_logging() {
    let path = log_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok();
    }
    let file = match std::fs::File::create(&path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_env("PACMAZE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn log_path() -> PathBuf {
    let dir = match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/pacmaze"),
        None => std::env::temp_dir(),
    };
    dir.join("pacmaze.log")
}

fn restore_terminal() {
    use crossterm::{cursor, execute, terminal};
    let _ = terminal::disable_raw_mode();
    let _ = execute!(std::io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
}

// ── Game loop ──

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    info!(gamepad = gp.connected, "input ready");
    let frame = Duration::from_millis(config.timing.frame_ms);
    let mut muted = !config.sound.enabled;
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            info!("quit requested");
            break;
        }

        if kb.any_pressed(KEYS_MUTE) || gp.mute_pressed() {
            muted = !muted;
            info!(muted, "sound toggled");
        }

        if kb.any_pressed(KEYS_START) || gp.start_pressed() {
            let events = lifecycle::start(world);
            process_sound_events(sound, muted, &events);
        }

        let now = Instant::now();
        let steps: Vec<Direction> = kb
            .direction_strokes()
            .chain(gp.direction_steps(now))
            .collect();
        for dir in steps {
            let events = step::move_player(world, dir);
            process_sound_events(sound, muted, &events);
        }

        // Whole milliseconds only; the remainder carries to the next frame.
        let elapsed_ms = now.duration_since(last_tick).as_millis() as u64;
        if elapsed_ms > 0 {
            last_tick += Duration::from_millis(elapsed_ms);
            let events = lifecycle::advance(world, elapsed_ms);
            process_sound_events(sound, muted, &events);
        }

        renderer.render(world, muted)?;
        std::thread::sleep(frame);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, muted: bool, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) if !muted => s,
        _ => return,
    };
    for cue in events.iter().filter_map(cue_for) {
        sfx.play(cue);
    }
}
