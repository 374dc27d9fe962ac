/// Entry point and game loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::execute;

use lavarunner::config::GameConfig;
use lavarunner::error::LevelError;
use lavarunner::sim::event::GameEvent;
use lavarunner::sim::plan::LevelPlan;
use lavarunner::sim::step::Session;
use lavarunner::ui::gamepad::Gamepad;
use lavarunner::ui::input::Keyboard;
use lavarunner::ui::renderer::Renderer;

fn main() {
    // Logs go to stderr; redirect it (2>lavarunner.log) while the UI runs.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let config = GameConfig::load();

    let plan = match load_plan(&config) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("cannot load level: {e}");
            std::process::exit(1);
        }
    };

    let restart_delay = Duration::from_millis(config.timing.restart_delay_ms);
    let mut session = match Session::new(&plan, &config.physics, restart_delay) {
        Ok(session) => session,
        Err(e) => {
            log::error!("invalid level {:?}: {e}", plan.name);
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        log::error!("terminal init failed: {e}");
        return;
    }

    let mut kb = Keyboard::new();
    kb.honor_release = enable_key_release();

    let result = game_loop(&mut session, &mut renderer, &mut kb, &config);

    if kb.honor_release {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    if let Err(e) = renderer.cleanup() {
        log::error!("terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        log::error!("game error: {e}");
    }

    let (collected, total) = session.level().coins();
    println!("Thanks for playing Lava Runner!");
    println!("Attempts: {}   Coins this run: {collected}/{total}", session.attempt());
}

fn load_plan(config: &GameConfig) -> Result<LevelPlan, LevelError> {
    match &config.level_file {
        Some(path) => LevelPlan::load(path),
        None => Ok(LevelPlan::builtin()),
    }
}

/// Ask the terminal for key Release events. Returns whether it agreed.
fn enable_key_release() -> bool {
    if !crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return false;
    }
    let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    execute!(io::stdout(), PushKeyboardEnhancementFlags(flags)).is_ok()
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    kb: &mut Keyboard,
    config: &GameConfig,
) -> io::Result<()> {
    let mut pad = Gamepad::new(&config.gamepad);
    if pad.is_connected() {
        log::info!("gamepad detected");
    } else {
        log::info!("no gamepad, keyboard only");
    }
    let frame_period = Duration::from_millis(config.timing.frame_ms.max(1));
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        kb.drain_events();
        pad.update();

        if kb.quit_pressed() || pad.quit_pressed() {
            break;
        }
        if kb.restart_pressed() || pad.restart_pressed() {
            report(&[session.restart()]);
            renderer.invalidate();
        }

        let dt = frame_start.duration_since(last_frame).as_secs_f64();
        last_frame = frame_start;

        let input = kb.sample().merge(pad.sample());
        let events = session.frame(dt, &input);
        report(&events);

        renderer.render(session.level(), session.attempt())?;

        if let Some(rest) = frame_period.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::CoinCollected { collected, total, .. } => {
                log::debug!("coin {collected}/{total}")
            }
            GameEvent::PlayerBurned => log::debug!("player burned"),
            GameEvent::LevelWon | GameEvent::LevelLost => log::debug!("{event:?}"),
            GameEvent::LevelRestarted { attempt } => log::debug!("attempt {attempt} begins"),
        }
    }
}
