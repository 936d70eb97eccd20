//! Bullet Arena entry point
//!
//! Native builds run a headless autopilot session against the save directory
//! and bank the result through the shop. The browser build only installs
//! logging; hosts drive `Session` themselves.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bullet_arena::persistence::{FileStorage, StorageError};
    use bullet_arena::sim::{LevelError, RunOutcome, Session, autopilot_input};
    use bullet_arena::tuning::levels;
    use bullet_arena::{LogSink, Settings, Shop};

    /// Simulated display rate of the headless loop
    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Give up after this many simulated seconds
    const TIME_LIMIT: f64 = 30.0 * 60.0;

    #[derive(Debug, thiserror::Error)]
    pub enum RunError {
        #[error(transparent)]
        Storage(#[from] StorageError),
        #[error(transparent)]
        Level(#[from] LevelError),
        #[error("level {0} is still locked")]
        Locked(usize),
    }

    fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
        std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    pub fn run() -> Result<Option<RunOutcome>, RunError> {
        let save_dir = std::env::var("ARENA_SAVE_DIR").unwrap_or_else(|_| "saves".to_string());
        let level_index = std::env::args()
            .nth(1)
            .and_then(|a| a.parse().ok())
            .unwrap_or_else(|| env_or("ARENA_LEVEL", 0usize));
        let seed = env_or("ARENA_SEED", 0x5eed_u64);

        let storage = FileStorage::open(&save_dir)?;
        let settings = Settings::load(&storage);
        let mut shop = Shop::load(storage);

        let level = levels::get(level_index).ok_or(LevelError::UnknownLevel(level_index))?;
        if !shop.is_level_unlocked(&level) {
            return Err(RunError::Locked(level_index));
        }

        let character = shop.get_selected_character();
        let bonuses = shop.get_upgrade_bonuses();
        log::info!(
            "Starting '{}' as {} (seed {seed:#x}, {})",
            level.name,
            character.name,
            settings.sim_rate.as_str()
        );

        let mut session = Session::new(&settings, LogSink);
        let mut now = 0.0;
        session.start_level(level_index, &character, &bonuses, seed, now)?;

        while now < TIME_LIMIT {
            if let Some(input) = session.level().map(autopilot_input) {
                session.set_input(input);
            }
            now += FRAME_DT;
            session.frame(now);

            if let Some(outcome) = session.take_outcome() {
                shop.settle(&outcome)?;
                return Ok(Some(outcome));
            }
        }

        log::warn!("Run hit the {TIME_LIMIT}s limit without finishing");
        Ok(None)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bullet Arena (headless) starting...");

    match headless::run() {
        Ok(Some(outcome)) => log::info!(
            "{} level {} at wave {}: score {}, {} coins",
            if outcome.completed { "Cleared" } else { "Lost" },
            outcome.level_index + 1,
            outcome.wave,
            outcome.score,
            outcome.coins
        ),
        Ok(None) => {}
        Err(e) => {
            log::error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Bullet Arena core loaded");
}
