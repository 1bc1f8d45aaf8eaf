//! Endless Drive entry point
//!
//! Native builds run one headless attract-mode session and log the result:
//!
//! ```text
//! endless-drive [TUNING_JSON] [SAVE_FILE]
//! ```
//!
//! The web build is driven from the page through `endless_drive::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use endless_drive::audio::LogAudio;
    use endless_drive::persistence::JsonFileStore;
    use endless_drive::platform::{Driver, HeadlessRenderer};
    use endless_drive::sim::{GameEvent, GameState};
    use endless_drive::{BestScore, Tuning};

    /// Give up after this many simulated frames (10 minutes at 60 fps)
    const MAX_FRAMES: u64 = 60 * 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Endless Drive (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(&PathBuf::from(path)),
        None => Tuning::default(),
    };
    let save_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("endless-drive-save.json"));

    let store = JsonFileStore::new(save_path);
    let best = BestScore::load(&store);
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Seed {}", seed);

    let state = GameState::new(seed, tuning).with_best(best);
    let mut driver = Driver::new(state, store, LogAudio, HeadlessRenderer::new());
    driver.input_mut().autopilot = true;

    let mut result = None;
    for frame in 0..MAX_FRAMES {
        let events = driver.frame(frame as f64 * FRAME_MS);
        if let Some(&GameEvent::SessionEnded { score, best, .. }) = events
            .iter()
            .find(|e| matches!(e, GameEvent::SessionEnded { .. }))
        {
            result = Some((score, best));
            break;
        }
    }

    match result {
        Some((score, best)) => {
            let hud = driver.renderer().last().map(|s| &s.hud);
            log::info!(
                "Session finished after {} frames: score {}, best {}",
                driver.renderer().frames(),
                score,
                best
            );
            if let Some(hud) = hud {
                log::info!("Final HUD: {} km/h, nitro {:.0}%", hud.speed_kmh, hud.nitro_percent);
            }
            println!("score {} best {}", score, best);
        }
        None => log::warn!("Session did not finish within {} frames", MAX_FRAMES),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
