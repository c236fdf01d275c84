//! Cloud Roll entry point
//!
//! Natively this runs a level headlessly with scripted input and logs the
//! player's progress. In the browser the host page drives `WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use thiserror::Error;

    use cloud_roll::LevelData;
    use cloud_roll::sim::{Movement, Scene, SceneError, tick};

    const DEFAULT_TICKS: u64 = 600;
    /// Ticks between scripted jumps
    const JUMP_EVERY: u64 = 45;
    /// Ticks the jump key stays down
    const JUMP_HOLD: u64 = 3;

    #[derive(Debug, Error)]
    pub enum RunError {
        #[error("failed to read {path}: {source}")]
        Read {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error(transparent)]
        Level(#[from] cloud_roll::LevelError),
        #[error(transparent)]
        Scene(#[from] SceneError),
        #[error("tick count must be a whole number, got '{0}'")]
        BadTicks(String),
    }

    /// `cloud-roll [level.json] [ticks]`
    pub fn run(args: &[String]) -> Result<(), RunError> {
        let level = match args.first() {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| RunError::Read {
                    path: path.clone(),
                    source,
                })?;
                LevelData::from_json(&json)?
            }
            None => LevelData::builtin()?,
        };
        let ticks = match args.get(1) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| RunError::BadTicks(raw.clone()))?,
            None => DEFAULT_TICKS,
        };

        let mut scene = Scene::from_level(&level)?;
        scene.key_down("ArrowRight");
        log::info!("Running '{}' for {} ticks", scene.name, ticks);

        let mut last_movement = scene.status.movement.clone();
        for n in 0..ticks {
            script_input(&mut scene, n);
            let outcome = tick(&mut scene)?;
            scene.advance_animations(scene.tuning.tick_interval_ms);

            if std::mem::discriminant(&scene.status.movement)
                != std::mem::discriminant(&last_movement)
            {
                log::info!("Tick {}: movement {}", scene.ticks, describe(&scene.status.movement));
                last_movement = scene.status.movement.clone();
            }
            if n % 50 == 0 {
                if let Some(player) = scene.player() {
                    log::info!(
                        "Tick {}: at ({:.1}, {:.1}) velocity ({:.2}, {:.2}) contact {}",
                        scene.ticks,
                        player.circle().center.x,
                        player.circle().center.y,
                        player.velocity.delta.x,
                        player.velocity.delta.y,
                        outcome.contact
                    );
                }
            }
        }

        log::info!(
            "Finished after {:.1}s of game time: {} deaths, mode {:?}",
            scene.elapsed_ms / 1000.0,
            scene.status.deaths,
            scene.status.mode
        );
        Ok(())
    }

    fn script_input(scene: &mut Scene, n: u64) {
        match n % JUMP_EVERY {
            0 => scene.key_down("Space"),
            JUMP_HOLD => scene.key_up("Space"),
            _ => {}
        }
    }

    fn describe(movement: &Movement) -> &'static str {
        match movement {
            Movement::Free => "free",
            Movement::Riding(_) => "riding",
            Movement::Twine => "twine",
            Movement::Exiting { .. } => "exiting",
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cloud Roll (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = headless::run(&args) {
        log::error!("{}", err);
        eprintln!("cloud-roll: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is cloud_roll::platform::web::WebGame, this is just to satisfy the compiler
}
