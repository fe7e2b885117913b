//! Sandbox demo: spinning primitives, a first-person camera, and a UI
//! button
//!
//! Hold the right mouse button to look around; WASD/arrows move, Q/E go
//! down/up. Reads `sandbox.toml` next to the working directory if present.

use lumen_engine::prelude::*;

const CONFIG_PATH: &str = "sandbox.toml";

fn load_config() -> EngineConfig {
    match EngineConfig::load(CONFIG_PATH) {
        Ok(config) => {
            log::info!("loaded config from {}", CONFIG_PATH);
            config
        }
        Err(error) => {
            log::info!("using default config ({}: {})", CONFIG_PATH, error);
            EngineConfig::default()
        }
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    let mut engine = Engine::new(config)?;
    engine.run()
}
