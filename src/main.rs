use particle_fx::config::AppConfig;

fn main() {
    let config = AppConfig::load_or_default();
    if let Err(e) = particle_fx::core::Engine::run(config) {
        eprintln!("Particle demo failed: {}", e);
        std::process::exit(1);
    }
}
