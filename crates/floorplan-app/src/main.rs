//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting floorplan");

    if let Err(e) = floorplan_app::run() {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
