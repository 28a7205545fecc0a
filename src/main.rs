fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    node_editor::run_app()
}
