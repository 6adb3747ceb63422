fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the sketch editor
    sketchflow::run_app()
}
