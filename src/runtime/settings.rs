use cadenza::config;

/// Load settings, falling back to defaults when the file is broken.
///
/// Runs before logging is up, so problems go straight to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("cadenza: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("cadenza: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
