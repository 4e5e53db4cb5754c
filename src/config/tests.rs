use super::load::{default_config_path, default_store_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_store_path_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_store_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local/share")
            .join("cadenza")
            .join("store.json")
    );
}

#[test]
fn defaults_validate() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.enrichment.placeholder_artist, "Unknown Artist");
    assert!(s.playback.auto_advance);
    assert!(!s.playback.shuffle_on_load);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.enrichment.timeout_secs = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.enrichment.base_url = "not a url".into();
    assert!(s.validate().unwrap_err().contains("enrichment.base_url"));

    let mut s = Settings::default();
    s.library.extensions = vec!["  ".into()];
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
music_dir = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
display_fields = ["filename"]
display_separator = "::"

[store]
path = "/tmp/cadenza/store.json"

[enrichment]
base_url = "http://localhost:9999"
placeholder_artist = "Nobody"
timeout_secs = 3

[playback]
shuffle_on_load = true
auto_advance = false

[logging]
filter = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__ENRICHMENT__TIMEOUT_SECS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.music_dir, Some("/srv/music".into()));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.display_fields, vec![TrackDisplayField::Filename]);
    assert_eq!(s.library.display_separator, "::");
    assert_eq!(s.store_path(), std::path::PathBuf::from("/tmp/cadenza/store.json"));
    assert_eq!(s.enrichment.base_url, "http://localhost:9999");
    assert_eq!(s.enrichment.placeholder_artist, "Nobody");
    assert_eq!(s.enrichment.timeout_secs, 3);
    // untouched keys keep their defaults
    assert_eq!(s.enrichment.lyrics_base_url, "https://api.lyrics.ovh");
    assert!(s.playback.shuffle_on_load);
    assert!(!s.playback.auto_advance);
    assert_eq!(s.logging.filter, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[enrichment]
timeout_secs = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__ENRICHMENT__TIMEOUT_SECS", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.enrichment.timeout_secs, 5);
}

#[test]
fn settings_serialize_to_toml() {
    let s = Settings::default();
    let text = toml::to_string_pretty(&s).unwrap();
    assert!(text.contains("[enrichment]"));
    assert!(text.contains("placeholder_artist = \"Unknown Artist\""));
    assert!(!text.contains("music_dir"));
}
