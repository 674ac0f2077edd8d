use std::path::PathBuf;

use camcalib::Options;

/// Environment variable naming a JSON options file.
const CONFIG_ENV: &str = "CAMCALIB_CONFIG";

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

/// Loads options from `path`, falling back to defaults when absent or unreadable.
fn load_options(path: Option<PathBuf>) -> Options {
    let Some(path) = path else {
        return Options::default();
    };
    match Options::load(&path) {
        Ok(options) => options,
        Err(error) => {
            log::warn!(
                "could not load options from {}: {error}; using defaults",
                path.display()
            );
            Options::default()
        }
    }
}

fn main() {
    camcalib::init_logging();

    if let Err(error) = camcalib::run(load_options(config_path())) {
        log::error!("camcalib failed: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_uses_defaults() {
        assert_eq!(load_options(None).gizmo_scale, Options::default().gizmo_scale);
    }

    #[test]
    fn test_unreadable_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("camcalib_missing_options.json");
        std::fs::remove_file(&path).ok();
        assert_eq!(load_options(Some(path)).gizmo_scale, Options::default().gizmo_scale);
    }

    #[test]
    fn test_options_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("camcalib_main_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "gizmo_scale": 2.0 }"#).unwrap();
        let options = load_options(Some(path.clone()));
        std::fs::remove_file(&path).ok();
        assert_eq!(options.gizmo_scale, 2.0);
    }
}
