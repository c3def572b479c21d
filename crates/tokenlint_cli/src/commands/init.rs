//! Init command implementation

use std::io::Write;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use super::lint::CONFIG_FILES;

const DEFAULT_CONFIG: &str = r##"{
  // Design tokens: a DTCG tree, a record of trees keyed by theme,
  // or a list of allowed literals and /regex/ patterns.
  "tokens": {
    "color": {
      "$type": "color",
      "brand": { "$value": "#0050ff" }
    }
  },
  "rules": {
    "design-token/colors": "error",
    "design-token/spacing": "error",
    "design-token/duration": "warn",
    "design-system/deprecation": "warn",
    "design-system/no-inline-styles": "off",
    "design-token/no-unused-tokens": "off"
  },
  "patterns": ["src"],
  "cache": true
}
"##;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        match options.open(&config_path) {
            Ok(mut file) => {
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
