//! `cfg`: the resolved configuration with the source of every value.
//!
//! ```json
//! {
//!   "seed": { "value": null, "source": "default" },
//!   "reveal_delay_ms": { "value": 300, "source": "default" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "reveal_delay_ms": {
            "value": config.reveal_delay_ms,
            "source": sources.reveal_delay_ms,
        },
        "conceal_delay_ms": {
            "value": config.conceal_delay_ms,
            "source": sources.conceal_delay_ms,
        },
        "score_file": {
            "value": config.score_file,
            "source": sources.score_file,
        },
        "kinds": {
            "value": config.kinds,
            "source": sources.kinds,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
