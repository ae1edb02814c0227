//! Command handlers, one module per subcommand.
//!
//! Each handler takes its parsed arguments plus the output streams and
//! returns `Result<(), CliError>`; `run` turns that into an exit code.

pub mod best;
pub mod cfg;
pub mod deal;
pub mod play;
pub mod sim;
pub mod stats;

pub use best::handle_best_command;
pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::{PlayOptions, handle_play_command};
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;

use crate::config::{self, Config};
use crate::error::CliError;

/// Resolved configuration with an optional `--kinds` override applied.
pub(crate) fn load_config(kinds: Option<&str>) -> Result<Config, CliError> {
    let mut cfg = config::load()?;
    if let Some(list) = kinds {
        cfg.kinds = config::parse_kind_list(list);
        config::validate(&cfg)?;
    }
    Ok(cfg)
}
