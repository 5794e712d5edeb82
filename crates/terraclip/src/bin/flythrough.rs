//! # TERRACLIP Fly-Through
//!
//! Renders a camera flight over procedural terrain into the recording
//! backend and logs per-frame statistics.
//!
//! ```bash
//! # Built-in defaults
//! flythrough
//!
//! # From a config file, with streaming decisions logged
//! RUST_LOG=terraclip_rendering=debug flythrough crates/terraclip/config/flythrough.toml
//! ```

use std::process::ExitCode;

use terraclip::{run, FlythroughConfig, FlythroughResult, RecordingBackend};
use tracing_subscriber::EnvFilter;

fn load_config() -> FlythroughResult<FlythroughConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            tracing::info!(path = %path.to_string_lossy(), "loading configuration");
            FlythroughConfig::load(path)
        }
        None => {
            tracing::info!("no configuration given, using defaults");
            Ok(FlythroughConfig::default())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let result = load_config().and_then(|config| {
        let mut backend = RecordingBackend::new();
        let summary = run(&config, &mut backend)?;
        Ok((summary, backend.totals()))
    });

    match result {
        Ok((summary, totals)) => {
            tracing::info!(
                frames = summary.frames,
                max_draw_calls = summary.max_draw_calls,
                texels_uploaded = summary.texels_uploaded,
                full_rebuilds = summary.full_rebuilds,
                incremental_updates = summary.incremental_updates,
                rejected_uploads = totals.rejected_uploads,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "fly-through failed");
            ExitCode::FAILURE
        }
    }
}
