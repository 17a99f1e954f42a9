//! Video Player - entry point
//!
//! Usage: video-player <video_file>

use video_player::cli::Args;
use video_player::error::FAILURE_EXIT_CODE;
use video_player::telemetry::{init_logging, LogConfig};
use video_player::PlayerConfig;

fn main() {
    // Usage errors exit before any provider is touched
    let args = Args::parse_or_exit();

    if let Err(e) = init_logging(&LogConfig::default()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = video_player::run(&args.video_file, &PlayerConfig::default()) {
        eprintln!("{}", e);
        std::process::exit(FAILURE_EXIT_CODE);
    }
}
