//! Command-line arguments

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::FAILURE_EXIT_CODE;

/// Play a video file in an 800x600 window.
///
/// Keys: Space toggles audio pause, Left/Right seek by ten frames,
/// Escape or closing the window quits.
#[derive(Debug, Parser)]
#[command(name = "video-player", version, about)]
pub struct Args {
    /// Video file to play
    pub video_file: PathBuf,
}

impl Args {
    /// Parse the process arguments, exiting on usage errors
    ///
    /// Wrong argument counts print the usage to stderr and exit with
    /// [`FAILURE_EXIT_CODE`]; `--help` and `--version` exit successfully.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(args) => args,
            Err(err) => {
                let code = match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => FAILURE_EXIT_CODE,
                };
                // clap routes usage errors to stderr and help to stdout
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_argument_is_accepted() {
        let args = Args::try_parse_from(["video-player", "clip.mp4"]).unwrap();
        assert_eq!(args.video_file, PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let err = Args::try_parse_from(["video-player"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_extra_argument_is_usage_error() {
        let err = Args::try_parse_from(["video-player", "a.mp4", "b.mp4"]).unwrap_err();
        assert!(err.use_stderr());
        assert!(err.to_string().contains("b.mp4"));
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Args::try_parse_from(["video-player", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }
}
