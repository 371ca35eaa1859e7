//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use moodle_session::session::DEFAULT_REFRESH_INTERVAL;

/// Log in to a Moodle portal and keep the session alive.
///
/// Writes the session record (session cookie plus sesskey) to a JSON file
/// consumed by collaborator scripts, then refreshes the session in the
/// background until interrupted.
#[derive(Parser)]
#[command(name = "moodle-session")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Base URL of the portal
    #[arg(long, env = "MOODLE_BASE_URL")]
    pub base_url: Url,

    /// Portal login username
    #[arg(long, env = "MOODLE_USERNAME")]
    pub username: String,

    /// Portal login password (prefer the environment variable over the flag)
    #[arg(long, env = "MOODLE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Where to write the session record
    #[arg(long, default_value = "session.json")]
    pub session_file: PathBuf,

    /// Minutes between background session refresh checks (1-1440)
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs() / 60, value_parser = clap::value_parser!(u64).range(1..=1440))]
    pub refresh_minutes: u64,

    /// Exit after writing the session record instead of keeping it alive
    #[arg(long)]
    pub once: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "moodle-session",
            "--base-url",
            "https://elearning.example.ac.id",
            "--username",
            "student",
            "--password",
            "secret",
        ]
    }

    #[test]
    fn test_cli_default_args_parse_successfully() {
        let args = Args::try_parse_from(base_args()).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.refresh_minutes, 30);
        assert_eq!(args.session_file, PathBuf::from("session.json"));
        assert!(!args.once);
    }

    #[test]
    fn test_cli_refresh_default_matches_library_interval() {
        let args = Args::try_parse_from(base_args()).unwrap();
        assert_eq!(
            args.refresh_minutes * 60,
            DEFAULT_REFRESH_INTERVAL.as_secs()
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let mut argv = base_args();
        argv.push("-vv");
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_zero_refresh_interval() {
        let mut argv = base_args();
        argv.extend(["--refresh-minutes", "0"]);
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_cli_rejects_invalid_base_url() {
        let argv = vec![
            "moodle-session",
            "--base-url",
            "not a url",
            "--username",
            "u",
            "--password",
            "p",
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
