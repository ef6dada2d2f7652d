//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Option values (the query time and the
//! weekday override) are validated here, so a malformed value never reaches the
//! core.

use chrono::{NaiveTime, Weekday};

use crate::config::parse_weekday;
use crate::time::source::parse_time;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Show the scheduled color, or run the festive animation
    Run {
        quiet: bool,
        verbose: bool,
        /// Explicit query time instead of the local clock
        time: Option<NaiveTime>,
        /// Weekday used to choose between the weekday and weekend schedules
        weekday: Option<Weekday>,
        festive: bool,
        config_dir: Option<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit with failure
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut quiet = false;
        let mut verbose = false;
        let mut festive = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut invalid_arg_found = false;
        let mut time: Option<NaiveTime> = None;
        let mut weekday: Option<Weekday> = None;
        let mut config_dir: Option<String> = None;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" => display_version = true,
                "--quiet" | "-q" => quiet = true,
                "--verbose" | "-v" => verbose = true,
                "--festive" | "-f" => festive = true,
                "--time" | "-t" => match args_vec.get(i + 1) {
                    Some(value) => {
                        match parse_time(value) {
                            Ok(parsed) => time = Some(parsed),
                            Err(e) => {
                                log_warning!("{}", e);
                                invalid_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing value for {arg_str} (expected HH:MM:SS)");
                        invalid_arg_found = true;
                    }
                },
                "--day" | "-d" => match args_vec.get(i + 1) {
                    Some(value) => {
                        match parse_weekday(value) {
                            Ok(parsed) => weekday = Some(parsed),
                            Err(e) => {
                                log_warning!("{}", e);
                                invalid_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing value for {arg_str} (expected a weekday)");
                        invalid_arg_found = true;
                    }
                },
                "--config" | "-c" => match args_vec.get(i + 1) {
                    Some(value) => {
                        config_dir = Some(value.clone());
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing directory for {arg_str}");
                        invalid_arg_found = true;
                    }
                },
                _ => {
                    if arg_str.starts_with('-') {
                        log_warning!("Unknown option: {arg_str}");
                    } else {
                        log_warning!("Unexpected argument: {arg_str}");
                    }
                    invalid_arg_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if invalid_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else {
            CliAction::Run {
                quiet,
                verbose,
                time,
                weekday,
                festive,
                config_dir,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("nightfall [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --day <weekday>    Pick the schedule for this weekday (e.g. fri)");
    log_indented!("-f, --festive          Cycle through random festive colors until stopped");
    log_indented!("-h, --help             Print help information");
    log_indented!("-q, --quiet            Print nothing");
    log_indented!("-t, --time <HH:MM:SS>  Show the color for this time instead of now");
    log_indented!("-v, --verbose          Show interpolation details and device errors");
    log_indented!("-V, --version          Print version information");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_defaults() -> CliAction {
        CliAction::Run {
            quiet: false,
            verbose: false,
            time: None,
            weekday: None,
            festive: false,
            config_dir: None,
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["nightfall"]);
        assert_eq!(parsed.action, run_defaults());
    }

    #[test]
    fn test_parse_quiet_and_verbose() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "-q", "--verbose"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                quiet: true,
                verbose: true,
                time: None,
                weekday: None,
                festive: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_time_flag() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "-t", "21:30:00"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                quiet: false,
                verbose: false,
                time: NaiveTime::from_hms_opt(21, 30, 0),
                weekday: None,
                festive: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_malformed_time() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "--time", "9:30pm"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_time_missing_value() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "--time"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_day_flag() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "--day", "Friday"]);
        match parsed.action {
            CliAction::Run { weekday, .. } => assert_eq!(weekday, Some(Weekday::Fri)),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_day() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "-d", "funday"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_festive_with_config() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "-f", "--config", "/tmp/lights"]);
        match parsed.action {
            CliAction::Run {
                festive,
                config_dir,
                ..
            } => {
                assert!(festive);
                assert_eq!(config_dir.as_deref(), Some("/tmp/lights"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_parse_help_flags() {
        for flag in ["--help", "-h"] {
            let parsed = ParsedArgs::parse(vec!["nightfall", flag]);
            assert_eq!(parsed.action, CliAction::ShowHelp);
        }
    }

    #[test]
    fn test_parse_version_flags() {
        for flag in ["--version", "-V"] {
            let parsed = ParsedArgs::parse(vec!["nightfall", flag]);
            assert_eq!(parsed.action, CliAction::ShowVersion);
        }
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "--bogus", "--version", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "--geo"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_stray_argument() {
        let parsed = ParsedArgs::parse(vec!["nightfall", "tonight"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }
}
