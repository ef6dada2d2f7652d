//! Main application entry point.
//!
//! Parses the command line and dispatches to help, version or a `Nightfall` run.
//! Fatal errors are printed with their cause chain and end the process with a
//! failure status, even in quiet mode.

use nightfall::Nightfall;
use nightfall::args::{self, CliAction, ParsedArgs};
use nightfall::common::constants::EXIT_FAILURE;
use nightfall::common::logger::Log;
use nightfall::{log_end, log_error_exit, log_indented};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            quiet,
            verbose,
            time,
            weekday,
            festive,
            config_dir,
        } => Nightfall::new(verbose)
            .quiet(quiet)
            .at_time(time)
            .on_day(weekday)
            .festive(festive)
            .with_config_dir(config_dir)
            .run(),
    };

    if let Err(e) = result {
        Log::set_enabled(true);
        log_error_exit!("{}", e);
        for cause in e.chain().skip(1) {
            log_indented!("Caused by: {}", cause);
        }
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}
