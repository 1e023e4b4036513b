mod args;

use std::process::ExitCode;

use clap::Parser;

use media::{ExtractionResult, Stage, SystemRunner};

use args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    #[cfg(debug_assertions)]
    {
        use util::debug_log;
        if args.no_debug_logging {
            debug_log::disable();
        } else if args.debug_error_log_panics {
            debug_log::panic_on_errors::enable();
        }
    }

    let runner = SystemRunner::new();
    let options = match args.to_options(&runner) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let verbose = options.verbose();

    let mut printable = String::new();
    let result = media::extract_with_progress(&options, &runner, |stage| match stage {
        Stage::Assembling if verbose => eprintln!("Assembling ffmpeg command..."),
        Stage::CommandReady(command) => printable = command.to_string(),
        Stage::DryRun => {
            println!("{printable}");
            if verbose {
                eprintln!("(dry-run) Not executing ffmpeg.");
            }
        }
        Stage::Executing if verbose => eprintln!("Executing: {printable}"),
        _ => {}
    });

    match result {
        Ok(_) if options.dry_run() => ExitCode::SUCCESS,
        Ok(ExtractionResult {
            exit_code: 0,
            frame_count,
            ..
        }) => {
            println!(
                "Wrote {frame_count} frames to {}",
                options.output_dir().display()
            );
            ExitCode::SUCCESS
        }
        Ok(ExtractionResult { exit_code, .. }) => {
            util::debug_log_warning!("ffmpeg returned non-zero exit code: {exit_code}");
            ExitCode::from(u8::try_from(exit_code).unwrap_or(1))
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
