// Command-line entry point for typescope.

use anyhow::Result;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use typescope::application::ReportUsecase;
use typescope::infrastructure::{TreeSitterJavaParser, WriterSink};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Java source file to analyse
    path: PathBuf,

    /// Print the resolved dependencies of each class instead of the type report
    #[arg(long)]
    deps: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); logs go to stderr
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let parser = TreeSitterJavaParser::new();
    let usecase = ReportUsecase { parser: &parser };

    let stdout = io::stdout();
    let mut sink = WriterSink::new(stdout.lock());

    if cli.deps {
        usecase.run_deps(&cli.path, &mut sink)?;
    } else {
        usecase.run(&cli.path, &mut sink)?;
    }
    sink.flush()?;

    Ok(())
}
