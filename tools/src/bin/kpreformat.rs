//! # `kpreformat`
//!
//! Reformat all knapsack instances in a directory from the verbose knapPI
//! layout (one `value weight` pair per line) into the compact three-line
//! layout. Outputs are written to `<DIR>/reformatted/` with unchanged file
//! names.

use std::{
    error::Error,
    io::{self, IsTerminal, Write},
    iter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use kpformat::convert::{self, Event, Options, Summary};
use termcolor::{BufferWriter, Color, ColorSpec, WriteColor};

struct Cli {
    dir: PathBuf,
    opts: Options,
    quiet: bool,
    stdout: BufferWriter,
    stderr: BufferWriter,
}

impl Cli {
    fn init() -> Self {
        let args = Args::parse();
        Self {
            dir: args.dir,
            opts: Options {
                out_dir_name: args.out_dir_name,
                keep_going: args.keep_going,
                verify: args.verify,
            },
            quiet: args.quiet,
            stdout: BufferWriter::stdout(color_choice(
                args.color.color,
                io::stdout().is_terminal(),
            )),
            stderr: BufferWriter::stderr(color_choice(
                args.color.color,
                io::stderr().is_terminal(),
            )),
        }
    }

    fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        Self::print_prefixed(&self.stdout, Color::Blue, "info", msg)
            .expect("failed to write to stdout");
    }

    fn warning(&self, msg: &str) {
        Self::print_prefixed(&self.stderr, Color::Yellow, "warning", msg)
            .expect("failed to write to stderr");
    }

    fn error(&self, err: &anyhow::Error) {
        Self::print_prefixed(&self.stderr, Color::Red, "error", &format!("{err:#}"))
            .expect("failed to write to stderr");
    }

    fn print_prefixed(
        writer: &BufferWriter,
        color: Color,
        prefix: &str,
        msg: &str,
    ) -> io::Result<()> {
        let mut buffer = writer.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
        write!(&mut buffer, "{prefix}")?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(&mut buffer, ": ")?;
        buffer.reset()?;
        writeln!(&mut buffer, "{msg}")?;
        writer.print(&buffer)
    }

    fn event(&self, event: Event<'_>) {
        match event {
            Event::Processing(path) => self.info(&format!("processing file: {}", path.display())),
            Event::Failed { error, .. } => {
                let chain: Vec<_> = iter::successors(Some(error as &dyn Error), |&err| err.source())
                    .map(ToString::to_string)
                    .collect();
                self.warning(&chain.join(": "));
            }
            Event::Written { .. } | Event::Skipped(_) => (),
        }
    }

    fn print_summary(&self, summary: &Summary, out_dir: &Path) {
        self.info(&format!(
            "converted {} instances into {}",
            summary.converted.len(),
            out_dir.display()
        ));
        for (path, _) in &summary.failed {
            self.warning(&format!("{} was not converted", path.display()));
        }
    }
}

fn color_choice(choice: concolor_clap::ColorChoice, is_terminal: bool) -> termcolor::ColorChoice {
    match choice {
        concolor_clap::ColorChoice::Always => termcolor::ColorChoice::Always,
        concolor_clap::ColorChoice::Never => termcolor::ColorChoice::Never,
        concolor_clap::ColorChoice::Auto => {
            if is_terminal {
                termcolor::ColorChoice::Auto
            } else {
                termcolor::ColorChoice::Never
            }
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The directory containing the instance files to reformat
    dir: PathBuf,
    /// The name of the output directory, created inside `DIR`
    #[arg(long, default_value_t = String::from(convert::DEFAULT_OUT_DIR), value_parser = parse_out_dir_name)]
    out_dir_name: String,
    /// Continue with the remaining files if an instance fails to convert
    #[arg(long, short = 'k')]
    keep_going: bool,
    /// Read back every written file and compare it to the source instance
    #[arg(long)]
    verify: bool,
    /// Do not print progress information
    #[arg(long, short = 'q')]
    quiet: bool,
    #[command(flatten)]
    color: concolor_clap::Color,
}

fn parse_out_dir_name(name: &str) -> Result<String, String> {
    if convert::is_valid_out_dir_name(name) {
        Ok(name.to_owned())
    } else {
        Err(format!(
            "'{name}' is not a plain directory name (no separators, `.` or `..`)"
        ))
    }
}

macro_rules! handle_error {
    ($res:expr, $cli:expr) => {{
        match $res {
            Ok(val) => val,
            Err(err) => {
                $cli.error(&err);
                anyhow::bail!(err)
            }
        }
    }};
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::init();

    let out_dir = handle_error!(
        convert::out_dir(&cli.dir, &cli.opts).context("invalid output directory"),
        cli
    );
    let summary = handle_error!(
        convert::reformat_dir(&cli.dir, &cli.opts, |event| cli.event(event))
            .with_context(|| format!("failed to reformat instances in {}", cli.dir.display())),
        cli
    );
    cli.print_summary(&summary, &out_dir);

    anyhow::ensure!(
        summary.is_success(),
        "{} of {} instances failed to convert",
        summary.failed.len(),
        summary.failed.len() + summary.converted.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Args;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["kpreformat", "instances_01_KP/low_dimensional"]).unwrap();
        assert_eq!(args.out_dir_name, "reformatted");
        assert!(!args.keep_going);
        assert!(!args.verify);
        assert!(!args.quiet);
    }

    #[test]
    fn out_dir_name() {
        let args =
            Args::try_parse_from(["kpreformat", "instances", "--out-dir-name", "compact"]).unwrap();
        assert_eq!(args.out_dir_name, "compact");
        for name in ["", ".", "..", "a/b"] {
            assert!(
                Args::try_parse_from(["kpreformat", "instances", "--out-dir-name", name]).is_err(),
                "{name}"
            );
        }
    }

    #[test]
    fn dir_required() {
        assert!(Args::try_parse_from(["kpreformat"]).is_err());
    }
}
