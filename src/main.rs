mod app;
mod command;
mod config;
mod consts;
mod game;
mod store;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::game::{Game, Session};
use crate::store::JsonStore;
use anyhow::{bail, Context};
use env_logger::{Builder, Env, Target};
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: snake-levels [-u|--user NAME] [-c|--config PATH]

Play snake, one level at a time, picking up where you left off.

Options:
  -c, --config PATH   Read configuration from PATH
  -u, --user NAME     Play as NAME instead of being asked
  -h, --help          Show this help message and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run {
        user: Option<String>,
        config: Option<PathBuf>,
    },
    Help,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut user = None;
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('u') | Arg::Long("user") => user = Some(parser.value()?.string()?),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { user, config })
    }
}

fn main() -> ExitCode {
    let args = match Arguments::from_parser(Parser::from_env()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("snake-levels: {e}");
            eprint!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    match args {
        Arguments::Help => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Arguments::Run { user, config } => match setup(user, config.as_deref()) {
            Ok(game) => {
                let terminal = ratatui::init();
                let r = App::new(game).run(terminal);
                ratatui::restore();
                log::info!("Exiting");
                io_exit(r)
            }
            Err(e) => {
                eprintln!("snake-levels: {e:?}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Load the configuration, start logging, and resume the user's session
fn setup(user: Option<String>, config_path: Option<&Path>) -> anyhow::Result<Game> {
    let config = match config_path {
        Some(p) => Config::load(p, false),
        None => Config::default_path().and_then(|p| Config::load(&p, true)),
    }
    .context("failed to load configuration")?;
    init_logging(&config.log_file()?)?;
    let user = match user {
        Some(u) => check_user(&u)?,
        None => prompt_user(io::stdin().lock(), io::stdout())?,
    };
    let store = JsonStore::new(config.save_file()?);
    log::info!("Using save file {}", store.path().display());
    let session = Session::resume(user, store, config.grid.size(), rand::rng());
    Ok(Game::new(session))
}

/// Send log messages to `path`, as the terminal belongs to the game.  The
/// level defaults to `info` and can be changed with `RUST_LOG`.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn check_user(user: &str) -> anyhow::Result<String> {
    let user = user.trim();
    if user.is_empty() {
        bail!("user name cannot be empty");
    }
    Ok(user.to_owned())
}

/// Ask for a user name until a non-empty one is given
fn prompt_user<R: BufRead, W: Write>(mut input: R, mut output: W) -> anyhow::Result<String> {
    loop {
        write!(output, "User name: ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no user name given");
        }
        match check_user(&line) {
            Ok(user) => return Ok(user),
            Err(e) => writeln!(output, "{e}")?,
        }
    }
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal I/O failed: {e}");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
