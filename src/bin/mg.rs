extern crate monthgrid as lib;

use chrono::NaiveDate;
use flexi_logger::{FileSpec, Logger};
use lib::clock::{Clock, FixedClock, SystemClock};
use lib::config::Config;
use lib::events::Dispatcher;
use lib::gesture::GestureClassifier;
use lib::navigation::{parse_month_offset, NavigationController};
use lib::ui::{render_plain, App, Theme};
use nix::sys::termios;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use termion::input::MouseTerminal;
use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;

#[derive(Debug, StructOpt)]
#[structopt(name = "mg", about = "A month grid calendar for the terminal.")]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show the month grid non-interactively"
    )]
    pub show: bool,

    #[structopt(
        long = "offset",
        default_value = "0",
        allow_hyphen_values = true,
        help = "month offset relative to the current month",
        parse(try_from_str = parse_month_offset)
    )]
    pub offset: i32,

    #[structopt(
        long = "today",
        help = "use this date (YYYY-MM-DD) as today",
        parse(try_from_str = parse_date)
    )]
    pub today: Option<NaiveDate>,

    #[structopt(
        long = "replay",
        help = "replay a pointer script and print the outcomes",
        parse(from_os_str)
    )]
    pub replay: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}

fn replay(
    path: &Path,
    config: &Config,
    controller: &mut NavigationController<Box<dyn Clock>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = lib::script::load(path)?;
    let geometry = config.panel.geometry();
    let mut classifier = GestureClassifier::new(config.long_press_ms);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for sample in &samples {
        if let Some(gesture) = classifier.feed(sample, &geometry) {
            let outcome = controller.handle_gesture(
                gesture,
                &geometry,
                config.panel.width,
                config.panel.height,
            );
            writeln!(
                out,
                "{}\t{}\t{}",
                sample.timestamp_ms,
                outcome,
                controller.grid().title()
            )?;
        }
    }

    if !classifier.is_idle() {
        log::warn!("pointer script ends with an unreleased press");
    }

    Ok(())
}

fn install_panic_hook() -> Result<(), Box<dyn std::error::Error>> {
    const STDIN: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDIN)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, &attr);
        }

        println!("monthgrid ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();
    let interactive = !args.show && args.replay.is_none();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file.clone())?)
            .print_message();
    } else if interactive {
        // stderr shares the terminal with the calendar
        logger = logger.do_not_log();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let clock: Box<dyn Clock> = match args.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock::new(config.timezone.clone())),
    };
    let mut controller = NavigationController::with_offset(clock, args.offset);

    if let Some(path) = &args.replay {
        return replay(path, &config, &mut controller);
    }

    if args.show {
        print!(
            "{}",
            render_plain(&controller, &Theme::from_config(&config.theme))
        );
        return Ok(());
    }

    install_panic_hook()?;

    let dispatcher = Dispatcher::from_config(&config);
    let stdout = io::stdout().into_raw_mode()?;
    let mut screen = AlternateScreen::from(MouseTerminal::from(stdout));

    let mut app = App::new(&config, controller);

    app.run(dispatcher, &mut screen)
}
