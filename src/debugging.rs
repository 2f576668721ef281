/// The environmental variable holding a log filter, like `introspection=trace`.
pub const LOG_ENV_VAR: &str = "INTROSPECT_LOG";

/// Install the log subscriber and panic hook. Logs go to standard error so standard output stays parseable.
pub fn init(args: &crate::cli::Cli) {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(get_filter(args))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    std::panic::set_hook(Box::new(panic_hook));
}

/// Get the filter for log output. The [`LOG_ENV_VAR`] environmental variable takes priority over CLI arguments.
fn get_filter(args: &crate::cli::Cli) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    if std::env::var_os(LOG_ENV_VAR).is_some() {
        if args.verbose.is_present() {
            eprintln!("WARNING: Provided verbosity arguments were ignored as environmental variable {LOG_ENV_VAR} is set");
        }
        match EnvFilter::try_from_env(LOG_ENV_VAR) {
            Ok(filter) => return filter,
            Err(error) => eprintln!("WARNING: Ignoring invalid {LOG_ENV_VAR} filter: {error}"),
        }
    }

    match args.verbose.tracing_level() {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::new("off"),
    }
}

fn payload_as_str<'a>(info: &'a std::panic::PanicHookInfo<'_>) -> Option<&'a str> {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some(s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s)
    } else {
        None
    }
}

fn panic_hook(info: &std::panic::PanicHookInfo) {
    use std::backtrace::*;
    use std::panic::Location;

    let backtrace = Backtrace::capture();
    let location = info.location().map(Location::to_string);
    let message = payload_as_str(info);
    let thread = std::thread::current();

    tracing::error!(
        location = location,
        backtrace = match backtrace.status() {
            BacktraceStatus::Captured => format!("{backtrace}"),
            BacktraceStatus::Disabled => "disabled (run with RUST_BACKTRACE=1)".to_string(),
            BacktraceStatus::Unsupported => "unsupported".to_string(),
            opt => format!("unknown (unrecognized status {opt:?})"),
        },
        "{} panicked at {}",
        thread.name()
            .map(|name| format!("thread '{name}'"))
            .unwrap_or("unnamed thread".to_string()),
        message.unwrap_or("<no message>")
    );

    eprintln!("introspect panicked: {}", message.unwrap_or("<no message>"));
    std::process::exit(101)
}
