/// Logs an error, prints it to standard error, and exits with a failure status.
macro_rules! ferror {
    ($($t: tt)*) => {
        {
            let message = format!($($t)*);
            tracing::error!("{message}");
            eprintln!("{message}");
            std::process::exit(1)
        }
    }
}

pub(crate) use ferror;
