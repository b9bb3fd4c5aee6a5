//! Macros for output and assertions

/// This should be used for every write to stdout.
macro_rules! puts {
    ($($arg:tt)*) => ({
        use std::io::Write;
        match write!(std::io::stdout(), $($arg)*) {
            Ok(()) => (),
            // Don't panic on SIGPIPE.
            Err(ref err) if err.kind() == std::io::ErrorKind::BrokenPipe => std::process::exit(141),
            Err(ref err) => panic!("{}", err),
        };
    })
}

/// Print to stdout, prefixed by "c ".
macro_rules! comment {
    ($($arg:tt)*) => ({
        puts!("c ");
        puts!($($arg)*);
        puts!("\n");
    })
}

/// Print to stdout with yellow font color.
macro_rules! as_warning {
    ($what:expr) => {{
        if crate::output::is_a_tty() {
            puts!("\x1b[33;1m");
        }
        $what;
        if crate::output::is_a_tty() {
            puts!("\x1b[0m");
        }
    }};
}

/// Print to stdout with red font color.
macro_rules! as_error {
    ($what:expr) => {{
        if crate::output::is_a_tty() {
            puts!("\x1b[31;1m");
        }
        $what;
        if crate::output::is_a_tty() {
            puts!("\x1b[0m");
        }
    }};
}

/// Report a fatal error and exit.
macro_rules! die {
    ($($arg:tt)*) => ({
        as_error!({
            puts!($($arg)*);
            puts!("\n");
        });
        std::process::exit(1)
    })
}

/// Native assertions cannot be disabled, that's why we prefer this macro.
macro_rules! invariant {
    ($($arg:tt)*) => ({
        if crate::config::CHECK_INVARIANTS {
            assert!($($arg)*);
        }
    })
}

/// Like invariant, but for preconditions.
macro_rules! requires {
    ($($arg:tt)*) => ({
        if crate::config::CHECK_PRECONDITIONS {
            assert!($($arg)*);
        }
    })
}
