#[allow(unused)]
#[cfg(all(not(test), not(feature = "defmt"), not(feature = "test-utils")))]
mod silent {
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }
}

#[cfg(all(not(test), not(feature = "test-utils"), feature = "defmt"))]
mod defmt {
    /// Log debug messages through [defmt::debug].
    ///
    /// Without the `defmt` feature the arguments are evaluated and dropped. On the host
    /// (tests or `test-utils`) the message goes to stderr, so only the `{}`/`{:?}` subset
    /// shared by `defmt` and `core::fmt` may be used.
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {
            defmt::debug!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {
            defmt::info!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {
            defmt::warn!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {
            defmt::error!($($arg,)*)
        };
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[macro_use]
mod host {
    /// Key code from a mnemonic; panics on unknown names so typos in tests show up.
    #[macro_export]
    macro_rules! kc {
        ($a:expr) => {
            match split_common::keycodes::key_code($a) {
                Some(kc) => kc,
                None => panic!("Unknown key mnemonic: {:?}", $a),
            }
        };
    }

    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {{
            extern crate std;
            std::eprintln!("DEBUG: {}", format_args!($($arg,)*))
        }};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {{
            extern crate std;
            std::eprintln!("INFO: {}", format_args!($($arg,)*))
        }};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {{
            extern crate std;
            std::eprintln!("WARN: {}", format_args!($($arg,)*))
        }};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {{
            extern crate std;
            if cfg!(test) {
                panic!("{}", format_args!($($arg,)*));
            } else {
                std::eprintln!(
                    "\nERROR: at ./{}:{}:{}:\n{}",
                    file!(),
                    line!(),
                    column!(),
                    format_args!($($arg,)*)
                );
            }
        }};
    }
}
