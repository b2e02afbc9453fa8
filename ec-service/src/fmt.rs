//! Logging macro implementations
//!
//! Every level macro forwards to `__ec_log!`, whose backend is picked by the `log` or `defmt` feature
//! of this crate. With neither feature enabled the arguments are only borrowed so call sites still compile.

#[cfg(all(feature = "log", feature = "defmt", not(doc)))]
compile_error!("features `log` and `defmt` are mutually exclusive");

#[cfg(all(not(doc), feature = "defmt"))]
mod defmt {
    #[doc(hidden)]
    #[macro_export]
    #[collapse_debuginfo(yes)]
    macro_rules! __ec_log {
        ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
            {
                ::defmt::$level!($s $(, $x)*);
            }
        };
    }
}

#[cfg(all(not(doc), feature = "log"))]
mod log {
    #[doc(hidden)]
    #[macro_export]
    #[collapse_debuginfo(yes)]
    macro_rules! __ec_log {
        ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
            {
                ::log::$level!($s $(, $x)*);
            }
        };
    }
}

// Provide this implementation for `cargo doc`
#[cfg(any(doc, not(any(feature = "defmt", feature = "log"))))]
mod none {
    #[doc(hidden)]
    #[macro_export]
    #[collapse_debuginfo(yes)]
    macro_rules! __ec_log {
        ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
            {
                let _ = ($( & $x ),*);
            }
        };
    }
}

/// Logs a trace message using the underlying logger
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        $crate::__ec_log!(trace, $s $(, $x)*)
    };
}

/// Logs a debug message using the underlying logger
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        $crate::__ec_log!(debug, $s $(, $x)*)
    };
}

/// Logs an info message using the underlying logger
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        $crate::__ec_log!(info, $s $(, $x)*)
    };
}

/// Logs a warning using the underlying logger
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        $crate::__ec_log!(warn, $s $(, $x)*)
    };
}

/// Logs an error using the underlying logger
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        $crate::__ec_log!(error, $s $(, $x)*)
    };
}
