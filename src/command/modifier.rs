//! Modifier options
//!
//! Optional named flags appended to a command. A valued option renders as
//! `NAME VALUE`, a bare option as `NAME`:
//!
//! ```text
//! Px(3000)  ->  PX 3000
//! Nx        ->  NX
//! ```

use std::fmt;

use super::CommandArg;

/// A named command modifier
pub trait Modifier: CommandArg {
    /// Option keyword as sent on the wire
    const NAME: &'static str;

    /// Whether the option carries a value
    const VALUED: bool;
}

macro_rules! valued_modifier {
    ($(#[$meta:meta])* $name:ident($ty:ty) = $token:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(pub $ty);

        impl Modifier for $name {
            const NAME: &'static str = $token;
            const VALUED: bool = true;
        }

        impl CommandArg for $name {
            fn write_args(&self, argv: &mut Vec<String>) {
                argv.push(Self::NAME.to_string());
                self.0.write_args(argv);
            }

            fn arg_count(&self) -> usize {
                1 + self.0.arg_count()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut argv = Vec::with_capacity(2);
                self.write_args(&mut argv);
                f.write_str(&argv.join(" "))
            }
        }
    };
}

macro_rules! bare_modifier {
    ($(#[$meta:meta])* $name:ident = $token:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl Modifier for $name {
            const NAME: &'static str = $token;
            const VALUED: bool = false;
        }

        impl CommandArg for $name {
            fn write_args(&self, argv: &mut Vec<String>) {
                argv.push(Self::NAME.to_string());
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Self::NAME)
            }
        }
    };
}

// =============================================================================
// SET Options
// =============================================================================

valued_modifier!(
    /// Expire after the given number of seconds
    Ex(i64) = "EX"
);
valued_modifier!(
    /// Expire after the given number of milliseconds
    Px(i64) = "PX"
);
valued_modifier!(
    /// Expire at the given unix time (seconds)
    ExAt(i64) = "EXAT"
);
valued_modifier!(
    /// Expire at the given unix time (milliseconds)
    PxAt(i64) = "PXAT"
);
bare_modifier!(
    /// Only set if the key does not exist
    Nx = "NX"
);
bare_modifier!(
    /// Only set if the key already exists
    Xx = "XX"
);
bare_modifier!(
    /// Keep the existing time to live
    KeepTtl = "KEEPTTL"
);
bare_modifier!(
    /// Return the previous value
    Get = "GET"
);

// =============================================================================
// Scan / Range Options
// =============================================================================

valued_modifier!(
    /// Glob pattern filter for SCAN-family commands
    Match(String) = "MATCH"
);
valued_modifier!(
    /// Batch size hint for SCAN-family commands
    Count(usize) = "COUNT"
);
bare_modifier!(WithScores = "WITHSCORES");
