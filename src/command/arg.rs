//! Command arguments
//!
//! Every typed argument is rendered to text with its `Display` form before it
//! is substituted into a command template.

/// A value that contributes one or more tokens to a command's argument list
pub trait CommandArg {
    /// Append this value's tokens to `argv`
    fn write_args(&self, argv: &mut Vec<String>);

    /// Number of tokens `write_args` appends
    fn arg_count(&self) -> usize {
        1
    }
}

impl<T: CommandArg + ?Sized> CommandArg for &T {
    fn write_args(&self, argv: &mut Vec<String>) {
        (**self).write_args(argv)
    }

    fn arg_count(&self) -> usize {
        (**self).arg_count()
    }
}

macro_rules! display_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CommandArg for $ty {
                fn write_args(&self, argv: &mut Vec<String>) {
                    argv.push(self.to_string());
                }
            }
        )*
    };
}

display_arg!(
    str, String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl<A: CommandArg, B: CommandArg> CommandArg for (A, B) {
    fn write_args(&self, argv: &mut Vec<String>) {
        self.0.write_args(argv);
        self.1.write_args(argv);
    }

    fn arg_count(&self) -> usize {
        self.0.arg_count() + self.1.arg_count()
    }
}

impl<T: CommandArg> CommandArg for [T] {
    fn write_args(&self, argv: &mut Vec<String>) {
        for item in self {
            item.write_args(argv);
        }
    }

    fn arg_count(&self) -> usize {
        self.iter().map(CommandArg::arg_count).sum()
    }
}

impl<T: CommandArg> CommandArg for Vec<T> {
    fn write_args(&self, argv: &mut Vec<String>) {
        self.as_slice().write_args(argv)
    }

    fn arg_count(&self) -> usize {
        self.as_slice().arg_count()
    }
}

impl<T: CommandArg> CommandArg for Option<T> {
    fn write_args(&self, argv: &mut Vec<String>) {
        if let Some(value) = self {
            value.write_args(argv);
        }
    }

    fn arg_count(&self) -> usize {
        self.as_ref().map_or(0, CommandArg::arg_count)
    }
}

/// Render a single argument list to its tokens
pub fn to_args(args: &[&dyn CommandArg]) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.iter().map(|arg| arg.arg_count()).sum());
    for arg in args {
        arg.write_args(&mut argv);
    }
    argv
}
