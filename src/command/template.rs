//! Command templates
//!
//! A template is the reusable skeleton of a command: the command name
//! followed by one placeholder per declared argument.
//!
//! ```text
//! ("HGET", 2)  ->  "HGET %s %s"
//! ```
//!
//! Templates are built once per (name, arity) and shared process-wide.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::arg::{to_args, CommandArg};
use crate::error::{KvError, Result};

/// Placeholder token substituted by one argument
pub const PLACEHOLDER: &str = "%s";

type TemplateCache = RwLock<HashMap<String, HashMap<usize, Arc<CommandTemplate>>>>;

static TEMPLATES: OnceLock<TemplateCache> = OnceLock::new();

/// Reusable command skeleton
#[derive(Debug, PartialEq, Eq)]
pub struct CommandTemplate {
    name: String,
    arity: usize,
    text: String,
}

impl CommandTemplate {
    /// Build a template without consulting the shared cache
    pub fn new(name: &str, arity: usize) -> Self {
        let mut text = String::with_capacity(name.len() + arity * 3);
        text.push_str(name);
        for _ in 0..arity {
            text.push(' ');
            text.push_str(PLACEHOLDER);
        }

        Self {
            name: name.to_string(),
            arity,
            text,
        }
    }

    /// Command name (may span several words, e.g. `CLIENT SETNAME`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of arguments
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Template text, e.g. `SET %s %s`
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute rendered arguments into the template
    ///
    /// This is the checked entry point for callers that declare a command's
    /// shape up front with [`template`]. It fails with [`KvError::Arity`]
    /// when the supplied count differs from the declared arity.
    /// [`CommandBuilder`], [`format`] and `cmd!` size the template from the
    /// arguments they were given, so they never hit this check.
    ///
    /// ```
    /// use kvfmt::command::{template, to_args};
    ///
    /// let hget = template("HGET", 2);
    /// let command = hget.clone().render(to_args(&[&"user:1", &"name"]))?;
    /// assert_eq!(command.to_string(), "HGET user:1 name");
    /// assert!(hget.render(to_args(&[&"user:1"])).is_err());
    /// # Ok::<(), kvfmt::KvError>(())
    /// ```
    pub fn render(self: Arc<Self>, args: Vec<String>) -> Result<Command> {
        if args.len() != self.arity {
            return Err(KvError::Arity {
                command: self.name.clone(),
                expected: self.arity,
                actual: args.len(),
            });
        }

        Ok(Command {
            template: self,
            args,
        })
    }
}

/// Shared template for `(name, arity)`, built on first use
pub fn template(name: &str, arity: usize) -> Arc<CommandTemplate> {
    let cache = TEMPLATES.get_or_init(Default::default);

    if let Some(found) = cache.read().get(name).and_then(|by_arity| by_arity.get(&arity)) {
        return Arc::clone(found);
    }

    let mut cache = cache.write();
    let entry = cache
        .entry(name.to_string())
        .or_default()
        .entry(arity)
        .or_insert_with(|| {
            tracing::trace!("Building command template {} / {}", name, arity);
            Arc::new(CommandTemplate::new(name, arity))
        });
    Arc::clone(entry)
}

// =============================================================================
// Command
// =============================================================================

/// A fully formatted command, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    template: Arc<CommandTemplate>,
    args: Vec<String>,
}

impl Command {
    /// Start building a command
    pub fn builder(name: &str) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    /// Rendered argument values, in order
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Wire tokens: template words with each placeholder replaced by one
    /// argument. An argument containing spaces stays a single token.
    pub fn argv(&self) -> Vec<&str> {
        let mut args = self.args.iter();
        self.template
            .text()
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                PLACEHOLDER => args.next().map(String::as_str).unwrap_or(token),
                _ => token,
            })
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Accumulates typed arguments, then binds them to a shared template
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Append one argument (a modifier may contribute several tokens)
    pub fn arg<A: CommandArg + ?Sized>(mut self, arg: &A) -> Self {
        arg.write_args(&mut self.args);
        self
    }

    /// Append a run of arguments
    pub fn args<A: CommandArg>(mut self, args: &[A]) -> Self {
        for arg in args {
            arg.write_args(&mut self.args);
        }
        self
    }

    pub fn build(self) -> Command {
        Command {
            template: template(&self.name, self.args.len()),
            args: self.args,
        }
    }
}

/// Format `name` with the given arguments
pub fn format(name: &str, args: &[&dyn CommandArg]) -> Command {
    let args = to_args(args);
    Command {
        template: template(name, args.len()),
        args,
    }
}

/// Build a [`Command`] from a name and any number of typed arguments
///
/// ```
/// use kvfmt::cmd;
/// use kvfmt::command::{Nx, Px};
///
/// let command = cmd!("SET", "lock", 1, Px(3000), Nx);
/// assert_eq!(command.to_string(), "SET lock 1 PX 3000 NX");
/// ```
#[macro_export]
macro_rules! cmd {
    ($name:expr $(, $arg:expr)* $(,)?) => {
        $crate::command::CommandBuilder::new($name)
            $(.arg(&$arg))*
            .build()
    };
}
