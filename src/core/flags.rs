// src/core/flags.rs

//! Declarative building blocks for a tool's flag grammar.
//!
//! A profile describes its flags once, as a static table of [`FlagSpec`]s keyed
//! by a closed enum of flag identifiers, and its subcommands as a table of
//! [`CommandSpec`]s listing which of those flags each one accepts. Nothing in
//! here is mutated at runtime.

use std::fmt::Debug;
use std::hash::Hash;

/// Marker for the closed enums a profile uses to name its flags and subcommands.
pub trait Ident: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Ident for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

/// Inclusive range check for numeric values. `None` means "no bound", which
/// keeps a real bound of zero distinguishable from "unbounded".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    /// Smallest accepted value.
    pub lower: Option<T>,
    /// Largest accepted value.
    pub upper: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Accepts every value of `T`.
    pub const fn unbounded() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Accepts `lower..=upper`.
    pub const fn between(lower: T, upper: T) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Accepts `lower` and everything above it.
    pub const fn at_least(lower: T) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// Whether `value` lies inside both bounds.
    pub fn contains(&self, value: T) -> bool {
        if let Some(lower) = self.lower {
            if value < lower {
                return false;
            }
        }
        if let Some(upper) = self.upper {
            if value > upper {
                return false;
            }
        }
        true
    }
}

/// What a flag carries on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Present or absent, nothing else.
    Switch,
    /// Carries an explicit `true`/`false`.
    Bool,
    /// A signed byte.
    Int8(Bounds<i8>),
    /// A signed 16-bit integer.
    Int16(Bounds<i16>),
    /// A signed 32-bit integer.
    Int32(Bounds<i32>),
    /// A signed 64-bit integer.
    Int64(Bounds<i64>),
    /// An unsigned byte.
    UInt8(Bounds<u8>),
    /// Free text, optionally quoted.
    Text,
}

impl ValueKind {
    /// Whether the flag stores a typed value next to its presence bit.
    pub fn carries_value(self) -> bool {
        !matches!(self, Self::Switch | Self::Bool)
    }

    /// Human-readable name of the kind, for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Bool => "boolean",
            Self::Int8(_) => "8-bit integer",
            Self::Int16(_) => "16-bit integer",
            Self::Int32(_) => "32-bit integer",
            Self::Int64(_) => "64-bit integer",
            Self::UInt8(_) => "unsigned 8-bit integer",
            Self::Text => "string",
        }
    }
}

/// A decoded flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// For [`ValueKind::Int8`].
    Int8(i8),
    /// For [`ValueKind::Int16`].
    Int16(i16),
    /// For [`ValueKind::Int32`].
    Int32(i32),
    /// For [`ValueKind::Int64`].
    Int64(i64),
    /// For [`ValueKind::UInt8`].
    UInt8(u8),
    /// For [`ValueKind::Text`], with the quotes removed.
    Text(String),
}

impl Value {
    /// True when this value can be stored for a flag of the given kind.
    /// Bounds are a parsing concern and are not checked here.
    pub fn fits(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int8(_), ValueKind::Int8(_))
                | (Self::Int16(_), ValueKind::Int16(_))
                | (Self::Int32(_), ValueKind::Int32(_))
                | (Self::Int64(_), ValueKind::Int64(_))
                | (Self::UInt8(_), ValueKind::UInt8(_))
                | (Self::Text(_), ValueKind::Text)
        )
    }

    /// Any integer value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(v) => Some(i64::from(*v)),
            Self::Int16(v) => Some(i64::from(*v)),
            Self::Int32(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            Self::UInt8(v) => Some(i64::from(*v)),
            Self::Text(_) => None,
        }
    }

    /// The text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One command-line switch of a tool.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec<F: Ident> {
    /// The profile's name for the flag.
    pub id: F,
    /// Long spelling, including the leading dashes. Used when generating.
    pub long: &'static str,
    /// Optional short spelling, accepted when parsing only.
    pub short: Option<&'static str>,
    /// What the flag carries.
    pub kind: ValueKind,
    /// When set, a flag whose value is missing or malformed is still recorded
    /// as present (with no value) instead of failing the whole parse. Such a
    /// flag is rendered back bare.
    pub missing_allowed: bool,
}

impl<F: Ident> FlagSpec<F> {
    /// A flag with only a long spelling.
    pub const fn new(id: F, long: &'static str, kind: ValueKind) -> Self {
        Self {
            id,
            long,
            short: None,
            kind,
            missing_allowed: false,
        }
    }

    /// Adds a short spelling.
    pub const fn short(mut self, short: &'static str) -> Self {
        self.short = Some(short);
        self
    }

    /// Lets the flag stand without a value.
    pub const fn missing_allowed(mut self) -> Self {
        self.missing_allowed = true;
        self
    }

    /// Exact match against either spelling.
    pub fn matches(&self, token: &str) -> bool {
        token == self.long || self.short == Some(token)
    }

    /// Returns the value part of a `spelling=value` token, or `None` if the
    /// token is not an inline form of this flag.
    pub fn inline_value<'t>(&self, token: &'t str) -> Option<&'t str> {
        std::iter::once(self.long)
            .chain(self.short)
            .find_map(|spelling| token.strip_prefix(spelling)?.strip_prefix('='))
    }
}

/// One subcommand and the flags it accepts.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec<C: Ident, F: Ident> {
    /// The profile's name for the subcommand.
    pub id: C,
    /// The word that selects it, always the first token.
    pub token: &'static str,
    /// Flags accepted after it.
    pub flags: &'static [F],
}

/// The full, static grammar of one tool.
#[derive(Debug, Clone, Copy)]
pub struct Grammar<F: Ident, C: Ident> {
    /// Every flag, in generation order.
    pub flags: &'static [FlagSpec<F>],
    /// Every subcommand.
    pub commands: &'static [CommandSpec<C, F>],
    /// Flags accepted when the invocation has no subcommand.
    pub bare_flags: &'static [F],
}

impl<F: Ident, C: Ident> Grammar<F, C> {
    /// Looks a flag up by id.
    pub fn flag(&self, id: F) -> Option<&'static FlagSpec<F>> {
        self.flags.iter().find(|spec| spec.id == id)
    }

    /// Looks a subcommand up by id.
    pub fn command(&self, id: C) -> Option<&'static CommandSpec<C, F>> {
        self.commands.iter().find(|spec| spec.id == id)
    }

    /// Looks a subcommand up by its exact word.
    pub fn command_by_token(&self, token: &str) -> Option<&'static CommandSpec<C, F>> {
        self.commands.iter().find(|spec| spec.token == token)
    }

    /// The flags the given subcommand (or the bare invocation) accepts.
    pub fn accepted(&self, command: Option<C>) -> &'static [F] {
        match command {
            Some(id) => self.command(id).map(|spec| spec.flags).unwrap_or_default(),
            None => self.bare_flags,
        }
    }

    /// Whether `flag` is accepted under `command`.
    pub fn is_supported(&self, command: Option<C>, flag: F) -> bool {
        self.accepted(command).contains(&flag)
    }

    /// True if the token is some flag of this tool, in either bare or inline form.
    /// Used to stop a flag from swallowing the next flag as its value.
    pub fn is_flag_token(&self, token: &str) -> bool {
        self.flags
            .iter()
            .any(|spec| spec.matches(token) || spec.inline_value(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestFlag {
        Speed,
    }

    #[test]
    fn test_bounds_zero_is_a_real_bound() {
        let bounded = Bounds::between(0_i8, 10);
        assert!(!bounded.contains(-1));
        assert!(bounded.contains(0));
        assert!(bounded.contains(10));
        assert!(!bounded.contains(11));

        let open = Bounds::<i8>::unbounded();
        assert!(open.contains(-1));
        assert!(open.contains(i8::MAX));
    }

    #[test]
    fn test_inline_value_for_both_spellings() {
        let spec = FlagSpec::new(TestFlag::Speed, "--speed", ValueKind::Int32(Bounds::unbounded()))
            .short("-s");
        assert_eq!(spec.inline_value("--speed=8"), Some("8"));
        assert_eq!(spec.inline_value("-s=8"), Some("8"));
        assert_eq!(spec.inline_value("--speed"), None);
        assert_eq!(spec.inline_value("--speedy=8"), None);
        assert!(spec.matches("-s"));
        assert!(!spec.matches("--speed=8"));
    }

    #[test]
    fn test_value_fits_kind() {
        assert!(Value::Int8(1).fits(ValueKind::Int8(Bounds::unbounded())));
        assert!(!Value::Int8(1).fits(ValueKind::Int16(Bounds::unbounded())));
        assert!(Value::Text("x".into()).fits(ValueKind::Text));
        assert!(!Value::Text("x".into()).fits(ValueKind::Switch));
    }
}
