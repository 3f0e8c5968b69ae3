// src/core/parameters.rs

//! The typed parameter store shared by every tool profile, together with the
//! parser that fills it from an invocation string and the generator that
//! renders it back.
//!
//! The parser is all-or-nothing: a single bad token rejects the whole string
//! and [`Parameters::parse`] hands back an empty store instead of a partially
//! built one. Validity is defined by generation: a store is valid exactly when
//! [`Parameters::generate`] produces an argument list.

use crate::{
    core::{
        flags::{FlagSpec, Grammar, Ident, Value, ValueKind},
        tokenizer::{quote_if_needed, tokenize},
        values::{decode, decode_bool},
    },
    models::{MediaType, RedumpSystem},
};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Why an invocation string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("The invocation is empty.")]
    Empty,
    /// A token that is neither a flag nor a value of the previous flag.
    #[error("Token '{0}' is not a flag of this program.")]
    UnknownToken(String),
    /// A known flag outside the subcommand's accepted set.
    #[error("Flag '{flag}' is not supported by {command}.")]
    Unsupported {
        /// Long spelling of the flag.
        flag: &'static str,
        /// The subcommand, as shown to the user.
        command: String,
    },
    /// A value flag without a valid value.
    #[error("Flag '{0}' requires a value.")]
    MissingValue(&'static str),
    /// A switch written as `--switch=value`.
    #[error("Flag '{0}' does not take a value.")]
    UnexpectedValue(&'static str),
    /// An inline form with more than one `=`.
    #[error("Token '{0}' must contain exactly one '='.")]
    AmbiguousAssignment(String),
}

/// Why a store cannot be rendered. Any of these makes it invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Nothing would be written.
    #[error("No subcommand is selected and no flags are set.")]
    Empty,
    /// A set flag the subcommand does not accept.
    #[error("Flag '{flag}' is not supported by {command}.")]
    Unsupported {
        /// Long spelling of the flag.
        flag: String,
        /// The subcommand, as shown to the user.
        command: String,
    },
    /// Only flags declared `missing_allowed` may be set without a value.
    #[error("Flag '{0}' is set but has no value.")]
    MissingValue(&'static str),
    /// The value would not parse back to itself.
    #[error("Value '{value}' of flag '{flag}' cannot be written on a command line.")]
    Unrepresentable {
        /// Long spelling of the flag.
        flag: &'static str,
        /// The stored value, debug-formatted.
        value: String,
    },
}

/// Why [`Parameters::set_value`] refused a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The flag id has no spec in the grammar.
    #[error("Flag '{0}' is not part of this program's grammar.")]
    UnknownFlag(String),
    /// The value's type does not match the flag's kind.
    #[error("Flag '{flag}' takes a {expected} value.")]
    KindMismatch {
        /// Long spelling of the flag.
        flag: &'static str,
        /// What the flag's kind calls for.
        expected: &'static str,
    },
}

/// A single invocation of an external tool under construction.
#[derive(Debug, Clone)]
pub struct Parameters<F: Ident, C: Ident> {
    grammar: &'static Grammar<F, C>,
    subcommand: Option<C>,
    /// Absent key: flag not given. Present key: explicit `true`/`false`.
    flags: HashMap<F, bool>,
    values: HashMap<F, Value>,
    /// Context for defaults and enrichment; never part of the rendered line.
    pub system: Option<RedumpSystem>,
    /// Context for defaults and enrichment; never part of the rendered line.
    pub media_type: Option<MediaType>,
    /// The tool to run this invocation with.
    pub executable_path: Option<PathBuf>,
}

impl<F: Ident, C: Ident> Parameters<F, C> {
    /// An empty store: no subcommand, no flags.
    pub fn new(grammar: &'static Grammar<F, C>) -> Self {
        Self {
            grammar,
            subcommand: None,
            flags: HashMap::new(),
            values: HashMap::new(),
            system: None,
            media_type: None,
            executable_path: None,
        }
    }

    /// Parses an invocation string, falling back to an empty store if any part
    /// of it is invalid.
    pub fn parse(grammar: &'static Grammar<F, C>, input: &str) -> Self {
        match Self::try_parse(grammar, input) {
            Ok(params) => params,
            Err(e) => {
                log::debug!("Discarding invocation '{}': {}", input, e);
                Self::new(grammar)
            }
        }
    }

    /// Parses an invocation string, reporting why it was rejected.
    pub fn try_parse(grammar: &'static Grammar<F, C>, input: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut params = Self::new(grammar);
        let mut cursor = 0;
        if let Some(command) = tokens.first().and_then(|t| grammar.command_by_token(t)) {
            params.subcommand = Some(command.id);
            cursor = 1;
        }

        while cursor < tokens.len() {
            cursor = params.parse_at(&tokens, cursor)?;
        }

        log::trace!("Parsed invocation: {:?}", params);
        Ok(params)
    }

    /// Handles the token under the cursor and returns the next cursor position.
    fn parse_at(&mut self, tokens: &[String], cursor: usize) -> Result<usize, ParseError> {
        let token = tokens.get(cursor).map(String::as_str).unwrap_or_default();

        if let Some(spec) = self.grammar.flags.iter().find(|spec| spec.matches(token)) {
            self.ensure_supported(spec)?;
            return self.consume_bare(spec, tokens, cursor);
        }

        for spec in self.grammar.flags {
            if let Some(raw) = spec.inline_value(token) {
                self.ensure_supported(spec)?;
                self.consume_inline(spec, token, raw)?;
                return Ok(cursor + 1);
            }
        }

        Err(ParseError::UnknownToken(token.to_string()))
    }

    fn ensure_supported(&self, spec: &FlagSpec<F>) -> Result<(), ParseError> {
        if self.grammar.is_supported(self.subcommand, spec.id) {
            Ok(())
        } else {
            Err(ParseError::Unsupported {
                flag: spec.long,
                command: self.command_label(),
            })
        }
    }

    /// `--flag` or `--flag value`.
    fn consume_bare(
        &mut self,
        spec: &FlagSpec<F>,
        tokens: &[String],
        cursor: usize,
    ) -> Result<usize, ParseError> {
        // A flag never takes another flag as its value.
        let next = tokens
            .get(cursor + 1)
            .map(String::as_str)
            .filter(|next| !self.grammar.is_flag_token(next));

        match spec.kind {
            ValueKind::Switch => {
                self.flags.insert(spec.id, true);
                Ok(cursor + 1)
            }
            ValueKind::Bool => match next.and_then(decode_bool) {
                Some(state) => {
                    self.flags.insert(spec.id, state);
                    Ok(cursor + 2)
                }
                None => self.missing_value(spec).map(|()| cursor + 1),
            },
            kind => match next.and_then(|raw| decode(kind, raw)) {
                Some(value) => {
                    self.flags.insert(spec.id, true);
                    self.values.insert(spec.id, value);
                    Ok(cursor + 2)
                }
                None => self.missing_value(spec).map(|()| cursor + 1),
            },
        }
    }

    /// `--flag=value`.
    fn consume_inline(&mut self, spec: &FlagSpec<F>, token: &str, raw: &str) -> Result<(), ParseError> {
        if token.split('=').count() != 2 {
            return Err(ParseError::AmbiguousAssignment(token.to_string()));
        }

        match spec.kind {
            ValueKind::Switch => Err(ParseError::UnexpectedValue(spec.long)),
            ValueKind::Bool => match decode_bool(raw) {
                Some(state) => {
                    self.flags.insert(spec.id, state);
                    Ok(())
                }
                None => self.missing_value(spec),
            },
            kind => match decode(kind, raw) {
                Some(value) => {
                    self.flags.insert(spec.id, true);
                    self.values.insert(spec.id, value);
                    Ok(())
                }
                None => self.missing_value(spec),
            },
        }
    }

    /// Either degrades to "present without a value" or fails the parse.
    fn missing_value(&mut self, spec: &FlagSpec<F>) -> Result<(), ParseError> {
        if spec.missing_allowed {
            self.flags.insert(spec.id, true);
            self.values.remove(&spec.id);
            Ok(())
        } else {
            Err(ParseError::MissingValue(spec.long))
        }
    }

    fn command_label(&self) -> String {
        match self.subcommand.and_then(|c| self.grammar.command(c)) {
            Some(spec) => format!("subcommand '{}'", spec.token),
            None => "an invocation without a subcommand".to_string(),
        }
    }

    // --- STORE ACCESS ---

    /// The grammar this store was built against.
    pub fn grammar(&self) -> &'static Grammar<F, C> {
        self.grammar
    }

    /// The selected subcommand, if any.
    pub fn subcommand(&self) -> Option<C> {
        self.subcommand
    }

    /// Selects a subcommand. Flags it does not accept make the store invalid.
    pub fn set_subcommand(&mut self, subcommand: Option<C>) {
        self.subcommand = subcommand;
    }

    /// Tri-state read: `None` when the flag was never given.
    pub fn flag(&self, flag: F) -> Option<bool> {
        self.flags.get(&flag).copied()
    }

    /// Sets the presence bit, leaving any stored value alone.
    pub fn set_flag(&mut self, flag: F, state: bool) {
        self.flags.insert(flag, state);
    }

    /// Forgets a flag and its value.
    pub fn clear_flag(&mut self, flag: F) {
        self.flags.remove(&flag);
        self.values.remove(&flag);
    }

    /// The stored value of a flag.
    pub fn value(&self, flag: F) -> Option<&Value> {
        self.values.get(&flag)
    }

    /// Marks the flag present and stores its value.
    pub fn set_value(&mut self, flag: F, value: Value) -> Result<(), ValueError> {
        let spec = self
            .grammar
            .flag(flag)
            .ok_or_else(|| ValueError::UnknownFlag(format!("{:?}", flag)))?;
        if !value.fits(spec.kind) {
            return Err(ValueError::KindMismatch {
                flag: spec.long,
                expected: spec.kind.describe(),
            });
        }
        self.flags.insert(flag, true);
        self.values.insert(flag, value);
        Ok(())
    }

    /// Typed reads: `None` when the flag has no value of that type.
    pub fn int8(&self, flag: F) -> Option<i8> {
        match self.values.get(&flag)? {
            Value::Int8(v) => Some(*v),
            _ => None,
        }
    }

    /// See [`Self::int8`].
    pub fn int16(&self, flag: F) -> Option<i16> {
        match self.values.get(&flag)? {
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }

    /// See [`Self::int8`].
    pub fn int32(&self, flag: F) -> Option<i32> {
        match self.values.get(&flag)? {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// See [`Self::int8`].
    pub fn int64(&self, flag: F) -> Option<i64> {
        match self.values.get(&flag)? {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// See [`Self::int8`].
    pub fn uint8(&self, flag: F) -> Option<u8> {
        match self.values.get(&flag)? {
            Value::UInt8(v) => Some(*v),
            _ => None,
        }
    }

    /// See [`Self::int8`].
    pub fn text(&self, flag: F) -> Option<&str> {
        self.values.get(&flag)?.as_text()
    }

    /// Whether the current subcommand accepts the flag.
    pub fn is_supported(&self, flag: F) -> bool {
        self.grammar.is_supported(self.subcommand, flag)
    }

    /// Flags that are set, in grammar order, with their state and value.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FlagSpec<F>, bool, Option<&Value>)> + '_ {
        self.grammar.flags.iter().filter_map(move |spec| {
            let state = self.flags.get(&spec.id)?;
            Some((spec, *state, self.values.get(&spec.id)))
        })
    }

    /// Same subcommand, same flag states, same values. Context fields and the
    /// executable path are not part of the invocation itself.
    pub fn same_invocation(&self, other: &Self) -> bool {
        self.subcommand == other.subcommand
            && self.flags == other.flags
            && self.values == other.values
    }

    // --- GENERATION ---

    /// Renders the store as an argument list, or explains why it cannot.
    pub fn try_generate(&self) -> Result<Vec<String>, GenerateError> {
        let accepted = self.grammar.accepted(self.subcommand);
        if let Some(flag) = self.flags.keys().find(|flag| !accepted.contains(flag)) {
            let flag = self
                .grammar
                .flag(*flag)
                .map_or_else(|| format!("{:?}", flag), |spec| spec.long.to_string());
            return Err(GenerateError::Unsupported {
                flag,
                command: self.command_label(),
            });
        }

        let mut tokens = Vec::with_capacity(self.flags.len() + 1);
        if let Some(spec) = self.subcommand.and_then(|c| self.grammar.command(c)) {
            tokens.push(spec.token.to_string());
        }

        for (spec, state, value) in self.entries() {
            match spec.kind {
                ValueKind::Switch => {
                    if state {
                        tokens.push(spec.long.to_string());
                    }
                }
                ValueKind::Bool => tokens.push(format!("{}={}", spec.long, state)),
                kind => {
                    if !state {
                        continue;
                    }
                    match value {
                        Some(value) => match self.render_value(kind, value) {
                            Some(Rendered::Inline(rendered)) => {
                                tokens.push(format!("{}={}", spec.long, rendered));
                            }
                            Some(Rendered::Separate(rendered)) => {
                                tokens.push(spec.long.to_string());
                                tokens.push(rendered);
                            }
                            None => {
                                return Err(GenerateError::Unrepresentable {
                                    flag: spec.long,
                                    value: format!("{:?}", value),
                                });
                            }
                        },
                        None if spec.missing_allowed => tokens.push(spec.long.to_string()),
                        None => return Err(GenerateError::MissingValue(spec.long)),
                    }
                }
            }
        }

        if tokens.is_empty() {
            return Err(GenerateError::Empty);
        }
        Ok(tokens)
    }

    /// The argument list, or `None` for an invalid store.
    pub fn generate(&self) -> Option<Vec<String>> {
        self.try_generate().ok()
    }

    /// The argument list joined into a single command-line string.
    pub fn generate_string(&self) -> Option<String> {
        self.generate().map(|tokens| tokens.join(" "))
    }

    /// Writes a value in a form the parser decodes back to the same value.
    fn render_value(&self, kind: ValueKind, value: &Value) -> Option<Rendered> {
        match value {
            Value::Text(text) => {
                if text.trim().is_empty() || text.contains('"') {
                    return None;
                }
                if !text.contains('=') {
                    return Some(Rendered::Inline(quote_if_needed(text)));
                }
                // A separate token must not be read back as a flag of its own.
                (!self.grammar.is_flag_token(text))
                    .then(|| Rendered::Separate(quote_if_needed(text)))
            }
            _ => {
                let plain = value.as_i64()?.to_string();
                (decode(kind, &plain).as_ref() == Some(value)).then_some(Rendered::Inline(plain))
            }
        }
    }

    /// Whether the store generates.
    pub fn is_valid(&self) -> bool {
        self.generate().is_some()
    }
}

/// How a value is attached to its flag.
enum Rendered {
    /// `--flag=value`
    Inline(String),
    /// `--flag value`, for text the inline split would cut at its own `=`.
    Separate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flags::{Bounds, CommandSpec};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestFlag {
        Help,
        Speed,
        Level,
        Offset,
        Size,
        Fill,
        Name,
        Quiet,
        Verify,
        Bogus,
        Optional,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestCommand {
        Read,
        Info,
    }

    static FLAGS: &[FlagSpec<TestFlag>] = &[
        FlagSpec::new(TestFlag::Help, "--help", ValueKind::Switch).short("-h"),
        FlagSpec::new(TestFlag::Speed, "--speed", ValueKind::Int32(Bounds::unbounded())),
        FlagSpec::new(TestFlag::Level, "--level", ValueKind::Int8(Bounds::between(0, 10))),
        FlagSpec::new(TestFlag::Offset, "--offset", ValueKind::Int16(Bounds::unbounded())),
        FlagSpec::new(TestFlag::Size, "--size", ValueKind::Int64(Bounds::unbounded())),
        FlagSpec::new(TestFlag::Fill, "--fill", ValueKind::UInt8(Bounds::unbounded())),
        FlagSpec::new(TestFlag::Name, "--name", ValueKind::Text).short("-n"),
        FlagSpec::new(TestFlag::Quiet, "--quiet", ValueKind::Switch).short("-q"),
        FlagSpec::new(TestFlag::Verify, "--verify", ValueKind::Bool),
        FlagSpec::new(TestFlag::Bogus, "--bogus", ValueKind::Switch),
        FlagSpec::new(TestFlag::Optional, "--optional", ValueKind::Int32(Bounds::unbounded()))
            .missing_allowed(),
    ];

    static READ_FLAGS: &[TestFlag] = &[
        TestFlag::Speed,
        TestFlag::Level,
        TestFlag::Offset,
        TestFlag::Size,
        TestFlag::Fill,
        TestFlag::Name,
        TestFlag::Quiet,
        TestFlag::Verify,
        TestFlag::Optional,
    ];

    static GRAMMAR: Grammar<TestFlag, TestCommand> = Grammar {
        flags: FLAGS,
        commands: &[
            CommandSpec {
                id: TestCommand::Read,
                token: "read",
                flags: READ_FLAGS,
            },
            CommandSpec {
                id: TestCommand::Info,
                token: "info",
                flags: &[TestFlag::Quiet],
            },
        ],
        bare_flags: &[TestFlag::Help],
    };

    type TestParams = Parameters<TestFlag, TestCommand>;

    fn parse(input: &str) -> TestParams {
        TestParams::parse(&GRAMMAR, input)
    }

    fn assert_round_trip(params: &TestParams) {
        let rendered = params.generate_string().expect("model should be valid");
        let reparsed = TestParams::try_parse(&GRAMMAR, &rendered).expect("rendered string should parse");
        assert!(
            params.same_invocation(&reparsed),
            "round trip changed the model: {:?} -> '{}' -> {:?}",
            params,
            rendered,
            reparsed
        );
    }

    // --- Parsing Tests ---

    #[test]
    fn test_inline_and_two_token_forms_are_identical() {
        let inline = parse("read --speed=8");
        let split = parse("read --speed 8");

        assert_eq!(inline.subcommand(), Some(TestCommand::Read));
        assert_eq!(inline.flag(TestFlag::Speed), Some(true));
        assert_eq!(inline.int32(TestFlag::Speed), Some(8));
        assert!(inline.same_invocation(&split));
    }

    #[test]
    fn test_unsupported_flag_resets_everything() {
        let params = parse("read --speed 8 --bogus");
        assert_eq!(params.subcommand(), None);
        assert_eq!(params.flag(TestFlag::Speed), None);
        assert_eq!(params.int32(TestFlag::Speed), None);

        assert!(matches!(
            TestParams::try_parse(&GRAMMAR, "read --speed 8 --bogus"),
            Err(ParseError::Unsupported { flag: "--bogus", .. })
        ));
    }

    #[test]
    fn test_flag_not_accepted_by_subcommand_is_rejected() {
        let result = TestParams::try_parse(&GRAMMAR, "info --speed=8");
        assert!(matches!(result, Err(ParseError::Unsupported { flag: "--speed", .. })));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read stray").err(),
            Some(ParseError::UnknownToken("stray".to_string()))
        );
        // A second subcommand token is just an unknown token.
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read info").err(),
            Some(ParseError::UnknownToken("info".to_string()))
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(TestParams::try_parse(&GRAMMAR, "   ").err(), Some(ParseError::Empty));
        assert!(!parse("").is_valid());
    }

    #[test]
    fn test_ambiguous_assignment() {
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --name=a=b").err(),
            Some(ParseError::AmbiguousAssignment("--name=a=b".to_string()))
        );
    }

    #[test]
    fn test_bounds_are_enforced() {
        assert_eq!(parse("read --level 10").int8(TestFlag::Level), Some(10));
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --level 11").err(),
            Some(ParseError::MissingValue("--level"))
        );
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --level=11").err(),
            Some(ParseError::MissingValue("--level"))
        );
    }

    #[test]
    fn test_suffixes_through_parser() {
        let params = parse("read --speed 5k --size=2G --offset 3q");
        assert_eq!(params.int32(TestFlag::Speed), Some(5 * 1024));
        assert_eq!(params.int64(TestFlag::Size), Some(2 * 1024 * 1024 * 1024));
        assert_eq!(params.int16(TestFlag::Offset), Some(24));
    }

    #[test]
    fn test_missing_value_degrades_only_when_allowed() {
        let params = parse("read --optional");
        assert_eq!(params.flag(TestFlag::Optional), Some(true));
        assert_eq!(params.value(TestFlag::Optional), None);

        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --speed").err(),
            Some(ParseError::MissingValue("--speed"))
        );
    }

    #[test]
    fn test_flag_never_consumes_another_flag() {
        let params = parse("read --optional --quiet");
        assert_eq!(params.flag(TestFlag::Optional), Some(true));
        assert_eq!(params.value(TestFlag::Optional), None);
        assert_eq!(params.flag(TestFlag::Quiet), Some(true));

        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --name --quiet").err(),
            Some(ParseError::MissingValue("--name"))
        );
        // Inline forms of other flags count as flags too.
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --name --speed=4").err(),
            Some(ParseError::MissingValue("--name"))
        );
    }

    #[test]
    fn test_malformed_value_with_missing_allowed_is_left_for_next_step() {
        // "abc" is not a number; --optional degrades and "abc" is then an unknown token.
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --optional abc").err(),
            Some(ParseError::UnknownToken("abc".to_string()))
        );
        let params = parse("read --optional=abc");
        assert_eq!(params.flag(TestFlag::Optional), Some(true));
        assert_eq!(params.value(TestFlag::Optional), None);
    }

    #[test]
    fn test_tri_state_bool() {
        let params = parse("read --verify false --quiet");
        assert_eq!(params.flag(TestFlag::Verify), Some(false));
        assert_eq!(params.flag(TestFlag::Quiet), Some(true));
        assert_eq!(params.flag(TestFlag::Name), None);

        assert_eq!(parse("read --verify=TRUE").flag(TestFlag::Verify), Some(true));
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --verify").err(),
            Some(ParseError::MissingValue("--verify"))
        );
    }

    #[test]
    fn test_switch_rejects_inline_value() {
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --quiet=yes").err(),
            Some(ParseError::UnexpectedValue("--quiet"))
        );
    }

    #[test]
    fn test_short_spellings_and_quoted_strings() {
        let params = parse(r#"read -n "my image" -q"#);
        assert_eq!(params.text(TestFlag::Name), Some("my image"));
        assert_eq!(params.flag(TestFlag::Quiet), Some(true));

        let params = parse(r#"read -n="my image""#);
        assert_eq!(params.text(TestFlag::Name), Some("my image"));
    }

    #[test]
    fn test_no_subcommand_uses_bare_grammar() {
        let params = parse("--help");
        assert_eq!(params.subcommand(), None);
        assert_eq!(params.flag(TestFlag::Help), Some(true));
        assert!(matches!(
            TestParams::try_parse(&GRAMMAR, "--quiet"),
            Err(ParseError::Unsupported { flag: "--quiet", .. })
        ));
    }

    // --- Generation Tests ---

    #[test]
    fn test_generation_order_and_format() {
        let params = parse(r#"read -q --name "my image" --speed=8 --verify false --fill 255"#);
        assert_eq!(
            params.generate(),
            Some(vec![
                "read".to_string(),
                "--speed=8".to_string(),
                "--fill=255".to_string(),
                "--name=\"my image\"".to_string(),
                "--quiet".to_string(),
                "--verify=false".to_string(),
            ])
        );
    }

    #[test]
    fn test_round_trips() {
        for input in [
            "read --speed=8",
            "read --speed 5k --level 3 --offset -12 --size 1M --fill 7",
            r#"read --name "C:\My Dumps\game" --quiet --verify=true"#,
            "read --optional --quiet",
            "read --optional 12",
            "info -q",
            "-h",
            "read --level 5w",
        ] {
            let params = TestParams::try_parse(&GRAMMAR, input)
                .unwrap_or_else(|e| panic!("'{}' should parse: {}", input, e));
            assert_round_trip(&params);
        }
    }

    #[test]
    fn test_empty_store_is_invalid() {
        let params = TestParams::new(&GRAMMAR);
        assert_eq!(params.try_generate(), Err(GenerateError::Empty));
        assert!(!params.is_valid());
    }

    #[test]
    fn test_setting_unsupported_flag_invalidates_model() {
        let mut params = parse("info -q");
        assert!(params.is_valid());
        params.set_flag(TestFlag::Bogus, true);
        assert!(matches!(
            params.try_generate(),
            Err(GenerateError::Unsupported { .. })
        ));

        let mut params = parse("info -q");
        params.set_value(TestFlag::Speed, Value::Int32(4)).unwrap();
        assert!(!params.is_valid());
    }

    #[test]
    fn test_value_flag_without_value_is_invalid_unless_allowed() {
        let mut params = TestParams::new(&GRAMMAR);
        params.set_subcommand(Some(TestCommand::Read));
        params.set_flag(TestFlag::Speed, true);
        assert_eq!(params.try_generate(), Err(GenerateError::MissingValue("--speed")));

        params.clear_flag(TestFlag::Speed);
        params.set_flag(TestFlag::Optional, true);
        assert_eq!(
            params.generate(),
            Some(vec!["read".to_string(), "--optional".to_string()])
        );
    }

    #[test]
    fn test_set_value_checks_kind() {
        let mut params = TestParams::new(&GRAMMAR);
        assert_eq!(
            params.set_value(TestFlag::Speed, Value::Text("fast".into())),
            Err(ValueError::KindMismatch {
                flag: "--speed",
                expected: "32-bit integer"
            })
        );
        assert_eq!(params.flag(TestFlag::Speed), None);
    }

    #[test]
    fn test_unrepresentable_text() {
        let mut params = TestParams::new(&GRAMMAR);
        params.set_subcommand(Some(TestCommand::Read));
        params.set_value(TestFlag::Name, Value::Text("a\"b".into())).unwrap();
        assert!(matches!(
            params.try_generate(),
            Err(GenerateError::Unrepresentable { flag: "--name", .. })
        ));

        // As a separate token this would be read back as `--speed=4`.
        params.set_value(TestFlag::Name, Value::Text("--speed=4".into())).unwrap();
        assert!(matches!(
            params.try_generate(),
            Err(GenerateError::Unrepresentable { flag: "--name", .. })
        ));
    }

    #[test]
    fn test_text_with_equals_sign_is_written_as_two_tokens() {
        // --- Setup ---
        let params = parse("read --name 1000=2000");
        assert_eq!(params.text(TestFlag::Name), Some("1000=2000"));

        // --- Execute ---
        let tokens = params.generate();

        // --- Assert ---
        assert_eq!(
            tokens,
            Some(vec!["read".to_string(), "--name".to_string(), "1000=2000".to_string()])
        );
        assert_round_trip(&params);
        assert_round_trip(&parse(r#"read --name "a = b" --quiet"#));
    }

    #[test]
    fn test_text_with_inner_quote_does_not_parse() {
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, r#"read --name a"b"#).err(),
            Some(ParseError::MissingValue("--name"))
        );
    }

    #[test]
    fn test_non_ascii_whitespace_stays_inside_text() {
        let params = parse("read --name a\u{a0}b --quiet");
        assert_eq!(params.text(TestFlag::Name), Some("a\u{a0}b"));
        assert_eq!(params.flag(TestFlag::Quiet), Some(true));
        assert_round_trip(&params);
    }

    #[test]
    fn test_suffixed_value_beyond_bounds_is_rejected() {
        // 5w is 10 after decoding, which is still inside [0, 10]; 6w is 12.
        assert_eq!(parse("read --level 5w").int8(TestFlag::Level), Some(10));
        assert_eq!(
            TestParams::try_parse(&GRAMMAR, "read --level 6w").err(),
            Some(ParseError::MissingValue("--level"))
        );
    }

    #[test]
    fn test_every_parsed_suffixed_value_generates() {
        for flag in ["--level", "--speed", "--offset", "--fill", "--size"] {
            for magnitude in ["0", "1", "5", "100", "255", "3000000", "-3"] {
                for suffix in ["", "c", "w", "d", "q", "k", "M", "G"] {
                    let input = format!("read {} {}{}", flag, magnitude, suffix);
                    if let Ok(params) = TestParams::try_parse(&GRAMMAR, &input) {
                        assert!(params.is_valid(), "'{}' parsed but does not generate", input);
                        assert_round_trip(&params);
                    }
                }
            }
        }
    }
}
