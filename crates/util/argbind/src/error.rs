use error_derive::Error;

/// Everything that can abort a binding call
#[derive(Debug, Error)]
pub enum BindError {
    #[msg = "invalid binding metadata: {0}"]
    Configuration(#[source] ConfigurationError),

    #[msg = "unknown option {0:?}"]
    UnknownOption(String),

    #[msg = "{0}"]
    Coercion(#[source] CoercionError),

    #[msg = "no value was given for positional member {0}"]
    MissingPositional(&'static str),
}

/// Mistakes in the binding metadata itself.
///
/// These never depend on user input and point at the declaration of a target type.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[msg = "option {0} is registered more than once"]
    DuplicateOption(String),

    #[msg = "positional index {index} is claimed by both {first} and {second}"]
    DuplicatePosition {
        index: usize,
        first: &'static str,
        second: &'static str,
    },

    #[msg = "{0} is a method and cannot be positional"]
    PositionalMethod(&'static str),

    #[msg = "{0} cannot be constructed from a single token and cannot be positional"]
    NotConstructible(&'static str),

    #[msg = "{0} has no orphan index but can only be bound by position"]
    PositionalOnly(&'static str),

    #[msg = "parameter {parameter} of {method} is a boolean, which actions do not support"]
    BooleanParameter {
        method: &'static str,
        parameter: &'static str,
    },

    #[msg = "{method} has no argument {index}"]
    MissingArgument { method: &'static str, index: usize },

    #[msg = "argument {index} of {method} does not have the declared type"]
    ArgumentType { method: &'static str, index: usize },
}

/// A token that cannot be turned into the value its destination needs
#[derive(Debug, Error)]
pub enum CoercionError {
    #[msg = "{token:?} is not a valid {expected}"]
    InvalidInteger {
        token: String,
        expected: &'static str,
    },

    #[msg = "{token:?} is not a variant of {expected}"]
    UnknownVariant {
        token: String,
        expected: &'static str,
    },

    #[msg = "{token:?} cannot be used for {member}: {reason}"]
    Construction {
        member: &'static str,
        token: String,
        reason: String,
    },
}
