//! Type-directed conversion of raw tokens into field and parameter values.
//!
//! Every bindable type picks one [Strategy]. The strategy decides how many
//! tokens are consumed and what happens when the queue runs dry.

use std::{error::Error, path::PathBuf, str::FromStr};

use crate::{queue::ArgumentQueue, CoercionError};

/// The closed set of ways a value can be produced from the queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// The option alone flips the current value, no token is consumed
    Toggle,

    /// One token naming a variant, case-insensitively
    Enum,

    /// One token of comma-separated variant names that are combined into a set
    FlagEnum,

    /// One token, unless the next token is an option
    Text,

    /// One base-10 token, unless the next token is an option
    Integer,

    /// Nothing is consumed and the current value is kept
    Identity,
}

/// A type that can be assigned from the argument queue.
///
/// `current` is the value the destination holds before coercion (for fields) or
/// its default (for method parameters). It is `None` only when a nullable
/// wrapper around the type is currently empty.
///
/// Returning `Ok(None)` keeps the current value.
///
/// The provided implementation is the identity coercion: implement the trait
/// with an empty body to make a type bindable without ever consuming tokens.
pub trait Coerce: Sized {
    const STRATEGY: Strategy = Strategy::Identity;

    fn coerce(
        _queue: &mut ArgumentQueue,
        _current: Option<&Self>,
    ) -> Result<Option<Self>, CoercionError> {
        Ok(None)
    }
}

impl Coerce for bool {
    const STRATEGY: Strategy = Strategy::Toggle;

    fn coerce(
        _queue: &mut ArgumentQueue,
        current: Option<&Self>,
    ) -> Result<Option<Self>, CoercionError> {
        Ok(Some(!current.copied().unwrap_or_default()))
    }
}

impl Coerce for String {
    const STRATEGY: Strategy = Strategy::Text;

    fn coerce(
        queue: &mut ArgumentQueue,
        _current: Option<&Self>,
    ) -> Result<Option<Self>, CoercionError> {
        Ok(queue.pop_value())
    }
}

/// Nullable values are coerced like the type they wrap
impl<T: Coerce> Coerce for Option<T> {
    const STRATEGY: Strategy = T::STRATEGY;

    fn coerce(
        queue: &mut ArgumentQueue,
        current: Option<&Self>,
    ) -> Result<Option<Self>, CoercionError> {
        let value = T::coerce(queue, current.and_then(Option::as_ref))?;
        Ok(value.map(Some))
    }
}

impl Coerce for f32 {}
impl Coerce for f64 {}
impl Coerce for char {}

fn parse_integer<I: FromStr>(token: String) -> Result<I, CoercionError> {
    token
        .parse()
        .map_err(|_| CoercionError::InvalidInteger {
            token,
            expected: std::any::type_name::<I>(),
        })
}

macro_rules! integer_coercions {
    ($($integer: ty),*) => {
        $(
            impl Coerce for $integer {
                const STRATEGY: Strategy = Strategy::Integer;

                fn coerce(
                    queue: &mut ArgumentQueue,
                    _current: Option<&Self>,
                ) -> Result<Option<Self>, CoercionError> {
                    queue.pop_value().map(parse_integer).transpose()
                }
            }

            impl FromToken for $integer {
                fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
                    Ok(token.parse()?)
                }
            }
        )*
    };
}

integer_coercions!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// A fieldless enum whose variants can be named on the command line.
///
/// Usually derived with `#[derive(ArgumentEnum)]`.
pub trait ArgumentEnum: Copy + 'static {
    /// Used in diagnostics
    const NAME: &'static str;

    /// Every variant with the name it is matched by
    fn variants() -> &'static [(&'static str, Self)];

    /// The numeric value of the variant
    fn bits(self) -> u64;

    /// The bitwise OR of every variant value
    fn all_bits() -> u64 {
        Self::variants()
            .iter()
            .fold(0, |bits, (_, variant)| bits | variant.bits())
    }

    /// Looks up a variant by name, ignoring case.
    ///
    /// A decimal number is accepted only if it denotes declared variants: here
    /// that means it equals the value of one variant, [FlagSet](crate::FlagSet)
    /// segments may also combine several.
    fn parse(token: &str) -> Result<Self, CoercionError> {
        let token = token.trim();
        let by_name = Self::variants()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token));

        let variant = match by_name {
            Some((_, variant)) => Some(*variant),
            None => token.parse::<u64>().ok().and_then(|bits| {
                Self::variants()
                    .iter()
                    .map(|(_, variant)| *variant)
                    .find(|variant| variant.bits() == bits)
            }),
        };

        variant.ok_or_else(|| CoercionError::UnknownVariant {
            token: token.to_string(),
            expected: Self::NAME,
        })
    }
}

/// Coercion shared by every [ArgumentEnum].
///
/// Enums need exactly one token. An empty queue keeps the current value, but
/// the next token is consumed even when it looks like an option.
pub fn coerce_enum<E: ArgumentEnum>(
    queue: &mut ArgumentQueue,
    _current: Option<&E>,
) -> Result<Option<E>, CoercionError> {
    match queue.pop() {
        Some(token) => E::parse(&token).map(Some),
        None => Ok(None),
    }
}

/// A type that positional members can be built from.
///
/// Implement this for values that need more than a plain assignment, like
/// loading a file from a path.
pub trait FromToken: Sized {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

impl FromToken for String {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(token)
    }
}

impl FromToken for PathBuf {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(token.into())
    }
}

impl<T: FromToken> FromToken for Option<T> {
    fn from_token(token: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        T::from_token(token).map(Some)
    }
}
