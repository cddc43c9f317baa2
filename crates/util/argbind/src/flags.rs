use std::{fmt, hash, marker::PhantomData};

use crate::{coerce::Strategy, ArgumentEnum, ArgumentQueue, Coerce, CoercionError};

/// A combination of [ArgumentEnum] variants, stored as the bitwise OR of their values.
///
/// On the command line a set is written as a single comma-separated token,
/// for example `--mode Read,Exec`.
pub struct FlagSet<E> {
    bits: u64,
    marker: PhantomData<E>,
}

impl<E: ArgumentEnum> FlagSet<E> {
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits,
            marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub fn contains(self, flag: E) -> bool {
        self.bits & flag.bits() == flag.bits()
    }

    pub fn insert(&mut self, flag: E) {
        self.bits |= flag.bits();
    }

    /// The named variants that are part of the set
    pub fn iter(self) -> impl Iterator<Item = E> {
        E::variants()
            .iter()
            .map(|(_, flag)| *flag)
            .filter(move |flag| flag.bits() != 0 && self.contains(*flag))
    }

    /// Parses a comma-separated list of variant names.
    ///
    /// A segment may also be a decimal number, as long as every bit it sets
    /// belongs to a declared variant.
    pub fn parse(token: &str) -> Result<Self, CoercionError> {
        let mut bits = 0;
        for segment in token.split(',') {
            let segment = segment.trim();
            bits |= match segment.parse::<u64>() {
                Ok(number) if number & !E::all_bits() == 0 => number,
                Ok(_) => {
                    return Err(CoercionError::UnknownVariant {
                        token: segment.to_string(),
                        expected: E::NAME,
                    })
                },
                Err(_) => E::parse(segment)?.bits(),
            };
        }
        Ok(Self::from_bits(bits))
    }
}

impl<E: ArgumentEnum> Coerce for FlagSet<E> {
    const STRATEGY: Strategy = Strategy::FlagEnum;

    fn coerce(
        queue: &mut ArgumentQueue,
        _current: Option<&Self>,
    ) -> Result<Option<Self>, CoercionError> {
        match queue.pop() {
            Some(token) => Self::parse(&token).map(Some),
            None => Ok(None),
        }
    }
}

impl<E> Clone for FlagSet<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FlagSet<E> {}

impl<E> PartialEq for FlagSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for FlagSet<E> {}

impl<E> hash::Hash for FlagSet<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<E: ArgumentEnum> Default for FlagSet<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: ArgumentEnum> From<E> for FlagSet<E> {
    fn from(value: E) -> Self {
        Self::from_bits(value.bits())
    }
}

impl<E: ArgumentEnum> FromIterator<E> for FlagSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<E: ArgumentEnum> fmt::Debug for FlagSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", E::NAME)?;
        let mut first = true;
        for (name, flag) in E::variants() {
            if flag.bits() != 0 && self.contains(*flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}
