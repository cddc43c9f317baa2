use std::collections::{btree_map, hash_map, BTreeMap, HashMap};

use crate::{
    member::{Member, MemberKind},
    ConfigurationError,
};

/// A type whose members can be bound from the command line.
///
/// Usually derived with `#[derive(Bindable)]`, but the member list can just as
/// well be assembled by hand with [Member::field], [Member::positional] and
/// [Member::method].
pub trait Bindable: Sized + 'static {
    fn members() -> Vec<Member<Self>>;
}

/// The action methods of a type, generated by `#[actions]` on an impl block
pub trait Actions: Sized + 'static {
    fn actions() -> Vec<Member<Self>>;
}

/// The alias table and positional list of a target type.
///
/// A catalog is immutable once built and can be reused for any number of
/// binding calls.
pub struct Catalog<T> {
    members: Vec<Member<T>>,

    /// Maps `--name` and `-alias` to an index into `members`
    aliases: HashMap<String, usize>,

    /// Indices into `members`, ordered by orphan index
    positionals: Vec<usize>,
}

impl<T: Bindable> Catalog<T> {
    /// Builds the catalog of a [Bindable] type
    pub fn of() -> Result<Self, ConfigurationError> {
        Self::new(T::members())
    }
}

impl<T> Catalog<T> {
    /// Validates the metadata of `members` and indexes them.
    ///
    /// Fails if a name or alias is used twice, if two members share an orphan
    /// index, or if a member is declared positional but cannot be.
    pub fn new(members: Vec<Member<T>>) -> Result<Self, ConfigurationError> {
        let mut aliases = HashMap::new();
        let mut positionals = BTreeMap::new();

        for (index, member) in members.iter().enumerate() {
            let descriptor = member.descriptor();

            let Some(position) = descriptor.position() else {
                if matches!(member.kind(), MemberKind::Positional(_)) {
                    return Err(ConfigurationError::PositionalOnly(descriptor.name));
                }

                register(&mut aliases, descriptor.long_option(), index)?;
                if let Some(short_option) = descriptor.short_option() {
                    register(&mut aliases, short_option, index)?;
                }
                continue;
            };

            match member.kind() {
                MemberKind::Positional(_) => {},
                MemberKind::Field(_) => {
                    return Err(ConfigurationError::NotConstructible(descriptor.name));
                },
                MemberKind::Method(_) => {
                    return Err(ConfigurationError::PositionalMethod(descriptor.name));
                },
            }

            match positionals.entry(position) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(index);
                },
                btree_map::Entry::Occupied(entry) => {
                    return Err(ConfigurationError::DuplicatePosition {
                        index: position,
                        first: members[*entry.get()].name(),
                        second: descriptor.name,
                    });
                },
            }
        }

        log::debug!(
            "Catalog for {} has {} options and {} positional members",
            std::any::type_name::<T>(),
            aliases.len(),
            positionals.len()
        );

        Ok(Self {
            members,
            aliases,
            positionals: positionals.into_values().collect(),
        })
    }

    /// Finds the member an option token refers to
    #[must_use]
    pub fn lookup(&self, option: &str) -> Option<&Member<T>> {
        self.aliases.get(option).map(|&index| &self.members[index])
    }

    /// Positional members, in ascending orphan index order
    pub fn positionals(&self) -> impl Iterator<Item = &Member<T>> {
        self.positionals.iter().map(|&index| &self.members[index])
    }

    /// Every registered option token, in no particular order
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    #[must_use]
    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }
}

fn register(
    aliases: &mut HashMap<String, usize>,
    option: String,
    index: usize,
) -> Result<(), ConfigurationError> {
    match aliases.entry(option) {
        hash_map::Entry::Vacant(entry) => {
            entry.insert(index);
            Ok(())
        },
        hash_map::Entry::Occupied(entry) => {
            Err(ConfigurationError::DuplicateOption(entry.key().clone()))
        },
    }
}
