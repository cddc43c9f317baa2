use crate::{
    catalog::{Bindable, Catalog},
    invocation::{build_invocation, ActionResult, PendingInvocation},
    member::MemberKind,
    queue::is_option,
    ArgumentQueue, BindError, ConfigurationError,
};

/// The outcome of a successful binding call.
///
/// Besides the queued actions, this reports the positional members that did
/// not get a token. Whether that is acceptable is up to the caller, see
/// [Binding::require_positionals].
#[derive(Debug)]
pub struct Binding<T> {
    invocations: Vec<PendingInvocation<T>>,
    unresolved: Vec<&'static str>,
}

impl<T> Binding<T> {
    /// Actions in the order their options appeared
    #[must_use]
    pub fn invocations(&self) -> &[PendingInvocation<T>] {
        &self.invocations
    }

    #[must_use]
    pub fn into_invocations(self) -> Vec<PendingInvocation<T>> {
        self.invocations
    }

    /// Names of positional members that were left unset, in orphan index order
    #[must_use]
    pub fn unresolved(&self) -> &[&'static str] {
        &self.unresolved
    }

    /// Fails if any positional member was left unset
    pub fn require_positionals(self) -> Result<Self, BindError> {
        match self.unresolved.first() {
            Some(name) => Err(BindError::MissingPositional(*name)),
            None => Ok(self),
        }
    }

    /// Runs every queued action against `target`, stopping at the first failure
    pub fn invoke_all(self, target: &mut T) -> ActionResult {
        for invocation in self.invocations {
            invocation.invoke(target)?;
        }
        Ok(())
    }
}

impl<T> Catalog<T> {
    /// Binds the tokens at the front of `queue` to `target`.
    ///
    /// Positional members are resolved first. Afterwards options are consumed
    /// until the queue is empty or its front token is not an option; that
    /// token and everything after it stay in the queue.
    ///
    /// Fields are assigned immediately, actions are returned as
    /// [PendingInvocation]s.
    ///
    /// An error stops binding at the offending token. Nothing is rolled back:
    /// fields assigned before it keep their new values and the tokens consumed
    /// so far stay consumed.
    pub fn bind(&self, target: &mut T, queue: &mut ArgumentQueue) -> Result<Binding<T>, BindError> {
        let unresolved = self.resolve_positionals(target, queue)?;

        let mut invocations = vec![];
        while queue.peek().is_some_and(is_option) {
            let Some(token) = queue.pop() else {
                break;
            };

            let Some(member) = self.lookup(&token) else {
                return Err(BindError::UnknownOption(token));
            };

            log::trace!("Binding {token} to {}", member.name());
            match member.kind() {
                MemberKind::Field(field) => field.bind(target, queue)?,
                MemberKind::Method(method) => {
                    let invocation = build_invocation(queue, member.descriptor(), method)?;
                    log::debug!("Queued {invocation:?}");
                    invocations.push(invocation);
                },
                MemberKind::Positional(_) => {
                    return Err(ConfigurationError::PositionalOnly(member.name()).into());
                },
            }
        }

        Ok(Binding {
            invocations,
            unresolved,
        })
    }

    /// Gives every positional member, in order, the chance to take the next token
    fn resolve_positionals(
        &self,
        target: &mut T,
        queue: &mut ArgumentQueue,
    ) -> Result<Vec<&'static str>, BindError> {
        let mut unresolved = vec![];

        for member in self.positionals() {
            let MemberKind::Positional(positional) = member.kind() else {
                continue;
            };

            match queue.pop_value() {
                Some(token) => {
                    log::trace!("Binding {token:?} to positional member {}", member.name());
                    positional.construct(target, token)?;
                },
                None => {
                    log::debug!("No token left for positional member {}", member.name());
                    unresolved.push(member.name());
                },
            }
        }

        Ok(unresolved)
    }
}

/// Builds the catalog of `T` and binds `queue` to `target`
pub fn bind<T: Bindable>(target: &mut T, queue: &mut ArgumentQueue) -> Result<Binding<T>, BindError> {
    Catalog::of()?.bind(target, queue)
}

/// Like [bind], for callers that have no use for actions.
///
/// Any queued invocations are dropped without running.
pub fn populate<T: Bindable>(target: &mut T, queue: &mut ArgumentQueue) -> Result<(), BindError> {
    bind(target, queue).map(drop)
}

#[cfg(test)]
mod tests {
    use crate::{
        member::{Member, MemberDescriptor, Parameter},
        ActionResult, ArgumentQueue, Arguments, BindError, Catalog, CoercionError,
    };

    #[derive(Debug, Default)]
    struct Target {
        limit: i32,
        verbose: bool,
        name: Option<String>,
        input: Option<String>,
        dumped: Vec<String>,
    }

    fn dump(target: &mut Target, mut arguments: Arguments) -> ActionResult {
        let path = arguments.take::<String>(0)?;
        target.dumped.push(path);
        Ok(())
    }

    fn catalog() -> Catalog<Target> {
        Catalog::new(vec![
            Member::field(MemberDescriptor::keyed("limit"), |t: &mut Target| &mut t.limit),
            Member::field(
                MemberDescriptor::keyed("verbose").with_alias("v"),
                |t: &mut Target| &mut t.verbose,
            ),
            Member::field(MemberDescriptor::keyed("name"), |t: &mut Target| &mut t.name),
            Member::positional(MemberDescriptor::new("input", "", 0), |t: &mut Target| {
                &mut t.input
            }),
            Member::method(
                MemberDescriptor::keyed("dump").with_alias("d"),
                vec![Parameter::new::<String>("path")],
                dump,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn options_stop_at_the_first_value() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["--limit", "10", "extra", "--verbose"]);

        let binding = catalog().bind(&mut target, &mut queue).unwrap();

        assert_eq!(target.limit, 10);
        assert!(!target.verbose);
        assert!(binding.invocations().is_empty());
        assert_eq!(queue.into_remaining(), ["extra", "--verbose"]);
    }

    #[test]
    fn toggles_leave_the_next_option_alone() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["-v", "--name", "habbo", "-v", "-v"]);

        catalog().bind(&mut target, &mut queue).unwrap();

        assert!(target.verbose);
        assert_eq!(target.name.as_deref(), Some("habbo"));
        assert!(queue.is_empty());
    }

    #[test]
    fn positionals_come_first() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["game.swf", "--limit", "3"]);

        let binding = catalog().bind(&mut target, &mut queue).unwrap();

        assert_eq!(target.input.as_deref(), Some("game.swf"));
        assert_eq!(target.limit, 3);
        assert!(binding.unresolved().is_empty());
    }

    #[test]
    fn missing_positionals_are_reported() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["--limit", "3"]);

        let binding = catalog().bind(&mut target, &mut queue).unwrap();

        assert_eq!(target.input, None);
        assert_eq!(binding.unresolved(), ["input"]);
        assert!(matches!(
            binding.require_positionals(),
            Err(BindError::MissingPositional("input"))
        ));
    }

    #[test]
    fn actions_are_deferred() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["in.swf", "-d", "a.txt", "--dump", "b.txt"]);

        let binding = catalog().bind(&mut target, &mut queue).unwrap();

        assert!(target.dumped.is_empty());
        let names: Vec<&str> = binding.invocations().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["dump", "dump"]);

        binding.invoke_all(&mut target).unwrap();
        assert_eq!(target.dumped, ["a.txt", "b.txt"]);
    }

    #[test]
    fn unknown_options_abort() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["--nope", "--limit", "4"]);

        let result = catalog().bind(&mut target, &mut queue);

        assert!(matches!(result, Err(BindError::UnknownOption(option)) if option == "--nope"));
        assert_eq!(target.limit, 0);
    }

    #[test]
    fn errors_keep_earlier_assignments() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["--limit", "3", "--nope", "-v"]);

        let result = catalog().bind(&mut target, &mut queue);

        assert!(matches!(result, Err(BindError::UnknownOption(option)) if option == "--nope"));
        assert_eq!(target.limit, 3);
        assert!(!target.verbose);
        assert_eq!(queue.into_remaining(), ["-v"]);
    }

    #[test]
    fn one_catalog_binds_many_queues() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Catalog<Target>>();

        let catalog = catalog();

        let mut first = Target::default();
        catalog
            .bind(&mut first, &mut ArgumentQueue::from(["--limit", "1"]))
            .unwrap();

        let mut second = Target::default();
        catalog
            .bind(&mut second, &mut ArgumentQueue::from(["--limit", "2", "-v"]))
            .unwrap();

        assert_eq!(first.limit, 1);
        assert!(!first.verbose);
        assert_eq!(second.limit, 2);
        assert!(second.verbose);

        let limits: Vec<i32> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["7", "8"]
                .into_iter()
                .map(|limit| {
                    let catalog = &catalog;
                    scope.spawn(move || {
                        let mut target = Target::default();
                        let mut queue = ArgumentQueue::from(["--limit", limit]);
                        catalog.bind(&mut target, &mut queue).map(|_| target.limit)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });
        assert_eq!(limits, [7, 8]);
    }

    #[test]
    fn coercion_errors_abort() {
        let mut target = Target::default();
        let mut queue = ArgumentQueue::from(["--limit", "ten"]);

        assert!(matches!(
            catalog().bind(&mut target, &mut queue),
            Err(BindError::Coercion(CoercionError::InvalidInteger { .. }))
        ));
    }
}
