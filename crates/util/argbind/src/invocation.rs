use std::{any::Any, error::Error, fmt, sync::Arc};

use crate::{
    coerce::Strategy,
    member::{Method, MemberDescriptor},
    ArgumentQueue, BindError, ConfigurationError,
};

/// What running an action produces
pub type ActionResult = Result<(), Box<dyn Error>>;

/// Return types that action methods may have
pub trait ActionOutcome {
    fn into_result(self) -> ActionResult;
}

impl ActionOutcome for () {
    fn into_result(self) -> ActionResult {
        Ok(())
    }
}

impl<E: Into<Box<dyn Error>>> ActionOutcome for Result<(), E> {
    fn into_result(self) -> ActionResult {
        self.map_err(Into::into)
    }
}

/// The resolved arguments of an action, in parameter declaration order
pub struct Arguments {
    method: &'static str,

    /// `None` once the argument has been taken
    values: Vec<Option<Box<dyn Any>>>,
}

impl Arguments {
    #[must_use]
    pub fn new(method: &'static str, values: Vec<Box<dyn Any>>) -> Self {
        Self {
            method,
            values: values.into_iter().map(Some).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at `index`, if it is still present and has type `A`
    #[must_use]
    pub fn get<A: 'static>(&self, index: usize) -> Option<&A> {
        self.values.get(index)?.as_ref()?.downcast_ref()
    }

    /// Moves the argument at `index` out of the list.
    ///
    /// The slot is left empty, taking it a second time fails with
    /// [ConfigurationError::MissingArgument].
    pub fn take<A: 'static>(&mut self, index: usize) -> Result<A, ConfigurationError> {
        let method = self.method;
        let missing = || ConfigurationError::MissingArgument { method, index };

        let slot = self.values.get_mut(index).ok_or_else(missing)?;
        let value = slot.take().ok_or_else(missing)?;

        match value.downcast::<A>() {
            Ok(value) => Ok(*value),
            Err(value) => {
                *slot = Some(value);
                Err(ConfigurationError::ArgumentType { method, index })
            },
        }
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("method", &self.method)
            .field("len", &self.values.len())
            .finish()
    }
}

/// An action together with its resolved arguments.
///
/// The binder never runs actions itself, the caller decides when (and whether)
/// to [invoke](PendingInvocation::invoke) them.
pub struct PendingInvocation<T> {
    descriptor: MemberDescriptor,
    arguments: Arguments,
    invoke: Arc<dyn Fn(&mut T, Arguments) -> ActionResult + Send + Sync>,
}

impl<T> PendingInvocation<T> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn invoke(self, target: &mut T) -> ActionResult {
        log::debug!("Invoking {}", self.descriptor.long_option());
        (self.invoke)(target, self.arguments)
    }
}

impl<T> fmt::Debug for PendingInvocation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingInvocation")
            .field("name", &self.descriptor.name)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Resolves every parameter of `method`, consuming tokens in declaration order.
///
/// Boolean parameters are rejected before any token is touched, since a toggle
/// has no meaning for a call that runs later.
pub fn build_invocation<T>(
    queue: &mut ArgumentQueue,
    descriptor: &MemberDescriptor,
    method: &Method<T>,
) -> Result<PendingInvocation<T>, BindError> {
    let parameters = method.parameters();

    if let Some(parameter) = parameters
        .iter()
        .find(|parameter| parameter.strategy() == Strategy::Toggle)
    {
        return Err(ConfigurationError::BooleanParameter {
            method: descriptor.name,
            parameter: parameter.name(),
        }
        .into());
    }

    let mut values = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        values.push(parameter.resolve(queue)?);
    }

    Ok(PendingInvocation {
        descriptor: *descriptor,
        arguments: Arguments::new(descriptor.name, values),
        invoke: method.invoker(),
    })
}
