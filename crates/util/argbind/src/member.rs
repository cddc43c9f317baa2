use std::{any::Any, fmt, sync::Arc};

use crate::{
    coerce::{Coerce, FromToken, Strategy},
    invocation::{ActionResult, Arguments},
    ArgumentQueue, CoercionError,
};

type FieldBinder<T> =
    Arc<dyn Fn(&mut T, &mut ArgumentQueue) -> Result<(), CoercionError> + Send + Sync>;

type FieldConstructor<T> = Arc<dyn Fn(&mut T, String) -> Result<(), CoercionError> + Send + Sync>;

type Invoker<T> = Arc<dyn Fn(&mut T, Arguments) -> ActionResult + Send + Sync>;

type ParameterResolver =
    Arc<dyn Fn(&mut ArgumentQueue) -> Result<Box<dyn Any>, CoercionError> + Send + Sync>;

/// The command-line metadata of a single member
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Matched by `--name`
    pub name: &'static str,

    /// Matched by `-alias`, unless empty
    pub alias: &'static str,

    /// Negative for members that are bound by name, otherwise the rank of a
    /// positional member
    pub orphan_index: i32,
}

impl MemberDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, alias: &'static str, orphan_index: i32) -> Self {
        Self {
            name,
            alias,
            orphan_index,
        }
    }

    #[must_use]
    pub const fn keyed(name: &'static str) -> Self {
        Self::new(name, "", -1)
    }

    #[must_use]
    pub const fn with_alias(self, alias: &'static str) -> Self {
        Self { alias, ..self }
    }

    #[must_use]
    pub const fn at_position(self, orphan_index: i32) -> Self {
        Self {
            orphan_index,
            ..self
        }
    }

    /// The rank of a positional member, `None` for members bound by name
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.orphan_index).ok()
    }

    #[must_use]
    pub fn long_option(&self) -> String {
        format!("--{}", self.name)
    }

    #[must_use]
    pub fn short_option(&self) -> Option<String> {
        if self.alias.trim().is_empty() {
            None
        } else {
            Some(format!("-{}", self.alias))
        }
    }
}

/// One configurable unit of a target type
pub struct Member<T> {
    descriptor: MemberDescriptor,
    kind: MemberKind<T>,
}

pub enum MemberKind<T> {
    /// A field that is assigned through the coercion engine
    Field(Field<T>),

    /// A field that is built from a single leading token
    Positional(Positional<T>),

    /// An action whose invocation is deferred to the caller
    Method(Method<T>),
}

pub struct Field<T> {
    strategy: Strategy,
    bind: FieldBinder<T>,
}

pub struct Positional<T> {
    construct: FieldConstructor<T>,
}

pub struct Method<T> {
    parameters: Vec<Parameter>,
    invoke: Invoker<T>,
}

/// A single parameter of an action method
#[derive(Clone)]
pub struct Parameter {
    name: &'static str,
    strategy: Strategy,
    resolve: ParameterResolver,
}

impl<T: 'static> Member<T> {
    /// A field bound by name.
    ///
    /// `access` projects the target onto the field, for example
    /// `|target: &mut Settings| &mut target.limit`.
    #[must_use]
    pub fn field<F: Coerce + 'static>(
        descriptor: MemberDescriptor,
        access: fn(&mut T) -> &mut F,
    ) -> Self {
        let bind = move |target: &mut T, queue: &mut ArgumentQueue| -> Result<(), CoercionError> {
            let slot = access(target);
            if let Some(value) = F::coerce(queue, Some(&*slot))? {
                *slot = value;
            }
            Ok(())
        };

        Self {
            descriptor,
            kind: MemberKind::Field(Field {
                strategy: F::STRATEGY,
                bind: Arc::new(bind),
            }),
        }
    }

    /// A field filled from the leading tokens, before any option is parsed
    #[must_use]
    pub fn positional<F: FromToken + 'static>(
        descriptor: MemberDescriptor,
        access: fn(&mut T) -> &mut F,
    ) -> Self {
        let member = descriptor.name;
        let construct = move |target: &mut T, token: String| -> Result<(), CoercionError> {
            let value = F::from_token(token.clone()).map_err(|error| {
                CoercionError::Construction {
                    member,
                    token,
                    reason: error.to_string(),
                }
            })?;
            *access(target) = value;
            Ok(())
        };

        Self {
            descriptor,
            kind: MemberKind::Positional(Positional {
                construct: Arc::new(construct),
            }),
        }
    }

    /// An action method, called by the caller after binding has finished
    #[must_use]
    pub fn method(
        descriptor: MemberDescriptor,
        parameters: Vec<Parameter>,
        invoke: fn(&mut T, Arguments) -> ActionResult,
    ) -> Self {
        Self {
            descriptor,
            kind: MemberKind::Method(Method {
                parameters,
                invoke: Arc::new(invoke),
            }),
        }
    }

    /// Makes the member available on a type that embeds `T`
    #[must_use]
    pub fn project<U: 'static>(self, access: fn(&mut U) -> &mut T) -> Member<U> {
        let kind = match self.kind {
            MemberKind::Field(Field { strategy, bind }) => MemberKind::Field(Field {
                strategy,
                bind: Arc::new(move |outer: &mut U, queue: &mut ArgumentQueue| {
                    bind(access(outer), queue)
                }),
            }),
            MemberKind::Positional(Positional { construct }) => {
                MemberKind::Positional(Positional {
                    construct: Arc::new(move |outer: &mut U, token: String| {
                        construct(access(outer), token)
                    }),
                })
            },
            MemberKind::Method(Method { parameters, invoke }) => MemberKind::Method(Method {
                parameters,
                invoke: Arc::new(move |outer: &mut U, arguments: Arguments| {
                    invoke(access(outer), arguments)
                }),
            }),
        };

        Member {
            descriptor: self.descriptor,
            kind,
        }
    }
}

impl<T> Member<T> {
    #[must_use]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn kind(&self) -> &MemberKind<T> {
        &self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

impl<T> Field<T> {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub(crate) fn bind(&self, target: &mut T, queue: &mut ArgumentQueue) -> Result<(), CoercionError> {
        (self.bind)(target, queue)
    }
}

impl<T> Positional<T> {
    pub(crate) fn construct(&self, target: &mut T, token: String) -> Result<(), CoercionError> {
        (self.construct)(target, token)
    }
}

impl<T> Method<T> {
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn invoker(&self) -> Invoker<T> {
        Arc::clone(&self.invoke)
    }
}

impl Parameter {
    /// A parameter that starts out as `Default::default()`
    #[must_use]
    pub fn new<P: Coerce + Default + 'static>(name: &'static str) -> Self {
        Self::with_default(name, P::default)
    }

    /// A parameter with a declared default value
    #[must_use]
    pub fn with_default<P: Coerce + 'static>(name: &'static str, default: fn() -> P) -> Self {
        let resolve = move |queue: &mut ArgumentQueue| -> Result<Box<dyn Any>, CoercionError> {
            let default = default();
            let value = P::coerce(queue, Some(&default))?.unwrap_or(default);
            Ok(Box::new(value))
        };

        Self {
            name,
            strategy: P::STRATEGY,
            resolve: Arc::new(resolve),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub(crate) fn resolve(&self, queue: &mut ArgumentQueue) -> Result<Box<dyn Any>, CoercionError> {
        (self.resolve)(queue)
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            MemberKind::Field(field) => format!("Field({:?})", field.strategy),
            MemberKind::Positional(_) => "Positional".to_string(),
            MemberKind::Method(method) => format!("Method({} parameters)", method.parameters.len()),
        };

        f.debug_struct("Member")
            .field("descriptor", &self.descriptor)
            .field("kind", &kind)
            .finish()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .finish()
    }
}
