//! Binds command-line tokens to annotated target types.
//!
//! A target declares which of its fields and methods are reachable from the
//! command line:
//! ```text, ignore
//! #[derive(Default, Bindable)]
//! #[bind(actions)]
//! struct Modify {
//!     #[argument(name = "game", orphan_index = 0)]
//!     game: Option<PathBuf>,
//!
//!     #[argument(name = "limit", alias = "l")]
//!     limit: i32,
//! }
//!
//! #[actions]
//! impl Modify {
//!     #[argument(name = "dump-headers")]
//!     fn dump_headers(&mut self, path: String) { ... }
//! }
//! ```
//! Binding `game.swf -l 10 --dump-headers out.txt rest` against it
//! * builds `game` from `game.swf`
//! * assigns `10` to `limit`
//! * returns a pending call to `dump_headers("out.txt")`
//! * leaves `rest` in the queue

mod binder;
mod catalog;
pub mod coerce;
mod error;
mod flags;
mod invocation;
mod member;
mod queue;

pub use argbind_derive::{actions, ArgumentEnum, Bindable};

pub use binder::{bind, populate, Binding};
pub use catalog::{Actions, Bindable, Catalog};
pub use coerce::{coerce_enum, ArgumentEnum, Coerce, FromToken, Strategy};
pub use error::{BindError, CoercionError, ConfigurationError};
pub use flags::FlagSet;
pub use invocation::{build_invocation, ActionOutcome, ActionResult, Arguments, PendingInvocation};
pub use member::{Field, Member, MemberDescriptor, MemberKind, Method, Parameter, Positional};
pub use queue::{is_option, ArgumentQueue, OPTION_PREFIX};
