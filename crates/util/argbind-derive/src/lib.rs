//! Derives the binding schema of `argbind` targets

use proc_macro::TokenStream;

mod actions;
mod argument_enum;
mod attribute;
mod bindable;

/// Registers the annotated fields of a struct as bindable members.
///
/// ```text, ignore
/// #[argument(name = "limit", alias = "l")]   // bound by `--limit` or `-l`
/// #[argument(name = "game", orphan_index = 0)] // the first positional token
/// #[argument(flatten)]                       // every member of the field's type
/// ```
/// Fields without `#[argument]` are ignored. Add `#[bind(actions)]` to the
/// struct to include the methods of its `#[actions]` impl block.
#[proc_macro_derive(Bindable, attributes(argument, bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input: syn::DeriveInput = syn::parse(input).expect("Could not parse input as item");
    bindable::derive_bindable(input)
}

/// Makes a fieldless enum usable as an argument value.
///
/// Variants are matched by their name, ignoring case, unless renamed with
/// `#[argument(name = "...")]`.
#[proc_macro_derive(ArgumentEnum, attributes(argument))]
pub fn derive_argument_enum(input: TokenStream) -> TokenStream {
    let input: syn::DeriveInput = syn::parse(input).expect("Could not parse input as item");
    argument_enum::derive_argument_enum(input)
}

/// Registers the methods of an impl block that carry `#[argument(...)]` as actions.
///
/// Parameters may declare a default with `#[default(expr)]`, all others start
/// out as `Default::default()`.
#[proc_macro_attribute]
pub fn actions(attribute: TokenStream, item: TokenStream) -> TokenStream {
    if !attribute.is_empty() {
        panic!("#[actions] does not take arguments");
    }

    let item: syn::ItemImpl = syn::parse(item).expect("#[actions] can only be applied to impl blocks");
    actions::expand_actions(item)
}
