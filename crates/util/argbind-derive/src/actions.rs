use proc_macro::TokenStream;
use quote::{format_ident, quote};

use crate::attribute::ArgumentAttribute;

pub(crate) fn expand_actions(mut item: syn::ItemImpl) -> TokenStream {
    let mut members = vec![];

    for impl_item in &mut item.items {
        let syn::ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let Some(position) = method
            .attrs
            .iter()
            .position(|attribute| attribute.path().is_ident("argument"))
        else {
            continue;
        };

        let argument = ArgumentAttribute::parse(&method.attrs.remove(position));
        let method_ident = method.sig.ident.clone();

        if argument.flatten {
            panic!("Action {method_ident} cannot be flattened");
        }
        if !method.sig.generics.params.is_empty() || method.sig.asyncness.is_some() {
            panic!("Action {method_ident} cannot be generic or async");
        }
        match method.sig.inputs.first() {
            Some(syn::FnArg::Receiver(receiver)) if receiver.reference.is_some() => {},
            _ => panic!("Action {method_ident} must take &self or &mut self"),
        }

        let mut parameters = vec![];
        let mut takes = vec![];
        let mut bindings = vec![];

        for (index, input) in method.sig.inputs.iter_mut().skip(1).enumerate() {
            let syn::FnArg::Typed(typed) = input else {
                panic!("Action {method_ident} has more than one receiver");
            };

            let default = take_default(&mut typed.attrs);
            let ty = &typed.ty;
            let parameter_name = match &*typed.pat {
                syn::Pat::Ident(pattern) => pattern.ident.to_string(),
                _ => format!("argument{index}"),
            };

            parameters.push(match default {
                Some(default) => quote!(
                    ::argbind::Parameter::with_default::<#ty>(#parameter_name, || -> #ty { #default })
                ),
                None => quote!(::argbind::Parameter::new::<#ty>(#parameter_name)),
            });

            let binding = format_ident!("argument_{index}");
            takes.push(quote!(let #binding = arguments.take::<#ty>(#index)?;));
            bindings.push(binding);
        }

        let arguments_binding = if bindings.is_empty() {
            quote!(let _ = arguments;)
        } else {
            quote!(let mut arguments = arguments;)
        };

        let descriptor = argument.descriptor(&method_ident);
        members.push(quote!(
            ::argbind::Member::method(
                #descriptor,
                ::std::vec![#(#parameters),*],
                |target: &mut Self, arguments: ::argbind::Arguments| -> ::argbind::ActionResult {
                    #arguments_binding
                    #(#takes)*
                    ::argbind::ActionOutcome::into_result(target.#method_ident(#(#bindings),*))
                },
            )
        ));
    }

    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    quote!(
        #item

        #[automatically_derived]
        impl #impl_generics ::argbind::Actions for #self_ty #where_clause {
            fn actions() -> ::std::vec::Vec<::argbind::Member<Self>> {
                ::std::vec![#(#members),*]
            }
        }
    )
    .into()
}

/// Removes the `#[default(...)]` attribute of a parameter and returns its expression
fn take_default(attributes: &mut Vec<syn::Attribute>) -> Option<syn::Expr> {
    let position = attributes
        .iter()
        .position(|attribute| attribute.path().is_ident("default"))?;

    let attribute = attributes.remove(position);
    match attribute.parse_args() {
        Ok(expression) => Some(expression),
        Err(error) => panic!("#[default(...)] expects an expression: {error}"),
    }
}
