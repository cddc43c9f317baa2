use proc_macro::TokenStream;
use quote::quote;

use crate::attribute::ArgumentAttribute;

pub(crate) fn derive_bindable(input: syn::DeriveInput) -> TokenStream {
    let struct_ident = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let syn::Data::Struct(syn::DataStruct {
        fields: syn::Fields::Named(fields),
        ..
    }) = &input.data
    else {
        panic!("Bindable can only be derived for structs with named fields");
    };

    let mut registrations = vec![];
    for field in &fields.named {
        let Some(argument) = ArgumentAttribute::find(&field.attrs) else {
            continue;
        };

        let field_ident = field.ident.as_ref().expect("struct field without ident");
        let ty = &field.ty;

        if argument.flatten {
            registrations.push(quote!(
                members.extend(
                    <#ty as ::argbind::Bindable>::members()
                        .into_iter()
                        .map(|member| member.project(|target: &mut Self| &mut target.#field_ident)),
                );
            ));
            continue;
        }

        let descriptor = argument.descriptor(field_ident);
        let constructor = if argument.orphan_index < 0 {
            quote!(field)
        } else {
            quote!(positional)
        };

        registrations.push(quote!(
            members.push(::argbind::Member::#constructor(
                #descriptor,
                |target: &mut Self| &mut target.#field_ident,
            ));
        ));
    }

    if has_actions(&input.attrs) {
        registrations.push(quote!(
            members.extend(<Self as ::argbind::Actions>::actions());
        ));
    }

    quote!(
        #[automatically_derived]
        impl #impl_generics ::argbind::Bindable for #struct_ident #type_generics #where_clause {
            fn members() -> ::std::vec::Vec<::argbind::Member<Self>> {
                #[allow(unused_mut)]
                let mut members = ::std::vec::Vec::new();
                #(
                    #registrations
                )*
                members
            }
        }
    )
    .into()
}

/// Whether the struct is marked with `#[bind(actions)]`
fn has_actions(attributes: &[syn::Attribute]) -> bool {
    let mut actions = false;

    for attribute in attributes.iter().filter(|a| a.path().is_ident("bind")) {
        let result = attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("actions") {
                actions = true;
                Ok(())
            } else {
                Err(meta.error("unknown key, expected actions"))
            }
        });

        if let Err(error) = result {
            panic!("Invalid #[bind] attribute: {error}");
        }
    }

    actions
}
