use proc_macro::TokenStream;
use quote::quote;

use crate::attribute::ArgumentAttribute;

pub(crate) fn derive_argument_enum(input: syn::DeriveInput) -> TokenStream {
    let enum_ident = &input.ident;
    let enum_name = enum_ident.to_string();
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let syn::Data::Enum(data) = &input.data else {
        panic!("ArgumentEnum can only be derived for enums");
    };

    let mut variants = vec![];
    for variant in &data.variants {
        let variant_ident = &variant.ident;
        if !matches!(variant.fields, syn::Fields::Unit) {
            panic!("{enum_ident}::{variant_ident} has fields, ArgumentEnum variants cannot");
        }

        let matched_name = ArgumentAttribute::find(&variant.attrs)
            .and_then(|argument| argument.name)
            .unwrap_or_else(|| variant_ident.to_string());

        variants.push(quote!((#matched_name, Self::#variant_ident)));
    }

    quote!(
        #[automatically_derived]
        impl #impl_generics ::argbind::ArgumentEnum for #enum_ident #type_generics #where_clause {
            const NAME: &'static str = #enum_name;

            fn variants() -> &'static [(&'static str, Self)] {
                &[#(#variants),*]
            }

            fn bits(self) -> u64 {
                self as u64
            }
        }

        #[automatically_derived]
        impl #impl_generics ::argbind::Coerce for #enum_ident #type_generics #where_clause {
            const STRATEGY: ::argbind::Strategy = ::argbind::Strategy::Enum;

            fn coerce(
                queue: &mut ::argbind::ArgumentQueue,
                current: Option<&Self>,
            ) -> Result<Option<Self>, ::argbind::CoercionError> {
                ::argbind::coerce_enum(queue, current)
            }
        }

        #[automatically_derived]
        impl #impl_generics ::argbind::FromToken for #enum_ident #type_generics #where_clause {
            fn from_token(
                token: ::std::string::String,
            ) -> Result<Self, ::std::boxed::Box<dyn ::std::error::Error + Send + Sync>> {
                Ok(<Self as ::argbind::ArgumentEnum>::parse(&token)?)
            }
        }
    )
    .into()
}
