use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;

/// Derives `Display` and `std::error::Error` for an enum.
///
/// Every variant needs a `#[msg = "..."]` attribute. The message may refer to
/// tuple fields by index (`{0}`) and to named fields by name (`{member}`),
/// including format specs (`{0:?}`).
///
/// A tuple field marked with `#[source]` is returned from `Error::source`.
/// If it is the only field of its variant, a `From` impl is generated as well.
#[proc_macro_derive(Error, attributes(msg, source))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    let item: syn::ItemEnum = syn::parse(input).expect("Could not parse input as enum");

    let name = &item.ident;
    let (impl_generics, type_generics, where_clause) = item.generics.split_for_impl();

    let mut variant_displays = vec![];
    let mut from_impls = vec![];
    let mut variant_sources = vec![];

    for variant in &item.variants {
        let ident = &variant.ident;

        let Some(message) = message_attribute(&variant.attrs) else {
            panic!("{ident} needs a #[msg = \"...\"] attribute");
        };
        let (format_string, referenced) = parse_message(&message.value());
        let format_string = syn::LitStr::new(&format_string, message.span());

        match &variant.fields {
            syn::Fields::Unit => {
                if !referenced.is_empty() {
                    panic!("{ident} has no fields to refer to in its message");
                }
                variant_displays.push(quote!(Self::#ident => write!(f, #format_string)));
            },
            syn::Fields::Unnamed(unnamed_fields) => {
                let bindings: Vec<Ident> = (0..unnamed_fields.unnamed.len())
                    .map(positional_binding)
                    .collect();
                let arguments = format_arguments(&referenced);

                variant_displays.push(quote!(
                    Self::#ident(#(#bindings,)*) => write!(f, #format_string #(, #arguments)*)
                ));

                let source_fields: Vec<usize> = unnamed_fields
                    .unnamed
                    .iter()
                    .enumerate()
                    .filter(|(_, field)| field.attrs.iter().any(|a| a.path().is_ident("source")))
                    .map(|(index, _)| index)
                    .collect();

                match source_fields.as_slice() {
                    [] => {},
                    [index] => {
                        let binding = positional_binding(*index);
                        variant_sources.push(quote!(
                            Self::#ident(#(#bindings,)*) => Some(#binding)
                        ));

                        if unnamed_fields.unnamed.len() == 1 {
                            let ty = &unnamed_fields.unnamed[0].ty;
                            from_impls.push(quote!(
                                #[automatically_derived]
                                impl #impl_generics From<#ty> for #name #type_generics #where_clause {
                                    fn from(value: #ty) -> Self {
                                        Self::#ident(value)
                                    }
                                }
                            ));
                        }
                    },
                    _ => panic!("{ident} has more than one #[source] field"),
                }
            },
            syn::Fields::Named(named_fields) => {
                if named_fields
                    .named
                    .iter()
                    .any(|field| field.attrs.iter().any(|a| a.path().is_ident("source")))
                {
                    panic!("#[source] is only supported on tuple variants");
                }

                let field_names: Vec<&Ident> = named_fields
                    .named
                    .iter()
                    .flat_map(|field| &field.ident)
                    .filter(|field| referenced.contains(&field.to_string()))
                    .collect();

                if field_names.len() != referenced.len() {
                    panic!("The message of {ident} refers to a field that does not exist");
                }

                let arguments = format_arguments(&referenced);
                variant_displays.push(quote!(
                    Self::#ident { #(#field_names,)* .. } => write!(f, #format_string #(, #arguments)*)
                ));
            },
        }
    }

    quote!(
        #[automatically_derived]
        impl #impl_generics ::std::fmt::Display for #name #type_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> Result<(), ::std::fmt::Error> {
                match self {
                    #(
                        #variant_displays,
                    )*
                }
            }
        }

        #(
            #from_impls
        )*

        #[automatically_derived]
        impl #impl_generics ::std::error::Error for #name #type_generics #where_clause {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                #[allow(unreachable_patterns, unused_variables)]
                match self {
                    #(
                        #variant_sources,
                    )*
                    _ => None,
                }
            }
        }
    )
    .into()
}

fn message_attribute(attributes: &[syn::Attribute]) -> Option<syn::LitStr> {
    attributes
        .iter()
        .flat_map(|attr| match &attr.meta {
            syn::Meta::NameValue(name_value) if name_value.path.is_ident("msg") => {
                Some(&name_value.value)
            },
            _ => None,
        })
        .map(|value| match value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(message),
                ..
            }) => message.clone(),
            _ => panic!("#[msg] expects a string literal"),
        })
        .next()
}

fn positional_binding(index: usize) -> Ident {
    Ident::new(&format!("_{index}"), Span::call_site())
}

/// Rewrites the placeholders of a message so that tuple fields can be passed
/// as named format arguments.
///
/// Returns the rewritten format string and the names of every referenced field,
/// without duplicates and in order of first appearance.
fn parse_message(message: &str) -> (String, Vec<String>) {
    let mut format_string = String::with_capacity(message.len());
    let mut referenced: Vec<String> = vec![];

    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        format_string.push(c);
        if c != '{' {
            continue;
        }

        if chars.peek() == Some(&'{') {
            format_string.push('{');
            chars.next();
            continue;
        }

        let mut argument = String::new();
        while let Some(&next) = chars.peek() {
            if next == '}' || next == ':' {
                break;
            }
            argument.push(next);
            chars.next();
        }

        if argument.is_empty() {
            panic!("Message placeholders must name a field: {message:?}");
        }

        if argument.chars().all(|c| c.is_ascii_digit()) {
            argument.insert(0, '_');
        }

        format_string.push_str(&argument);
        if !referenced.contains(&argument) {
            referenced.push(argument);
        }
    }

    (format_string, referenced)
}

fn format_arguments(referenced: &[String]) -> Vec<proc_macro2::TokenStream> {
    referenced
        .iter()
        .map(|name| {
            let ident = Ident::new(name, Span::call_site());
            quote!(#ident = #ident)
        })
        .collect()
}
