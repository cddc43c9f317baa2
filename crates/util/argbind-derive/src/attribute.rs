use proc_macro2::{Ident, TokenStream};
use quote::quote;

/// The contents of an `#[argument(...)]` attribute
#[derive(Debug)]
pub(crate) struct ArgumentAttribute {
    pub(crate) name: Option<String>,
    pub(crate) alias: String,
    pub(crate) orphan_index: i32,
    pub(crate) flatten: bool,
}

impl Default for ArgumentAttribute {
    fn default() -> Self {
        Self {
            name: None,
            alias: String::new(),
            orphan_index: -1,
            flatten: false,
        }
    }
}

impl ArgumentAttribute {
    /// Finds and parses the `#[argument]` attribute, if there is one
    pub(crate) fn find(attributes: &[syn::Attribute]) -> Option<Self> {
        attributes
            .iter()
            .find(|attribute| attribute.path().is_ident("argument"))
            .map(Self::parse)
    }

    pub(crate) fn parse(attribute: &syn::Attribute) -> Self {
        let mut argument = Self::default();

        if matches!(attribute.meta, syn::Meta::Path(_)) {
            return argument;
        }

        let result = attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                argument.name = Some(meta.value()?.parse::<syn::LitStr>()?.value());
            } else if meta.path.is_ident("alias") {
                argument.alias = meta.value()?.parse::<syn::LitStr>()?.value();
            } else if meta.path.is_ident("orphan_index") {
                let value = meta.value()?;
                let is_negative = value.peek(syn::Token![-]);
                if is_negative {
                    let _: syn::Token![-] = value.parse()?;
                }
                let index: i32 = value.parse::<syn::LitInt>()?.base10_parse()?;
                argument.orphan_index = if is_negative { -index } else { index };
            } else if meta.path.is_ident("flatten") {
                argument.flatten = true;
            } else {
                return Err(meta.error("unknown key, expected one of name, alias, orphan_index or flatten"));
            }
            Ok(())
        });

        if let Err(error) = result {
            panic!("Invalid #[argument] attribute: {error}");
        }

        argument
    }

    /// The `MemberDescriptor` expression for a member called `ident`
    pub(crate) fn descriptor(&self, ident: &Ident) -> TokenStream {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
        let alias = &self.alias;
        let orphan_index = self.orphan_index;

        quote!(::argbind::MemberDescriptor::new(#name, #alias, #orphan_index))
    }
}
