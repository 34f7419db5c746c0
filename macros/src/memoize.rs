use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};

use super::*;

mod kw {
    syn::custom_keyword!(name);
}

/// The arguments of the `memoize` attribute.
pub struct Meta {
    /// An explicit name to store results under.
    name: Option<syn::LitStr>,
}

impl Parse for Meta {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = utils::parse_key_value::<kw::name, syn::LitStr>(input)?;
        if !input.is_empty() {
            return Err(input.error("cacher: expected `name = \"...\"`"));
        }
        Ok(Self { name })
    }
}

/// Memoize a function.
pub fn expand(meta: Meta, mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    if let Some(asyncness) = &func.sig.asyncness {
        bail!(asyncness, "async functions are not supported");
    }

    let mut args = vec![];
    let mut types = vec![];
    for input in &func.sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        args.push(name);
        types.push(typed.ty.as_ref());
    }

    let name = match &meta.name {
        Some(lit) if lit.value().trim().is_empty() => {
            bail!(lit, "name must not be empty")
        }
        Some(lit) => lit.value(),
        None => func.sig.ident.unraw().to_string(),
    }
    .to_lowercase();

    // Construct a tuple from all arguments.
    let arg_tuple = quote! { (#(#args,)*) };

    // Construct assertions that the arguments fulfill the necessary bounds.
    // Argument-position `impl Trait` cannot be named, so it is skipped.
    let bounds = types
        .iter()
        .filter(|ty| !matches!(ty, syn::Type::ImplTrait(_)))
        .map(|ty| {
            quote! {
                ::cacher::internal::assert_hashable::<#ty>();
            }
        });

    // Construct the inner closure. The return type is spelled out so that `?`
    // in the body knows what to convert into.
    let body = &func.block;
    let closure = match &func.sig.output {
        syn::ReturnType::Default => quote! { |#arg_tuple| #body },
        syn::ReturnType::Type(_, ty) => {
            if let syn::Type::ImplTrait(_) = ty.as_ref() {
                bail!(ty, "`impl Trait` return types are not supported");
            }
            quote! { |#arg_tuple| -> #ty #body }
        }
    };

    // Only successful results of fallible functions are memoized.
    let memoized = if returns_result(&func.sig.output) {
        quote! { memoized_fallible }
    } else {
        quote! { memoized }
    };

    // Adjust the function's body.
    func.block = parse_quote! { {
        #(#bounds)*
        ::cacher::internal::#memoized(
            #name,
            #arg_tuple,
            #closure,
        )
    } };

    Ok(quote! { #func })
}

/// Whether the return type is spelled as some `Result<..>`.
fn returns_result(output: &syn::ReturnType) -> bool {
    let syn::ReturnType::Type(_, ty) = output else {
        return false;
    };
    let syn::Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result")
}
