use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Expr, Ident, LitStr, Result, Token};

use proc_macro_crate::{FoundCrate, crate_name};

/// Placeholder for one interpolated argument.
const PLACEHOLDER: &str = "${}";

struct CssInput {
    template: LitStr,
    args: Vec<Expr>,
}

impl Parse for CssInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let template: LitStr = input.parse()?;
        let args = if input.is_empty() {
            Vec::new()
        } else {
            input.parse::<Token![,]>()?;
            Punctuated::<Expr, Token![,]>::parse_terminated(input)?
                .into_iter()
                .collect()
        };
        Ok(Self { template, args })
    }
}

/// Split a template on placeholders. Always returns `placeholders + 1`
/// chunks; chunks may be empty.
fn split_template(template: &str) -> Vec<&str> {
    template.split(PLACEHOLDER).collect()
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn styled_crate_path() -> TokenStream2 {
    match crate_name("styled-sheet") {
        Ok(FoundCrate::Itself) => quote!(::styled_sheet),
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::styled_sheet),
    }
}

// =============================================================================
// Code generation
// =============================================================================

fn interpolation(arg: &Expr, krate: &TokenStream2) -> TokenStream2 {
    match arg {
        // closures are evaluated against the execution context
        Expr::Closure(_) => quote!(#krate::Interpolation::func(#arg)),
        _ => quote!(#krate::Interpolation::from(#arg)),
    }
}

/// Build a `RuleSet` from a CSS template.
///
/// Each `${}` in the template takes the next argument. Closures become
/// function fragments evaluated per render; everything else converts with
/// `Interpolation::from`.
///
/// ```ignore
/// let button = css!(
///     "color: ${}; padding: ${};",
///     |ctx: &ExecutionContext| ctx.prop_str("color").unwrap_or("black").to_string(),
///     "4px",
/// );
/// ```
#[proc_macro]
pub fn css(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as CssInput);
    let krate = styled_crate_path();

    let template = input.template.value();
    let chunks = split_template(&template);
    let placeholders = chunks.len() - 1;

    if placeholders != input.args.len() {
        return syn::Error::new(
            input.template.span(),
            format!(
                "css! template has {} placeholder(s) but {} argument(s) were given",
                placeholders,
                input.args.len()
            ),
        )
        .to_compile_error()
        .into();
    }

    let mut parts = Vec::with_capacity(chunks.len() + input.args.len());
    for (i, chunk) in chunks.iter().enumerate() {
        if !chunk.is_empty() {
            parts.push(quote!(#krate::Interpolation::from(#chunk)));
        }
        if let Some(arg) = input.args.get(i) {
            parts.push(interpolation(arg, &krate));
        }
    }

    let expanded = quote! {
        #krate::RuleSet::new(::std::vec![#(#parts),*])
    };
    expanded.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_empty_edges() {
        assert_eq!(split_template("${}; color: ${};"), vec!["", "; color: ", ";"]);
        assert_eq!(split_template("color: red;"), vec!["color: red;"]);
        assert_eq!(split_template(""), vec![""]);
    }

    #[test]
    fn parse_template_and_args() {
        let input: CssInput = syn::parse_str(r#""a: ${}; b: ${};", x, |ctx| y(ctx),"#).unwrap();
        assert_eq!(input.template.value(), "a: ${}; b: ${};");
        assert_eq!(input.args.len(), 2);
        assert!(matches!(input.args[1], Expr::Closure(_)));
    }

    #[test]
    fn closures_become_functions() {
        let krate = quote!(::styled_sheet);
        let closure: Expr = syn::parse_str("|ctx| ctx.prop(\"a\")").unwrap();
        let value: Expr = syn::parse_str("theme.primary").unwrap();
        assert!(interpolation(&closure, &krate).to_string().contains("func"));
        assert!(interpolation(&value, &krate).to_string().contains("from"));
    }
}
