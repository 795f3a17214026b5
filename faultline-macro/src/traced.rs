use proc_macro::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, parse_macro_input, FnArg, ItemFn, LitStr, Pat, Token};

struct TracedArgs {
    name: Option<LitStr>,
    class: Option<LitStr>,
}

impl Parse for TracedArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut class = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if key == "name" {
                name = Some(input.parse()?);
            } else if key == "class" {
                class = Some(input.parse()?);
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `name` or `class`",
                ));
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(TracedArgs { name, class })
    }
}

pub fn traced_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TracedArgs);
    let mut input = parse_macro_input!(item as ItemFn);

    // Frames live on the current thread's stack; an async body may resume elsewhere.
    if input.sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            input.sig.fn_token,
            "#[traced] can only be used on synchronous functions",
        )
        .to_compile_error()
        .into();
    }

    let function = match args.name {
        Some(name) => name.value(),
        None => input.sig.ident.to_string(),
    };

    let with_class = args.class.map(|class| quote! { .with_class(#class) });

    let recorded = input
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type.pat.as_ref()),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        // Destructured and `_` parameters keep their position but are not recorded.
        .filter_map(|(index, pat)| match pat {
            Pat::Ident(pat_ident) => Some((index, pat_ident.ident.clone())),
            _ => None,
        })
        .map(|(index, ident)| {
            let index = index as i64;
            quote! {
                (
                    ::faultline::trace::ArgKey::Index(#index),
                    ::faultline::trace::TraceArg::to_arg_value(&#ident),
                )
            }
        });

    let block = &input.block;
    let new_block = quote! {
        {
            let __faultline_frame = ::faultline::trace::stack::push(
                ::faultline::trace::StackFrame::new(#function)
                    #with_class
                    .with_location(file!(), line!())
                    .with_args(::std::vec![#(#recorded),*]),
            );
            #block
        }
    };

    input.block = match syn::parse2(new_block) {
        Ok(block) => block,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(quote! {
        #input
    })
}
