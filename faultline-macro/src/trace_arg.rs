use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

pub fn derive_trace_arg(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::faultline::trace::TraceArg for #name #ty_generics #where_clause {
            fn to_arg_value(&self) -> ::faultline::trace::ArgValue {
                ::faultline::trace::ArgValue::object(#type_name)
            }
        }
    }
    .into()
}
