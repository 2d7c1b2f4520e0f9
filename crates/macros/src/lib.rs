use proc_macro::TokenStream;
use quote::ToTokens;
use syn::Error;

mod compute_struct;
mod symbols;

/// Implements `ComputeStruct` and `ComputeField` for a struct with named fields, so it can be registered as a
/// composite and converted to and from its instances.
///
/// The composite is named after the struct, unless renamed with `#[compute_struct(name = "...")]`. All fields must
/// implement `ComputeField`.
#[proc_macro_derive(ComputeStruct, attributes(compute_struct))]
pub fn compute_struct(content: TokenStream) -> TokenStream {
	compute_struct::compute_struct(content)
		.unwrap_or_else(Error::into_compile_error)
		.into()
}

trait AppendTokens {
	fn append_tokens(&mut self, tokens: impl ToTokens);
}

impl AppendTokens for proc_macro2::TokenStream {
	fn append_tokens(&mut self, tokens: impl ToTokens) {
		tokens.to_tokens(self)
	}
}
