use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span};
use quote::format_ident;
use syn::{Path, PathSegment, Token, punctuated};

pub struct Symbols {
	pub crate_private: Path,
}

impl Symbols {
	pub fn new() -> Result<Self, syn::Error> {
		let span = Span::call_site();
		let crate_ident = match crate_name("compute-struct") {
			// `compute_struct` declares `extern crate self as compute_struct` so doctests and its own tests resolve
			Ok(FoundCrate::Itself) => format_ident!("compute_struct"),
			Ok(FoundCrate::Name(name)) => format_ident!("{}", name),
			Err(err) => return Err(syn::Error::new(span, err)),
		};
		Ok(Self {
			crate_private: idents_to_path(&[&crate_ident, &format_ident!("__private")]),
		})
	}
}

fn idents_to_path(idents: &[&Ident]) -> Path {
	Path {
		leading_colon: Some(Token![::](Span::call_site())),
		segments: punctuated::Punctuated::from_iter(idents.iter().map(|i| PathSegment::from((*i).clone()))),
	}
}
