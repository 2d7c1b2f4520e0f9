use crate::AppendTokens;
use crate::symbols::Symbols;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Result};

pub fn compute_struct(content: proc_macro::TokenStream) -> Result<TokenStream> {
	let symbols = Symbols::new()?;
	let item = syn::parse::<DeriveInput>(content)?;
	if !item.generics.params.is_empty() {
		return Err(Error::new_spanned(
			&item.generics,
			"ComputeStruct may not be derived for generic structs",
		));
	}
	let fields = match &item.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(named) => &named.named,
			Fields::Unnamed(_) | Fields::Unit => {
				return Err(Error::new_spanned(
					&item.ident,
					"ComputeStruct requires a struct with named fields",
				));
			}
		},
		Data::Enum(_) | Data::Union(_) => {
			return Err(Error::new_spanned(&item.ident, "ComputeStruct requires a struct"));
		}
	};
	if fields.is_empty() {
		return Err(Error::new_spanned(&item.ident, "ComputeStruct requires at least one field"));
	}

	let mut name = LitStr::new(&item.ident.to_string(), item.ident.span());
	for attr in item.attrs.iter().filter(|a| a.path().is_ident("compute_struct")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				name = meta.value()?.parse()?;
				Ok(())
			} else {
				Err(meta.error("unknown compute_struct attribute, expected `name`"))
			}
		})?;
	}

	let p = &symbols.crate_private;
	let count = fields.len();
	let mut declare = TokenStream::new();
	let mut to_values = TokenStream::new();
	let mut from_values = TokenStream::new();
	for (i, f) in fields.iter().enumerate() {
		let ident = f.ident.as_ref().ok_or_else(|| Error::new_spanned(f, "field has no name"))?;
		let ty = &f.ty;
		let field_name = LitStr::new(&ident.unraw().to_string(), ident.span());
		declare.append_tokens(quote! {
			.shaped(#field_name, <#ty as #p::ComputeField>::declare(registry)?)
		});
		to_values.append_tokens(quote! {
			#p::field_to_value(&self.#ident, fields[#i].kind()).map_err(|e| e.within(#field_name))?,
		});
		from_values.append_tokens(quote! {
			#ident: #p::field_from_value::<#ty>(&values[#i]).map_err(|e| e.within(#field_name))?,
		});
	}

	let ident = &item.ident;
	Ok(quote! {
		impl #p::ComputeStruct for #ident {
			const NAME: &'static str = #name;

			fn declare_struct(
				registry: &mut #p::TypeRegistryBuilder,
			) -> ::core::result::Result<#p::CompositeId, #p::DeclarationError> {
				let decl = #p::CompositeDecl::new(<Self as #p::ComputeStruct>::NAME) #declare;
				registry.declare_or_reuse(decl)
			}

			fn to_instance(
				&self,
				layout: &#p::Arc<#p::StructLayout>,
			) -> ::core::result::Result<#p::Instance, #p::ShapeError> {
				let fields = #p::struct_fields(layout, <Self as #p::ComputeStruct>::NAME, #count)?;
				let values = ::std::vec![#to_values];
				#p::Instance::from_values(#p::Arc::clone(layout), values)
			}

			fn from_instance(instance: &#p::Instance) -> ::core::result::Result<Self, #p::ShapeError> {
				let values = #p::struct_values(instance, <Self as #p::ComputeStruct>::NAME, #count)?;
				::core::result::Result::Ok(Self { #from_values })
			}
		}

		impl #p::ComputeField for #ident {
			fn declare(
				registry: &mut #p::TypeRegistryBuilder,
			) -> ::core::result::Result<#p::FieldShape, #p::DeclarationError> {
				<Self as #p::ComputeStruct>::declare_struct(registry)?;
				::core::result::Result::Ok(#p::FieldShape::new(<Self as #p::ComputeStruct>::NAME))
			}

			fn push_leaves(
				&self,
				element: &#p::FieldKind,
				out: &mut ::std::vec::Vec<#p::Value>,
			) -> ::core::result::Result<(), #p::ShapeError> {
				#p::push_struct(self, element, out)
			}

			fn pop_leaves<'a>(
				leaves: &mut dyn ::core::iter::Iterator<Item = &'a #p::Value>,
			) -> ::core::result::Result<Self, #p::ShapeError> {
				#p::pop_struct(leaves)
			}
		}
	})
}
