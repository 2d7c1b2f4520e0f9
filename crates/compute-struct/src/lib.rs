//! Transfers structured data between host values and raw byte buffers laid out by the OpenCL C compute ABI.
//!
//! Composites are declared at runtime in a [`TypeRegistry`](registry::TypeRegistry), or derived from Rust structs with
//! [`#[derive(ComputeStruct)]`](derive@ComputeStruct). Their [`StructLayout`](layout::StructLayout) is computed once by
//! the [`LayoutCache`](cache::LayoutCache), which also creates fresh [`Instance`](value::Instance)s. The
//! [`buffers`] module then writes arrays of instances or vectors into a [`Buffer`](buffer::Buffer) and reads them back.

extern crate self as compute_struct;

pub mod buffer;
pub mod buffers;
pub mod cache;
pub mod classify;
pub mod codec;
pub mod decl;
pub mod error;
mod init;
pub mod layout;
pub mod registry;
pub mod scalar;
pub mod typed;
pub mod value;
pub mod vector;

pub use compute_struct_macros::ComputeStruct;
pub use typed::ComputeStruct;

pub mod __private {
	pub use crate::decl::{CompositeDecl, FieldShape};
	pub use crate::error::{DeclarationError, ShapeError};
	pub use crate::layout::{FieldKind, StructLayout};
	pub use crate::registry::{CompositeId, TypeRegistryBuilder};
	pub use crate::typed::{
		field_from_value, field_to_value, pop_struct, push_struct, struct_fields, struct_values, ComputeField,
		ComputeStruct,
	};
	pub use crate::value::{Instance, Value};
	pub use std::sync::Arc;
}
