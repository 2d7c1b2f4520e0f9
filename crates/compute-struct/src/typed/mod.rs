//! Typed access to composites through Rust structs, see [`ComputeStruct`].

use crate::decl::FieldShape;
use crate::error::{DeclarationError, ShapeError};
use crate::layout::{FieldKind, FieldLayout, StructLayout};
use crate::registry::{CompositeId, TypeRegistryBuilder};
use crate::value::{ArrayValue, Instance, Value};
use std::sync::Arc;

#[cfg(feature = "glam")]
mod glam;
mod primitive;

#[cfg(feature = "glam")]
pub use self::glam::VectorType;

/// A Rust type usable as the type of a field of a [`ComputeStruct`]: primitives, glam vectors, other
/// `ComputeStruct`s and fixed size arrays of all of these.
pub trait ComputeField: Sized {
	/// Declares the type of a field of this type, registering all composites it refers to.
	fn declare(registry: &mut TypeRegistryBuilder) -> Result<FieldShape, DeclarationError>;

	/// Appends this value to `out`. Arrays append all their elements in row-major order, with `element` being the
	/// element kind of the array.
	fn push_leaves(&self, element: &FieldKind, out: &mut Vec<Value>) -> Result<(), ShapeError>;

	/// Inverse of [`Self::push_leaves`], consuming as many leaves as [`Self::push_leaves`] would append.
	fn pop_leaves<'a>(leaves: &mut dyn Iterator<Item = &'a Value>) -> Result<Self, ShapeError>;
}

/// A Rust struct mirroring a composite, implemented by `#[derive(ComputeStruct)]`.
///
/// ```
/// use compute_struct::cache::LayoutCache;
/// use compute_struct::registry::TypeRegistry;
/// use compute_struct::ComputeStruct;
///
/// #[derive(ComputeStruct, Debug, PartialEq)]
/// struct Particle {
/// 	position: [f32; 3],
/// 	id: u32,
/// }
///
/// let mut builder = TypeRegistry::builder();
/// builder.register::<Particle>().unwrap();
/// let cache = LayoutCache::new(builder.build().unwrap());
/// assert_eq!(cache.layout_of_struct::<Particle>().unwrap().size(), 16);
/// ```
pub trait ComputeStruct: ComputeField {
	const NAME: &'static str;

	/// Registers this composite after all composites its fields refer to. Returns the existing id if the same composite
	/// is already registered, and fails if a different composite already uses [`Self::NAME`].
	fn declare_struct(registry: &mut TypeRegistryBuilder) -> Result<CompositeId, DeclarationError>;

	fn to_instance(&self, layout: &Arc<StructLayout>) -> Result<Instance, ShapeError>;

	fn from_instance(instance: &Instance) -> Result<Self, ShapeError>;
}

/// Converts a field of a [`ComputeStruct`] into the [`Value`] of a field of kind `kind`.
pub fn field_to_value<T: ComputeField>(value: &T, kind: &FieldKind) -> Result<Value, ShapeError> {
	match kind {
		FieldKind::Array(array) => {
			let mut leaves = Vec::with_capacity(array.element_count());
			value.push_leaves(array.element(), &mut leaves)?;
			Ok(ArrayValue::new(array.dims().iter().copied(), leaves)?.into())
		}
		kind => {
			let mut leaves = Vec::with_capacity(1);
			value.push_leaves(kind, &mut leaves)?;
			match (leaves.pop(), leaves.is_empty()) {
				(Some(leaf), true) => Ok(leaf),
				_ => Err(ShapeError::mismatch(kind, "an array")),
			}
		}
	}
}

pub fn field_from_value<T: ComputeField>(value: &Value) -> Result<T, ShapeError> {
	let leaves = match value {
		Value::Array(array) => array.elements(),
		other => std::slice::from_ref(other),
	};
	let mut iter = leaves.iter();
	let field = T::pop_leaves(&mut iter)?;
	match iter.len() {
		0 => Ok(field),
		rest => Err(ShapeError::mismatch(
			format!("{} elements", leaves.len() - rest),
			format!("{} elements", leaves.len()),
		)),
	}
}

/// The fields of `layout`, after checking that it is the layout of the composite `name` with `count` fields.
pub fn struct_fields<'a>(
	layout: &'a StructLayout,
	name: &str,
	count: usize,
) -> Result<&'a [FieldLayout], ShapeError> {
	if layout.name() != name {
		return Err(ShapeError::mismatch(name, layout.name()));
	}
	if layout.fields().len() != count {
		return Err(ShapeError::FieldCount {
			composite: name.to_string(),
			expected: count,
			found: layout.fields().len(),
		});
	}
	Ok(layout.fields())
}

/// The values of `instance`, after checking that it is an instance of the composite `name` with `count` fields.
pub fn struct_values<'a>(instance: &'a Instance, name: &str, count: usize) -> Result<&'a [Value], ShapeError> {
	struct_fields(instance.layout(), name, count)?;
	instance.validate()?;
	Ok(instance.values())
}

pub fn push_struct<T: ComputeStruct>(value: &T, element: &FieldKind, out: &mut Vec<Value>) -> Result<(), ShapeError> {
	match element {
		FieldKind::Composite(layout) => {
			out.push(value.to_instance(layout)?.into());
			Ok(())
		}
		other => Err(ShapeError::mismatch(other, T::NAME)),
	}
}

pub fn pop_struct<'a, T: ComputeStruct>(leaves: &mut dyn Iterator<Item = &'a Value>) -> Result<T, ShapeError> {
	match leaves.next() {
		Some(Value::Composite(instance)) => T::from_instance(instance),
		Some(other) => Err(ShapeError::mismatch(T::NAME, other.describe())),
		None => Err(ShapeError::mismatch(T::NAME, "no value")),
	}
}

impl<T: ComputeField, const N: usize> ComputeField for [T; N] {
	fn declare(registry: &mut TypeRegistryBuilder) -> Result<FieldShape, DeclarationError> {
		let mut shape = T::declare(registry)?;
		shape.dims.insert(0, N);
		Ok(shape)
	}

	fn push_leaves(&self, element: &FieldKind, out: &mut Vec<Value>) -> Result<(), ShapeError> {
		self.iter().try_for_each(|e| e.push_leaves(element, out))
	}

	fn pop_leaves<'a>(leaves: &mut dyn Iterator<Item = &'a Value>) -> Result<Self, ShapeError> {
		let mut out = Vec::with_capacity(N);
		for _ in 0..N {
			out.push(T::pop_leaves(leaves)?);
		}
		let found = out.len();
		out.try_into()
			.map_err(|_| ShapeError::mismatch(format!("{N} elements"), format!("{found} elements")))
	}
}
