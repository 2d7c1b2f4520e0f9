use crate::decl::Dims;
use crate::error::ShapeError;
use crate::layout::{ArrayLayout, FieldKind, StructLayout};
use crate::scalar::{Scalar, ScalarType};
use crate::vector::Vector;
use core::fmt::{Display, Formatter};
use std::sync::Arc;

/// The value of a single field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Scalar(Scalar),
	Vector(Vector),
	Composite(Instance),
	Array(ArrayValue),
}

impl Value {
	pub fn as_scalar(&self) -> Option<Scalar> {
		match self {
			Value::Scalar(scalar) => Some(*scalar),
			_ => None,
		}
	}

	/// The scalar as primitive `T`, `None` if this is not a scalar of kind `T::KIND`.
	pub fn scalar_as<T: ScalarType>(&self) -> Option<T> {
		T::from_scalar(self.as_scalar()?)
	}

	pub fn as_vector(&self) -> Option<&Vector> {
		match self {
			Value::Vector(vector) => Some(vector),
			_ => None,
		}
	}

	pub fn as_vector_mut(&mut self) -> Option<&mut Vector> {
		match self {
			Value::Vector(vector) => Some(vector),
			_ => None,
		}
	}

	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Value::Composite(instance) => Some(instance),
			_ => None,
		}
	}

	pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
		match self {
			Value::Composite(instance) => Some(instance),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&ArrayValue> {
		match self {
			Value::Array(array) => Some(array),
			_ => None,
		}
	}

	pub fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
		match self {
			Value::Array(array) => Some(array),
			_ => None,
		}
	}

	/// Replaces every scalar reachable from this value, including vector lanes, nested composites and array elements,
	/// with `f(scalar)` cast back to the kind of the scalar it replaces.
	pub fn map_scalars(&mut self, f: &mut dyn FnMut(Scalar) -> Scalar) {
		match self {
			Value::Scalar(scalar) => *scalar = f(*scalar).cast(scalar.kind()),
			Value::Vector(vector) => vector.map_lanes(f),
			Value::Composite(instance) => instance.map_scalars(f),
			Value::Array(array) => array.elements.iter_mut().for_each(|e| e.map_scalars(f)),
		}
	}

	/// Short description of the type of this value for error messages.
	pub(crate) fn describe(&self) -> String {
		match self {
			Value::Scalar(scalar) => scalar.kind().to_string(),
			Value::Vector(vector) => vector.kind().to_string(),
			Value::Composite(instance) => instance.name().to_string(),
			Value::Array(array) => {
				let mut out = array.elements.first().map_or_else(|| "array".to_string(), Value::describe);
				for d in &array.dims {
					out += &format!("[{d}]");
				}
				out
			}
		}
	}

	/// Verifies that this value has the shape of `kind`, recursively.
	pub(crate) fn validate(&self, kind: &FieldKind) -> Result<(), ShapeError> {
		match (kind, self) {
			(FieldKind::Scalar(expected), Value::Scalar(scalar)) if scalar.kind() == *expected => Ok(()),
			(FieldKind::Vector(expected), Value::Vector(vector)) if vector.kind() == *expected => Ok(()),
			(FieldKind::Composite(layout), Value::Composite(instance)) if instance.has_layout(layout) => {
				instance.validate()
			}
			(FieldKind::Array(layout), Value::Array(array)) if array.dims == *layout.dims() => {
				array.elements.iter().enumerate().try_for_each(|(i, element)| {
					if let Value::Array(_) = element {
						return Err(ShapeError::mismatch(layout.element(), element.describe()).within(&format!("[{i}]")));
					}
					element.validate(layout.element()).map_err(|e| e.within(&format!("[{i}]")))
				})
			}
			_ => Err(ShapeError::mismatch(kind, self.describe())),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self {
			Value::Scalar(scalar) => write!(f, "{scalar}"),
			Value::Vector(vector) => write!(f, "{vector}"),
			Value::Composite(instance) => write!(f, "{instance}"),
			Value::Array(array) => write!(f, "{array}"),
		}
	}
}

impl From<Scalar> for Value {
	fn from(value: Scalar) -> Self {
		Value::Scalar(value)
	}
}

impl From<Vector> for Value {
	fn from(value: Vector) -> Self {
		Value::Vector(value)
	}
}

impl From<Instance> for Value {
	fn from(value: Instance) -> Self {
		Value::Composite(value)
	}
}

impl From<ArrayValue> for Value {
	fn from(value: ArrayValue) -> Self {
		Value::Array(value)
	}
}

macro_rules! value_from_primitive {
	($($t:ty),*) => {$(
		impl From<$t> for Value {
			fn from(value: $t) -> Self {
				Value::Scalar(value.into())
			}
		}
	)*};
}

value_from_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// A multi dimensional array value. Elements are stored flat in row-major order, the last index varying fastest,
/// which is also the order they are placed in a buffer. Elements are never arrays themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
	dims: Dims,
	elements: Vec<Value>,
}

impl ArrayValue {
	pub fn new(dims: impl IntoIterator<Item = usize>, elements: Vec<Value>) -> Result<Self, ShapeError> {
		let dims: Dims = dims.into_iter().collect();
		let Some(len) = dims.iter().try_fold(1usize, |n, d| n.checked_mul(*d)) else {
			return Err(ShapeError::mismatch(
				format!("dimensions {dims:?} within the address space"),
				format!("{} elements", elements.len()),
			));
		};
		if dims.is_empty() || len != elements.len() {
			return Err(ShapeError::mismatch(
				format!("{len} elements for dimensions {dims:?}"),
				format!("{} elements", elements.len()),
			));
		}
		if let Some(i) = elements.iter().position(|e| matches!(e, Value::Array(_))) {
			return Err(ShapeError::mismatch("a non-array element", "a nested array").within(&format!("[{i}]")));
		}
		Ok(Self { dims, elements })
	}

	/// Creates an array from primitives in row-major order.
	pub fn from_scalars<T: ScalarType>(
		dims: impl IntoIterator<Item = usize>,
		values: &[T],
	) -> Result<Self, ShapeError> {
		Self::new(dims, values.iter().map(|v| Value::Scalar((*v).into())).collect())
	}

	/// Creates an array of the shape of `layout` by calling `f` with the flat index of every element.
	pub(crate) fn try_from_layout<E>(
		layout: &ArrayLayout,
		f: impl FnMut(usize) -> Result<Value, E>,
	) -> Result<Self, E> {
		Ok(Self {
			dims: layout.dims().clone(),
			elements: (0..layout.element_count()).map(f).collect::<Result<_, _>>()?,
		})
	}

	pub fn dims(&self) -> &Dims {
		&self.dims
	}

	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	pub fn elements(&self) -> &[Value] {
		&self.elements
	}

	/// Elements may be replaced freely, the shape is validated again before encoding.
	pub fn elements_mut(&mut self) -> &mut [Value] {
		&mut self.elements
	}

	/// The element at `index`, one entry per dimension.
	pub fn get(&self, index: &[usize]) -> Option<&Value> {
		self.elements.get(self.flat_index(index)?)
	}

	pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut Value> {
		let flat = self.flat_index(index)?;
		self.elements.get_mut(flat)
	}

	fn flat_index(&self, index: &[usize]) -> Option<usize> {
		if index.len() != self.dims.len() {
			return None;
		}
		index.iter().zip(&self.dims).try_fold(0, |flat, (i, d)| (i < d).then_some(flat * d + i))
	}
}

impl Display for ArrayValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		fn nested(f: &mut Formatter<'_>, dims: &[usize], elements: &[Value]) -> core::fmt::Result {
			f.write_str("[")?;
			match dims {
				[_] => {
					for (i, e) in elements.iter().enumerate() {
						if i != 0 {
							f.write_str(", ")?;
						}
						write!(f, "{e}")?;
					}
				}
				[_, inner @ ..] => {
					let stride = inner.iter().product::<usize>();
					for (i, chunk) in elements.chunks(stride.max(1)).enumerate() {
						if i != 0 {
							f.write_str(", ")?;
						}
						nested(f, inner, chunk)?;
					}
				}
				[] => {}
			}
			f.write_str("]")
		}
		nested(f, &self.dims, &self.elements)
	}
}

/// A live value of a composite: one [`Value`] per field of its [`StructLayout`], in field order.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
	layout: Arc<StructLayout>,
	values: Vec<Value>,
}

impl Instance {
	/// Creates an instance from one value per field, verifying that every value matches its field.
	pub fn from_values(layout: Arc<StructLayout>, values: Vec<Value>) -> Result<Self, ShapeError> {
		let instance = Self { layout, values };
		instance.validate()?;
		Ok(instance)
	}

	pub(crate) fn new_unchecked(layout: Arc<StructLayout>, values: Vec<Value>) -> Self {
		Self { layout, values }
	}

	pub fn layout(&self) -> &Arc<StructLayout> {
		&self.layout
	}

	pub fn name(&self) -> &str {
		self.layout.name()
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub(crate) fn values_mut(&mut self) -> &mut [Value] {
		&mut self.values
	}

	pub fn get(&self, field: &str) -> Result<&Value, ShapeError> {
		let index = self.index_of(field)?;
		Ok(&self.values[index])
	}

	/// Mutable access to a field value. Replacing it by a value of another shape is only detected by
	/// [`Self::validate`], which every buffer write runs.
	pub fn get_mut(&mut self, field: &str) -> Result<&mut Value, ShapeError> {
		let index = self.index_of(field)?;
		Ok(&mut self.values[index])
	}

	/// Reads a scalar field as primitive `T`.
	pub fn get_as<T: ScalarType>(&self, field: &str) -> Result<T, ShapeError> {
		let value = self.get(field)?;
		value
			.scalar_as::<T>()
			.ok_or_else(|| ShapeError::mismatch(T::KIND, value.describe()).within(field))
	}

	pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ShapeError> {
		let index = self.index_of(field)?;
		let value = value.into();
		value
			.validate(self.layout.fields()[index].kind())
			.map_err(|e| e.within(field))?;
		self.values[index] = value;
		Ok(())
	}

	/// Verifies that every value matches its field, recursively.
	pub fn validate(&self) -> Result<(), ShapeError> {
		if self.values.len() != self.layout.fields().len() {
			return Err(ShapeError::FieldCount {
				composite: self.name().to_string(),
				expected: self.layout.fields().len(),
				found: self.values.len(),
			});
		}
		self.layout
			.fields()
			.iter()
			.zip(&self.values)
			.try_for_each(|(field, value)| value.validate(field.kind()).map_err(|e| e.within(field.name())))
	}

	/// See [`Value::map_scalars`].
	pub fn map_scalars(&mut self, f: &mut dyn FnMut(Scalar) -> Scalar) {
		self.values.iter_mut().for_each(|v| v.map_scalars(f));
	}

	pub(crate) fn has_layout(&self, layout: &Arc<StructLayout>) -> bool {
		Arc::ptr_eq(&self.layout, layout) || *self.layout == **layout
	}

	fn index_of(&self, field: &str) -> Result<usize, ShapeError> {
		self.layout.field_index(field).ok_or_else(|| ShapeError::UnknownField {
			composite: self.name().to_string(),
			field: field.to_string(),
		})
	}
}

impl Display for Instance {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}[", self.name())?;
		for (i, (field, value)) in self.layout.fields().iter().zip(&self.values).enumerate() {
			if i != 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}={value}", field.name())?;
		}
		f.write_str("]")
	}
}
