use crate::buffer::{Buffer, BufferConfig};
use crate::cache::TypeRef;
use crate::error::{BufferError, ShapeError};
use crate::layout::FieldKind;
use crate::scalar::ByteOrder;
use crate::value::{Instance, Value};
use crate::vector::Vector;

/// A value that can be placed in a [`Buffer`] on its own: a composite [`Instance`] or a [`Vector`].
pub trait Bufferable {
	/// Number of bytes a value occupies in a buffer, including trailing padding. Consecutive values in a buffer are
	/// `stride` bytes apart.
	fn stride(&self) -> usize;

	fn type_ref(&self) -> TypeRef;

	/// Whether `self` and `other` are of the same type and can be placed in the same array.
	fn same_type(&self, other: &Self) -> bool;

	fn validate(&self) -> Result<(), ShapeError>;

	/// Encodes this value into the start of `out`. Fails if `out` is shorter than [`Self::stride`] or this value is
	/// malformed, in which case some bytes of `out` may have been written already, see [`Self::validate`].
	fn encode(&self, out: &mut [u8], config: BufferConfig) -> Result<(), ShapeError>;

	/// Overwrites all scalars of this value with the ones encoded at the start of `bytes`.
	fn decode(&mut self, bytes: &[u8], order: ByteOrder) -> Result<(), ShapeError>;
}

fn check_len(stride: usize, len: usize) -> Result<(), ShapeError> {
	if len < stride {
		return Err(ShapeError::mismatch(format!("{stride} bytes"), format!("{len} bytes")));
	}
	Ok(())
}

impl Bufferable for Instance {
	fn stride(&self) -> usize {
		self.layout().size()
	}

	fn type_ref(&self) -> TypeRef {
		TypeRef::Composite(self.layout().id())
	}

	fn same_type(&self, other: &Self) -> bool {
		self.has_layout(other.layout())
	}

	fn validate(&self) -> Result<(), ShapeError> {
		Instance::validate(self)
	}

	fn encode(&self, out: &mut [u8], config: BufferConfig) -> Result<(), ShapeError> {
		check_len(self.stride(), out.len())?;
		encode_fields(self, out, config)
	}

	fn decode(&mut self, bytes: &[u8], order: ByteOrder) -> Result<(), ShapeError> {
		check_len(self.stride(), bytes.len())?;
		decode_fields(self, bytes, order)
	}
}

impl Bufferable for Vector {
	fn stride(&self) -> usize {
		self.kind().size()
	}

	fn type_ref(&self) -> TypeRef {
		TypeRef::Vector(self.kind())
	}

	fn same_type(&self, other: &Self) -> bool {
		self.kind() == other.kind()
	}

	fn validate(&self) -> Result<(), ShapeError> {
		Ok(())
	}

	fn encode(&self, out: &mut [u8], config: BufferConfig) -> Result<(), ShapeError> {
		check_len(self.stride(), out.len())?;
		Vector::encode(self, out, config.byte_order);
		Ok(())
	}

	fn decode(&mut self, bytes: &[u8], order: ByteOrder) -> Result<(), ShapeError> {
		check_len(self.stride(), bytes.len())?;
		Vector::decode(self, bytes, order);
		Ok(())
	}
}

/// Writes `value` at the cursor of `buffer` and moves the cursor [`Bufferable::stride`] bytes forward.
///
/// Fails with [`BufferError::BufferOverflow`] if fewer than `stride` bytes remain and with
/// [`BufferError::ShapeMismatch`] if `value` is malformed. In both cases the buffer is left unmodified.
pub fn write<T: Bufferable + ?Sized, S: AsRef<[u8]> + AsMut<[u8]>>(
	value: &T,
	buffer: &mut Buffer<S>,
) -> Result<(), BufferError> {
	let stride = value.stride();
	let config = buffer.config();
	let out = buffer.peek_mut(stride, 1)?;
	value.validate()?;
	value.encode(out, config)?;
	buffer.advance(stride);
	Ok(())
}

/// Reads `value` from the cursor of `buffer` and moves the cursor [`Bufferable::stride`] bytes forward.
///
/// Fails with [`BufferError::BufferUnderflow`] if fewer than `stride` bytes remain and with
/// [`BufferError::ShapeMismatch`] if `value` is malformed. In both cases neither `value` nor the cursor change.
pub fn read<T: Bufferable + ?Sized, S: AsRef<[u8]>>(value: &mut T, buffer: &mut Buffer<S>) -> Result<(), BufferError> {
	let stride = value.stride();
	let order = buffer.byte_order();
	let bytes = buffer.peek(stride, 1)?;
	value.validate()?;
	value.decode(bytes, order)?;
	buffer.advance(stride);
	Ok(())
}

fn encode_fields(instance: &Instance, out: &mut [u8], config: BufferConfig) -> Result<(), ShapeError> {
	let layout = instance.layout();
	if config.zero_padding {
		for range in layout.padding() {
			out[range].fill(0);
		}
	}
	for (field, value) in layout.fields().iter().zip(instance.values()) {
		encode_value(value, field.kind(), &mut out[field.offset()..field.end()], config)
			.map_err(|e| e.within(field.name()))?;
	}
	Ok(())
}

fn encode_value(value: &Value, kind: &FieldKind, out: &mut [u8], config: BufferConfig) -> Result<(), ShapeError> {
	match (kind, value) {
		(FieldKind::Scalar(expected), Value::Scalar(scalar)) if scalar.kind() == *expected => {
			scalar.write(out, config.byte_order)
		}
		(FieldKind::Vector(expected), Value::Vector(vector)) if vector.kind() == *expected => {
			vector.encode(out, config.byte_order)
		}
		(FieldKind::Composite(layout), Value::Composite(instance)) if instance.has_layout(layout) => {
			encode_fields(instance, out, config)?
		}
		(FieldKind::Array(layout), Value::Array(array)) if array.dims() == layout.dims() => {
			let stride = layout.element().size();
			for (i, (element, out)) in array.elements().iter().zip(out.chunks_exact_mut(stride)).enumerate() {
				encode_value(element, layout.element(), out, config).map_err(|e| e.within(&format!("[{i}]")))?;
			}
		}
		_ => return Err(ShapeError::mismatch(kind, value.describe())),
	}
	Ok(())
}

fn decode_fields(instance: &mut Instance, bytes: &[u8], order: ByteOrder) -> Result<(), ShapeError> {
	let layout = instance.layout().clone();
	for (field, value) in layout.fields().iter().zip(instance.values_mut()) {
		decode_value(value, field.kind(), &bytes[field.offset()..field.end()], order)
			.map_err(|e| e.within(field.name()))?;
	}
	Ok(())
}

fn decode_value(value: &mut Value, kind: &FieldKind, bytes: &[u8], order: ByteOrder) -> Result<(), ShapeError> {
	match (kind, value) {
		(FieldKind::Scalar(expected), Value::Scalar(scalar)) if scalar.kind() == *expected => {
			*scalar = expected.read(bytes, order)
		}
		(FieldKind::Vector(expected), Value::Vector(vector)) if vector.kind() == *expected => {
			vector.decode(bytes, order)
		}
		(FieldKind::Composite(layout), Value::Composite(instance)) if instance.has_layout(layout) => {
			decode_fields(instance, bytes, order)?
		}
		(FieldKind::Array(layout), Value::Array(array)) if array.dims() == layout.dims() => {
			let stride = layout.element().size();
			for (i, (element, bytes)) in array.elements_mut().iter_mut().zip(bytes.chunks_exact(stride)).enumerate() {
				decode_value(element, layout.element(), bytes, order).map_err(|e| e.within(&format!("[{i}]")))?;
			}
		}
		(kind, value) => return Err(ShapeError::mismatch(kind, value.describe())),
	}
	Ok(())
}
