//! Bulk transfer of homogeneous arrays of [`Bufferable`] values.
//!
//! All checks happen before the first byte is transferred: if any of these functions fails, neither the buffer, its
//! cursor nor the values have been modified.

use crate::buffer::{Buffer, BufferConfig};
use crate::cache::LayoutCache;
use crate::codec::{self, Bufferable};
use crate::error::{BufferError, StructError};
use crate::scalar::ByteOrder;
use crate::typed::ComputeStruct;
use crate::value::Instance;

/// Verifies that `items` is a non-empty array of well-formed values of a single type and returns the number of bytes
/// they occupy in a buffer.
fn check_args<T: Bufferable>(items: &[T]) -> Result<usize, BufferError> {
	let Some(first) = items.first() else {
		return Err(BufferError::InvalidArgument("Array contains zero elements".to_string()));
	};
	if let Some(i) = items.iter().position(|item| !first.same_type(item)) {
		return Err(BufferError::InvalidArgument(format!(
			"Array element {i} of type {:?} differs from element 0 of type {:?}",
			items[i].type_ref(),
			first.type_ref()
		)));
	}
	for (i, item) in items.iter().enumerate() {
		item.validate().map_err(|e| e.within(&format!("[{i}]")))?;
	}
	first
		.stride()
		.checked_mul(items.len())
		.ok_or_else(|| BufferError::InvalidArgument(format!("{} elements exceed the address space", items.len())))
}

/// Allocates a zeroed buffer large enough to hold all `items`, without writing them.
pub fn allocate<T: Bufferable>(byte_order: ByteOrder, items: &[T]) -> Result<Buffer, BufferError> {
	allocate_with_config(BufferConfig::with_byte_order(byte_order), items)
}

pub fn allocate_with_config<T: Bufferable>(config: BufferConfig, items: &[T]) -> Result<Buffer, BufferError> {
	let size = check_args(items)?;
	Ok(Buffer::allocate(size, config))
}

/// Allocates a buffer for `items`, writes them and rewinds it, ready to be handed to a device.
pub fn to_buffer<T: Bufferable>(byte_order: ByteOrder, items: &[T]) -> Result<Buffer, BufferError> {
	let mut buffer = allocate(byte_order, items)?;
	write_all(&mut buffer, items)?;
	buffer.rewind();
	Ok(buffer)
}

/// Writes `items` at the cursor of `buffer`, one after another, each [`Bufferable::stride`] bytes apart.
pub fn write_all<T: Bufferable, S: AsRef<[u8]> + AsMut<[u8]>>(
	buffer: &mut Buffer<S>,
	items: &[T],
) -> Result<(), BufferError> {
	profiling::function_scope!();
	let required = check_args(items)?;
	let remaining = buffer.remaining();
	if required > remaining {
		return Err(BufferError::BufferOverflow {
			count: items.len(),
			required,
			remaining,
		});
	}
	tracing::trace!(count = items.len(), required, position = buffer.position(), "write_all");
	items.iter().try_for_each(|item| codec::write(item, buffer))
}

/// Reads `items` from the cursor of `buffer`, one after another, each [`Bufferable::stride`] bytes apart.
pub fn read_all<T: Bufferable, S: AsRef<[u8]>>(buffer: &mut Buffer<S>, items: &mut [T]) -> Result<(), BufferError> {
	profiling::function_scope!();
	let required = check_args(items)?;
	let remaining = buffer.remaining();
	if required > remaining {
		return Err(BufferError::BufferUnderflow {
			count: items.len(),
			required,
			remaining,
		});
	}
	tracing::trace!(count = items.len(), required, position = buffer.position(), "read_all");
	items.iter_mut().try_for_each(|item| codec::read(item, buffer))
}

/// Allocates a zeroed buffer for `count` instances of `T`.
pub fn allocate_structs<T: ComputeStruct>(
	cache: &LayoutCache,
	config: BufferConfig,
	count: usize,
) -> Result<Buffer, StructError> {
	let layout = cache.layout_of_struct::<T>()?;
	let size = layout
		.size()
		.checked_mul(count)
		.ok_or_else(|| BufferError::InvalidArgument(format!("{count} elements exceed the address space")))?;
	Ok(Buffer::allocate(size, config))
}

/// Converts `items` to instances and writes them like [`write_all`].
pub fn write_structs<T: ComputeStruct, S: AsRef<[u8]> + AsMut<[u8]>>(
	cache: &LayoutCache,
	buffer: &mut Buffer<S>,
	items: &[T],
) -> Result<(), StructError> {
	let layout = cache.layout_of_struct::<T>()?;
	let instances = items
		.iter()
		.map(|item| item.to_instance(&layout))
		.collect::<Result<Vec<_>, _>>()?;
	write_all(buffer, &instances)?;
	Ok(())
}

/// Reads `count` instances like [`read_all`] and converts them to `T`.
pub fn read_structs<T: ComputeStruct, S: AsRef<[u8]>>(
	cache: &LayoutCache,
	buffer: &mut Buffer<S>,
	count: usize,
) -> Result<Vec<T>, StructError> {
	let layout = cache.layout_of_struct::<T>()?;
	let mut instances = cache.instantiate_many(layout.id(), count)?;
	read_all(buffer, &mut instances)?;
	Ok(instances
		.iter()
		.map(T::from_instance)
		.collect::<Result<Vec<_>, _>>()?)
}

/// Instantiates `count` fresh instances of the composite `name` and reads them like [`read_all`].
pub fn read_instances<S: AsRef<[u8]>>(
	cache: &LayoutCache,
	buffer: &mut Buffer<S>,
	name: &str,
	count: usize,
) -> Result<Vec<Instance>, StructError> {
	let layout = cache.layout_of_name(name)?;
	let mut instances = cache.instantiate_many(layout.id(), count)?;
	read_all(buffer, &mut instances)?;
	Ok(instances)
}
