use crate::error::BufferError;
use crate::scalar::ByteOrder;
use bytemuck_derive::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Alignment of the storage allocated by [`Buffer::allocate`], the largest alignment of any vector (`long16`,
/// `double16`).
pub const BUFFER_ALIGNMENT: usize = 128;

#[repr(C, align(128))]
#[derive(Copy, Clone, Zeroable, Pod)]
struct Chunk([u8; BUFFER_ALIGNMENT]);

const_assert_eq!(core::mem::size_of::<Chunk>(), BUFFER_ALIGNMENT);
const_assert_eq!(core::mem::align_of::<Chunk>(), BUFFER_ALIGNMENT);

/// Zeroed heap storage of `len` bytes, starting at a [`BUFFER_ALIGNMENT`] aligned address.
#[derive(Clone)]
pub struct AlignedBytes {
	chunks: Vec<Chunk>,
	len: usize,
}

impl AlignedBytes {
	pub fn zeroed(len: usize) -> Self {
		Self {
			chunks: vec![Chunk([0; BUFFER_ALIGNMENT]); len.div_ceil(BUFFER_ALIGNMENT)],
			len,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl AsRef<[u8]> for AlignedBytes {
	fn as_ref(&self) -> &[u8] {
		&bytemuck::cast_slice::<Chunk, u8>(&self.chunks)[..self.len]
	}
}

impl AsMut<[u8]> for AlignedBytes {
	fn as_mut(&mut self) -> &mut [u8] {
		&mut bytemuck::cast_slice_mut::<Chunk, u8>(&mut self.chunks)[..self.len]
	}
}

impl core::fmt::Debug for AlignedBytes {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("AlignedBytes").field("len", &self.len).finish()
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BufferConfig {
	/// Byte order all scalars are stored in.
	pub byte_order: ByteOrder,
	/// Clear padding bytes while writing. Otherwise padding keeps whatever the buffer held before.
	pub zero_padding: bool,
}

impl BufferConfig {
	pub const DEFAULT: Self = BufferConfig {
		byte_order: ByteOrder::NATIVE,
		zero_padding: false,
	};

	pub fn with_byte_order(byte_order: ByteOrder) -> Self {
		Self {
			byte_order,
			..Self::DEFAULT
		}
	}
}

impl Default for BufferConfig {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// A byte region with a cursor. The capacity is fixed, writes and reads advance the cursor and fail without touching
/// any byte if the remaining capacity does not suffice.
///
/// Any byte storage can back a buffer, e.g. a `Vec<u8>` or a mapped device allocation, [`Buffer::allocate`] uses
/// [`AlignedBytes`].
#[derive(Clone, Debug)]
pub struct Buffer<S = AlignedBytes> {
	storage: S,
	position: usize,
	config: BufferConfig,
}

impl Buffer<AlignedBytes> {
	/// Allocates a zeroed, [`BUFFER_ALIGNMENT`] aligned buffer of `capacity` bytes.
	pub fn allocate(capacity: usize, config: BufferConfig) -> Self {
		Self::with_config(AlignedBytes::zeroed(capacity), config)
	}
}

impl<S: AsRef<[u8]>> Buffer<S> {
	pub fn new(storage: S, byte_order: ByteOrder) -> Self {
		Self::with_config(storage, BufferConfig::with_byte_order(byte_order))
	}

	pub fn with_config(storage: S, config: BufferConfig) -> Self {
		Self {
			storage,
			position: 0,
			config,
		}
	}

	pub fn capacity(&self) -> usize {
		self.storage.as_ref().len()
	}

	pub fn position(&self) -> usize {
		self.position
	}

	pub fn set_position(&mut self, position: usize) -> Result<(), BufferError> {
		if position > self.capacity() {
			return Err(BufferError::PositionOutOfBounds {
				position,
				capacity: self.capacity(),
			});
		}
		self.position = position;
		Ok(())
	}

	pub fn rewind(&mut self) {
		self.position = 0;
	}

	pub fn remaining(&self) -> usize {
		self.capacity() - self.position
	}

	pub fn byte_order(&self) -> ByteOrder {
		self.config.byte_order
	}

	pub fn config(&self) -> BufferConfig {
		self.config
	}

	/// The whole storage, independent of the cursor.
	pub fn as_bytes(&self) -> &[u8] {
		self.storage.as_ref()
	}

	pub fn into_inner(self) -> S {
		self.storage
	}

	/// The `len` bytes at the cursor, failing with [`BufferError::BufferUnderflow`] if fewer remain.
	pub(crate) fn peek(&self, len: usize, count: usize) -> Result<&[u8], BufferError> {
		let remaining = self.remaining();
		if len > remaining {
			return Err(BufferError::BufferUnderflow {
				count,
				required: len,
				remaining,
			});
		}
		Ok(&self.storage.as_ref()[self.position..self.position + len])
	}

	/// Moves the cursor forward, the caller must have checked the remaining capacity.
	pub(crate) fn advance(&mut self, len: usize) {
		debug_assert!(len <= self.remaining());
		self.position += len;
	}
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Buffer<S> {
	/// The `len` bytes at the cursor, failing with [`BufferError::BufferOverflow`] if fewer remain.
	pub(crate) fn peek_mut(&mut self, len: usize, count: usize) -> Result<&mut [u8], BufferError> {
		let remaining = self.remaining();
		if len > remaining {
			return Err(BufferError::BufferOverflow {
				count,
				required: len,
				remaining,
			});
		}
		let position = self.position;
		Ok(&mut self.storage.as_mut()[position..position + len])
	}
}
