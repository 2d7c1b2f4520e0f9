use crate::decl::Dims;
use thiserror::Error;

/// Errors in the declaration of a composite, surfaced the first time its layout is requested (or on registration).
/// These are programming errors and are never retried.
#[derive(Error)]
#[non_exhaustive]
pub enum DeclarationError {
	#[error("Field \"{field}\" of composite \"{composite}\" has unsupported type \"{ty}\"")]
	UnsupportedFieldType {
		composite: String,
		field: String,
		ty: String,
	},
	#[error("Array field \"{field}\" of composite \"{composite}\" has no array length")]
	MissingArrayLength { composite: String, field: String },
	#[error("Array field \"{field}\" of composite \"{composite}\" has an array length of 0: {dims:?}")]
	InvalidArrayLength {
		composite: String,
		field: String,
		dims: Dims,
	},
	#[error("Array field \"{field}\" of composite \"{composite}\" has rank {rank} but array length {dims:?}")]
	ArrayRankMismatch {
		composite: String,
		field: String,
		rank: usize,
		dims: Dims,
	},
	#[error("Field \"{field}\" of composite \"{composite}\" is not an array but has array length {dims:?}")]
	UnexpectedArrayLength {
		composite: String,
		field: String,
		dims: Dims,
	},
	#[error("Composite \"{composite}\" may not contain instances of itself: {}", .path.join(" -> "))]
	CyclicType { composite: String, path: Vec<String> },
	#[error("Composite \"{composite}\" has no fields")]
	EmptyComposite { composite: String },
	#[error("Composite \"{composite}\" is already registered")]
	DuplicateComposite { composite: String },
	#[error("Composite \"{composite}\" is not registered")]
	UnknownComposite { composite: String },
	#[error("Layout of composite \"{composite}\" exceeds the address space")]
	LayoutOverflow { composite: String },
}

/// A value does not have the shape its layout demands. `path` names the offending field, e.g. `inner.values[2]`.
#[derive(Error)]
#[non_exhaustive]
pub enum ShapeError {
	#[error("Expected {expected} at \"{path}\" but found {found}")]
	Mismatch {
		path: String,
		expected: String,
		found: String,
	},
	#[error("Composite \"{composite}\" has {expected} fields but {found} values were given")]
	FieldCount {
		composite: String,
		expected: usize,
		found: usize,
	},
	#[error("Composite \"{composite}\" has no field \"{field}\"")]
	UnknownField { composite: String, field: String },
}

impl ShapeError {
	pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
		Self::Mismatch {
			path: String::new(),
			expected: expected.to_string(),
			found: found.to_string(),
		}
	}

	/// Prefix the path of a [`ShapeError::Mismatch`] with the field or index it was found in.
	pub fn within(self, segment: &str) -> Self {
		match self {
			Self::Mismatch { path, expected, found } => {
				let path = if path.is_empty() {
					segment.to_string()
				} else if path.starts_with('[') {
					format!("{segment}{path}")
				} else {
					format!("{segment}.{path}")
				};
				Self::Mismatch { path, expected, found }
			}
			other => other,
		}
	}
}

/// A default value for a composite or vector could not be constructed.
#[derive(Error)]
#[non_exhaustive]
pub enum InstantiationError {
	#[error("Factory for \"{ty}\" failed: {source}")]
	FactoryFailed {
		ty: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
	#[error("Factory for \"{ty}\" produced a malformed value: {source}")]
	MalformedValue {
		ty: String,
		#[source]
		source: ShapeError,
	},
	#[error("DeclarationError: {0}")]
	Declaration(#[from] DeclarationError),
}

/// Errors of a single buffer operation. All of them are detected before the first byte is transferred, so the buffer
/// is left unmodified.
#[derive(Error)]
#[non_exhaustive]
pub enum BufferError {
	#[error(
		"May not write {count} elements with a total size of {required} bytes to a buffer with {remaining} bytes remaining"
	)]
	BufferOverflow {
		count: usize,
		required: usize,
		remaining: usize,
	},
	#[error(
		"May not read {count} elements with a total size of {required} bytes from a buffer with {remaining} bytes remaining"
	)]
	BufferUnderflow {
		count: usize,
		required: usize,
		remaining: usize,
	},
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("ShapeError: {0}")]
	ShapeMismatch(#[from] ShapeError),
	#[error("Position {position} is out of bounds for a buffer with capacity {capacity}")]
	PositionOutOfBounds { position: usize, capacity: usize },
}

/// Umbrella over all errors for callers that declare, instantiate and transfer in one go.
#[derive(Error)]
#[non_exhaustive]
pub enum StructError {
	#[error("DeclarationError: {0}")]
	Declaration(#[from] DeclarationError),
	#[error("InstantiationError: {0}")]
	Instantiation(#[from] InstantiationError),
	#[error("ShapeError: {0}")]
	Shape(#[from] ShapeError),
	#[error("BufferError: {0}")]
	Buffer(#[from] BufferError),
}

macro_rules! debug_as_display {
	($($t:ty),*) => {$(
		impl core::fmt::Debug for $t {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				core::fmt::Display::fmt(self, f)
			}
		}
	)*};
}

debug_as_display!(
	DeclarationError,
	ShapeError,
	InstantiationError,
	BufferError,
	StructError
);
