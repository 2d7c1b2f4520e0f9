use crate::classify::{ClassifiedField, ElementClass, FieldClass};
use crate::decl::Dims;
use crate::error::DeclarationError;
use crate::registry::CompositeId;
use crate::scalar::ScalarKind;
use crate::vector::VectorKind;
use core::fmt::{Display, Formatter};
use std::ops::Range;
use std::sync::Arc;

/// The laid out type of a field. Nested composites carry their own finished layout, so a layout tree is
/// self-contained.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
	Scalar(ScalarKind),
	Vector(VectorKind),
	Composite(Arc<StructLayout>),
	Array(ArrayLayout),
}

impl FieldKind {
	pub fn size(&self) -> usize {
		match self {
			FieldKind::Scalar(kind) => kind.size(),
			FieldKind::Vector(kind) => kind.size(),
			FieldKind::Composite(layout) => layout.size(),
			FieldKind::Array(array) => array.size(),
		}
	}

	pub fn alignment(&self) -> usize {
		match self {
			FieldKind::Scalar(kind) => kind.alignment(),
			FieldKind::Vector(kind) => kind.alignment(),
			FieldKind::Composite(layout) => layout.alignment(),
			FieldKind::Array(array) => array.element().alignment(),
		}
	}
}

impl Display for FieldKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self {
			FieldKind::Scalar(kind) => write!(f, "{kind}"),
			FieldKind::Vector(kind) => write!(f, "{kind}"),
			FieldKind::Composite(layout) => f.write_str(layout.name()),
			FieldKind::Array(array) => {
				write!(f, "{}", array.element())?;
				array.dims().iter().try_for_each(|d| write!(f, "[{d}]"))
			}
		}
	}
}

/// A multi dimensional array of packed elements, without any padding between them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayLayout {
	element: Box<FieldKind>,
	dims: Dims,
	len: usize,
}

impl ArrayLayout {
	/// The element kind is never an array.
	pub fn element(&self) -> &FieldKind {
		&self.element
	}

	pub fn dims(&self) -> &Dims {
		&self.dims
	}

	/// Total number of elements over all dimensions, never 0.
	pub fn element_count(&self) -> usize {
		self.len
	}

	pub fn size(&self) -> usize {
		self.len * self.element.size()
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldLayout {
	name: String,
	kind: FieldKind,
	offset: usize,
}

impl FieldLayout {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	/// Byte offset from the start of the owning composite, a multiple of [`Self::alignment`].
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn size(&self) -> usize {
		self.kind.size()
	}

	pub fn alignment(&self) -> usize {
		self.kind.alignment()
	}

	pub fn end(&self) -> usize {
		self.offset + self.size()
	}
}

/// The finished layout of a composite: field offsets, total size including trailing padding, and alignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructLayout {
	id: CompositeId,
	name: String,
	size: usize,
	alignment: usize,
	fields: Vec<FieldLayout>,
}

pub(crate) const fn align_up(offset: usize, alignment: usize) -> Option<usize> {
	match offset.checked_add(alignment - 1) {
		Some(end) => Some(end / alignment * alignment),
		None => None,
	}
}

impl StructLayout {
	/// Places `fields` in declaration order, C style. Each field is moved to the next multiple of its alignment and the
	/// total is rounded up to the largest alignment of any field. `nested` supplies the layouts of referenced
	/// composites.
	pub fn compute(
		id: CompositeId,
		name: &str,
		fields: &[ClassifiedField],
		mut nested: impl FnMut(CompositeId) -> Result<Arc<StructLayout>, DeclarationError>,
	) -> Result<Self, DeclarationError> {
		let overflow = || DeclarationError::LayoutOverflow {
			composite: name.to_string(),
		};

		let mut offset = 0usize;
		let mut alignment = 1usize;
		let mut out = Vec::with_capacity(fields.len());
		for field in fields {
			let kind = match &field.class {
				FieldClass::Scalar(kind) => FieldKind::Scalar(*kind),
				FieldClass::Vector(kind) => FieldKind::Vector(*kind),
				FieldClass::Composite(id) => FieldKind::Composite(nested(*id)?),
				FieldClass::Array { element, dims } => {
					let element = match *element {
						ElementClass::Scalar(kind) => FieldKind::Scalar(kind),
						ElementClass::Vector(kind) => FieldKind::Vector(kind),
						ElementClass::Composite(id) => FieldKind::Composite(nested(id)?),
					};
					let len = dims.iter().try_fold(1usize, |len, d| len.checked_mul(*d)).ok_or_else(overflow)?;
					len.checked_mul(element.size()).ok_or_else(overflow)?;
					FieldKind::Array(ArrayLayout {
						element: Box::new(element),
						dims: dims.clone(),
						len,
					})
				}
			};

			let field_alignment = kind.alignment();
			offset = align_up(offset, field_alignment).ok_or_else(overflow)?;
			let end = offset.checked_add(kind.size()).ok_or_else(overflow)?;
			out.push(FieldLayout {
				name: field.name.clone(),
				kind,
				offset,
			});
			offset = end;
			alignment = alignment.max(field_alignment);
		}

		Ok(Self {
			id,
			name: name.to_string(),
			size: align_up(offset, alignment).ok_or_else(overflow)?,
			alignment,
			fields: out,
		})
	}

	pub fn id(&self) -> CompositeId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Total size in bytes including trailing padding, the stride of consecutive instances in a buffer.
	pub fn size(&self) -> usize {
		self.size
	}

	pub fn alignment(&self) -> usize {
		self.alignment
	}

	pub fn fields(&self) -> &[FieldLayout] {
		&self.fields
	}

	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|f| f.name == name)
	}

	pub fn field(&self, name: &str) -> Option<&FieldLayout> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Byte ranges not covered by any field, including trailing padding. Does not descend into nested composites.
	pub fn padding(&self) -> Vec<Range<usize>> {
		let mut padding = Vec::new();
		let mut cursor = 0;
		for field in &self.fields {
			if cursor < field.offset {
				padding.push(cursor..field.offset);
			}
			cursor = field.end();
		}
		if cursor < self.size {
			padding.push(cursor..self.size);
		}
		padding
	}
}

/// Renders the byte map of the layout, one character per byte: `_` for padding, the field index otherwise, followed by
/// one line per field.
impl Display for StructLayout {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		writeln!(f, "Aligned field layout for {}:", self.name)?;
		let mut cursor = 0;
		for (i, field) in self.fields.iter().enumerate() {
			for _ in cursor..field.offset {
				f.write_str("_")?;
			}
			for _ in 0..field.size() {
				write!(f, "{i}")?;
			}
			cursor = field.end();
		}
		for _ in cursor..self.size {
			f.write_str("_")?;
		}
		writeln!(f)?;

		for (i, field) in self.fields.iter().enumerate() {
			writeln!(
				f,
				"{i}: {} {}, offset {}, size {}, alignment {}",
				field.kind,
				field.name,
				field.offset,
				field.size(),
				field.alignment()
			)?;
			let end = self.fields.get(i + 1).map_or(self.size, |next| next.offset);
			if field.end() < end {
				writeln!(f, "   padding: {} bytes", end - field.end())?;
			}
		}
		writeln!(f, "Total size: {}", self.size)
	}
}
