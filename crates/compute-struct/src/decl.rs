use crate::scalar::ScalarKind;
use crate::vector::VectorKind;
use core::fmt::{Display, Formatter};
use smallvec::SmallVec;

/// Dimensions of an array field, outermost first.
pub type Dims = SmallVec<[usize; 4]>;

/// The declared type of a field, before classification.
///
/// Names are resolved lazily by the classifier, so a composite may reference composites declared after it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDecl {
	Scalar(ScalarKind),
	Vector(VectorKind),
	/// A scalar, vector or composite name, like `float`, `cl_int4` or `MyStruct`.
	Named(String),
	/// An array of unknown length, the length is attached to the [`FieldDecl`].
	Array(Box<TypeDecl>),
}

impl TypeDecl {
	/// Parses a type name. Each trailing `[]` wraps the type in an [`TypeDecl::Array`], so `float[][]` is a two
	/// dimensional array of `float`.
	pub fn named(name: impl Into<String>) -> Self {
		let name = name.into();
		let trimmed = name.trim();
		match trimmed.strip_suffix("[]") {
			Some(element) => Self::array_of(Self::named(element)),
			None => Self::Named(trimmed.to_string()),
		}
	}

	pub fn array_of(element: impl Into<TypeDecl>) -> Self {
		Self::Array(Box::new(element.into()))
	}

	/// Number of array dimensions, 0 for non-arrays.
	pub fn rank(&self) -> usize {
		match self {
			TypeDecl::Array(element) => 1 + element.rank(),
			_ => 0,
		}
	}

	/// The innermost non-array type.
	pub fn element(&self) -> &TypeDecl {
		match self {
			TypeDecl::Array(element) => element.element(),
			other => other,
		}
	}
}

impl From<&str> for TypeDecl {
	fn from(value: &str) -> Self {
		Self::named(value)
	}
}

impl From<String> for TypeDecl {
	fn from(value: String) -> Self {
		Self::named(value)
	}
}

impl From<ScalarKind> for TypeDecl {
	fn from(value: ScalarKind) -> Self {
		Self::Scalar(value)
	}
}

impl From<VectorKind> for TypeDecl {
	fn from(value: VectorKind) -> Self {
		Self::Vector(value)
	}
}

impl Display for TypeDecl {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self {
			TypeDecl::Scalar(kind) => write!(f, "{kind}"),
			TypeDecl::Vector(kind) => write!(f, "{kind}"),
			TypeDecl::Named(name) => f.write_str(name),
			TypeDecl::Array(element) => write!(f, "{element}[]"),
		}
	}
}

/// The element type of a field and its array dimensions, empty for non-array fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldShape {
	pub element: TypeDecl,
	pub dims: Dims,
}

impl FieldShape {
	pub fn new(element: impl Into<TypeDecl>) -> Self {
		Self {
			element: element.into(),
			dims: Dims::new(),
		}
	}

	pub fn array(element: impl Into<TypeDecl>, dims: impl IntoIterator<Item = usize>) -> Self {
		Self {
			element: element.into(),
			dims: dims.into_iter().collect(),
		}
	}

	pub fn into_field(self, name: impl Into<String>) -> FieldDecl {
		if self.dims.is_empty() {
			FieldDecl::new(name, self.element)
		} else {
			let ty = (0..self.dims.len()).fold(self.element, |ty, _| TypeDecl::array_of(ty));
			FieldDecl::new(name, ty).array_length(self.dims)
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDecl {
	name: String,
	ty: TypeDecl,
	array_length: Option<Dims>,
}

impl FieldDecl {
	pub fn new(name: impl Into<String>, ty: impl Into<TypeDecl>) -> Self {
		Self {
			name: name.into(),
			ty: ty.into(),
			array_length: None,
		}
	}

	/// Attaches the static dimensions of an array field, outermost first.
	pub fn array_length(mut self, dims: impl IntoIterator<Item = usize>) -> Self {
		self.array_length = Some(dims.into_iter().collect());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ty(&self) -> &TypeDecl {
		&self.ty
	}

	pub fn dims(&self) -> Option<&Dims> {
		self.array_length.as_ref()
	}
}

/// The ordered field list of a composite. Field order is layout order.
///
/// ```
/// # use compute_struct::decl::CompositeDecl;
/// let decl = CompositeDecl::new("StructArrays")
/// 	.field("s", "short")
/// 	.array("af", "float", [3])
/// 	.array("ai", "int", [3, 3]);
/// assert_eq!(decl.fields().len(), 3);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositeDecl {
	name: String,
	fields: Vec<FieldDecl>,
}

impl CompositeDecl {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	pub fn field(self, name: impl Into<String>, ty: impl Into<TypeDecl>) -> Self {
		self.push(FieldDecl::new(name, ty))
	}

	pub fn array(
		self,
		name: impl Into<String>,
		element: impl Into<TypeDecl>,
		dims: impl IntoIterator<Item = usize>,
	) -> Self {
		self.push(FieldShape::array(element, dims).into_field(name))
	}

	pub fn shaped(self, name: impl Into<String>, shape: FieldShape) -> Self {
		self.push(shape.into_field(name))
	}

	pub fn push(mut self, field: FieldDecl) -> Self {
		self.fields.push(field);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn fields(&self) -> &[FieldDecl] {
		&self.fields
	}
}
