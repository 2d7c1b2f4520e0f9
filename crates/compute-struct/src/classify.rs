use crate::decl::{CompositeDecl, Dims, FieldDecl, TypeDecl};
use crate::error::DeclarationError;
use crate::registry::{CompositeId, TypeRegistry};
use crate::scalar::ScalarKind;
use crate::vector::VectorKind;
use rustc_hash::FxHashSet;

/// Kind of a non-array field or of the elements of an array field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementClass {
	Scalar(ScalarKind),
	Vector(VectorKind),
	Composite(CompositeId),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldClass {
	Scalar(ScalarKind),
	Vector(VectorKind),
	Composite(CompositeId),
	/// Arrays of arrays collapse into a single multi dimensional array.
	Array { element: ElementClass, dims: Dims },
}

impl From<ElementClass> for FieldClass {
	fn from(value: ElementClass) -> Self {
		match value {
			ElementClass::Scalar(kind) => FieldClass::Scalar(kind),
			ElementClass::Vector(kind) => FieldClass::Vector(kind),
			ElementClass::Composite(id) => FieldClass::Composite(id),
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClassifiedField {
	pub name: String,
	pub class: FieldClass,
}

/// Classifies all fields of composite `id`, after verifying that it does not contain itself, directly or through any
/// other composite.
pub fn classify(registry: &TypeRegistry, id: CompositeId) -> Result<Vec<ClassifiedField>, DeclarationError> {
	check_acyclic(registry, id)?;
	let decl = registry.lookup(id)?;
	decl.fields()
		.iter()
		.map(|field| classify_field(registry, decl, field))
		.collect()
}

fn classify_field(
	registry: &TypeRegistry,
	owner: &CompositeDecl,
	field: &FieldDecl,
) -> Result<ClassifiedField, DeclarationError> {
	let rank = field.ty().rank();
	let class = if rank == 0 {
		if let Some(dims) = field.dims() {
			return Err(DeclarationError::UnexpectedArrayLength {
				composite: owner.name().to_string(),
				field: field.name().to_string(),
				dims: dims.clone(),
			});
		}
		resolve(registry, owner, field)?.into()
	} else {
		let dims = field
			.dims()
			.filter(|dims| !dims.is_empty())
			.ok_or_else(|| DeclarationError::MissingArrayLength {
				composite: owner.name().to_string(),
				field: field.name().to_string(),
			})?;
		if dims.len() != rank {
			return Err(DeclarationError::ArrayRankMismatch {
				composite: owner.name().to_string(),
				field: field.name().to_string(),
				rank,
				dims: dims.clone(),
			});
		}
		if dims.contains(&0) {
			return Err(DeclarationError::InvalidArrayLength {
				composite: owner.name().to_string(),
				field: field.name().to_string(),
				dims: dims.clone(),
			});
		}
		FieldClass::Array {
			element: resolve(registry, owner, field)?,
			dims: dims.clone(),
		}
	};
	Ok(ClassifiedField {
		name: field.name().to_string(),
		class,
	})
}

/// Resolves the element type of `field`: scalar names first, then vector names, then registered composites.
fn resolve(registry: &TypeRegistry, owner: &CompositeDecl, field: &FieldDecl) -> Result<ElementClass, DeclarationError> {
	resolve_element(registry, field.ty().element()).ok_or_else(|| DeclarationError::UnsupportedFieldType {
		composite: owner.name().to_string(),
		field: field.name().to_string(),
		ty: field.ty().to_string(),
	})
}

fn resolve_element(registry: &TypeRegistry, ty: &TypeDecl) -> Option<ElementClass> {
	match ty {
		TypeDecl::Scalar(kind) => Some(ElementClass::Scalar(*kind)),
		TypeDecl::Vector(kind) => Some(ElementClass::Vector(*kind)),
		TypeDecl::Named(name) => ScalarKind::from_name(name)
			.map(ElementClass::Scalar)
			.or_else(|| VectorKind::from_name(name).map(ElementClass::Vector))
			.or_else(|| registry.id_of(name).map(ElementClass::Composite)),
		TypeDecl::Array(_) => None,
	}
}

/// Depth first walk over the composite reference graph. A composite on the current ancestry chain that is reached
/// again is a cycle. Composites whose subgraph was already walked are skipped.
fn check_acyclic(registry: &TypeRegistry, root: CompositeId) -> Result<(), DeclarationError> {
	let mut ancestry = Vec::new();
	let mut acyclic = FxHashSet::default();
	visit(registry, root, &mut ancestry, &mut acyclic)
}

fn visit(
	registry: &TypeRegistry,
	id: CompositeId,
	ancestry: &mut Vec<CompositeId>,
	acyclic: &mut FxHashSet<CompositeId>,
) -> Result<(), DeclarationError> {
	if let Some(start) = ancestry.iter().position(|a| *a == id) {
		let path = ancestry[start..]
			.iter()
			.chain([&id])
			.map(|a| registry.name(*a))
			.collect();
		return Err(DeclarationError::CyclicType {
			composite: registry.name(id),
			path,
		});
	}
	if acyclic.contains(&id) {
		return Ok(());
	}

	let decl = registry.lookup(id)?;
	ancestry.push(id);
	for field in decl.fields() {
		if let Some(ElementClass::Composite(child)) = resolve_element(registry, field.ty().element()) {
			visit(registry, child, ancestry, acyclic)?;
		}
	}
	ancestry.pop();
	acyclic.insert(id);
	Ok(())
}
