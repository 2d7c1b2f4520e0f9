use crate::classify::classify;
use crate::error::DeclarationError;
use crate::layout::StructLayout;
use crate::registry::{CompositeId, TypeRegistry};
use crate::scalar::ScalarKind;
use crate::typed::ComputeStruct;
use crate::vector::VectorKind;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Any type that can be placed in a buffer on its own.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeRef {
	Scalar(ScalarKind),
	Vector(VectorKind),
	Composite(CompositeId),
}

/// Memoizes the [`StructLayout`] of every composite of a [`TypeRegistry`].
///
/// Each layout is computed at most once, on first request, and shared by [`Arc`] afterwards. Concurrent requests for
/// the same composite block until the first one finishes. A failed computation is not memoized, so the next request
/// reports the same error again.
pub struct LayoutCache {
	registry: Arc<TypeRegistry>,
	layouts: Box<[OnceCell<Arc<StructLayout>>]>,
}

impl LayoutCache {
	pub fn new(registry: Arc<TypeRegistry>) -> Self {
		let layouts = (0..registry.len()).map(|_| OnceCell::new()).collect();
		Self { registry, layouts }
	}

	pub fn registry(&self) -> &Arc<TypeRegistry> {
		&self.registry
	}

	pub fn layout_of(&self, id: CompositeId) -> Result<Arc<StructLayout>, DeclarationError> {
		let cell = self.layouts.get(id.index()).ok_or_else(|| DeclarationError::UnknownComposite {
			composite: format!("{id:?}"),
		})?;
		cell.get_or_try_init(|| self.compute(id)).cloned()
	}

	pub fn layout_of_name(&self, name: &str) -> Result<Arc<StructLayout>, DeclarationError> {
		let id = self
			.registry
			.id_of(name)
			.ok_or_else(|| DeclarationError::UnknownComposite {
				composite: name.to_string(),
			})?;
		self.layout_of(id)
	}

	/// The layout of a `#[derive(ComputeStruct)]` type, which must have been registered with
	/// [`TypeRegistryBuilder::register`](crate::registry::TypeRegistryBuilder::register).
	pub fn layout_of_struct<T: ComputeStruct>(&self) -> Result<Arc<StructLayout>, DeclarationError> {
		self.layout_of_name(T::NAME)
	}

	pub fn is_cached(&self, id: CompositeId) -> bool {
		self.layouts.get(id.index()).is_some_and(|cell| cell.get().is_some())
	}

	pub fn size_of(&self, ty: TypeRef) -> Result<usize, DeclarationError> {
		Ok(match ty {
			TypeRef::Scalar(kind) => kind.size(),
			TypeRef::Vector(kind) => kind.size(),
			TypeRef::Composite(id) => self.layout_of(id)?.size(),
		})
	}

	/// Like [`Self::size_of`], but resolves `name` as a scalar, vector or composite name first.
	pub fn size_of_name(&self, name: &str) -> Result<usize, DeclarationError> {
		self.size_of(self.resolve(name)?)
	}

	pub fn resolve(&self, name: &str) -> Result<TypeRef, DeclarationError> {
		ScalarKind::from_name(name)
			.map(TypeRef::Scalar)
			.or_else(|| VectorKind::from_name(name).map(TypeRef::Vector))
			.or_else(|| self.registry.id_of(name).map(TypeRef::Composite))
			.ok_or_else(|| DeclarationError::UnknownComposite {
				composite: name.to_string(),
			})
	}

	fn compute(&self, id: CompositeId) -> Result<Arc<StructLayout>, DeclarationError> {
		profiling::function_scope!();
		let fields = classify(&self.registry, id)?;
		let name = self.registry.name(id);
		let layout = StructLayout::compute(id, &name, &fields, |nested| self.layout_of(nested))?;
		tracing::debug!(
			composite = %name,
			size = layout.size(),
			alignment = layout.alignment(),
			"computed layout"
		);
		Ok(Arc::new(layout))
	}
}
