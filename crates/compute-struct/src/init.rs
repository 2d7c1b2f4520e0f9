use crate::cache::LayoutCache;
use crate::error::{InstantiationError, ShapeError};
use crate::layout::{FieldKind, StructLayout};
use crate::registry::CompositeId;
use crate::value::{ArrayValue, Instance, Value};
use crate::vector::{Vector, VectorKind};
use std::sync::Arc;

impl LayoutCache {
	/// Creates a fresh instance of composite `id`. Scalars are zero, vectors and nested composites come from their
	/// registered factory or are zero initialized themselves, arrays are filled element by element.
	pub fn instantiate(&self, id: CompositeId) -> Result<Instance, InstantiationError> {
		let layout = self.layout_of(id)?;
		self.instantiate_layout(&layout)
	}

	pub fn instantiate_name(&self, name: &str) -> Result<Instance, InstantiationError> {
		let layout = self.layout_of_name(name)?;
		self.instantiate_layout(&layout)
	}

	/// Creates `count` fresh instances of composite `id`, ready to be read into.
	pub fn instantiate_many(&self, id: CompositeId, count: usize) -> Result<Vec<Instance>, InstantiationError> {
		profiling::function_scope!();
		let layout = self.layout_of(id)?;
		(0..count).map(|_| self.instantiate_layout(&layout)).collect()
	}

	pub fn instantiate_layout(&self, layout: &Arc<StructLayout>) -> Result<Instance, InstantiationError> {
		if let Some(factory) = self.registry().composite_factory(layout.id()) {
			let malformed = |source| InstantiationError::MalformedValue {
				ty: layout.name().to_string(),
				source,
			};
			let instance = factory(layout).map_err(|e| InstantiationError::FactoryFailed {
				ty: layout.name().to_string(),
				source: e.into(),
			})?;
			if !instance.has_layout(layout) {
				return Err(malformed(ShapeError::mismatch(layout.name(), instance.name())));
			}
			instance.validate().map_err(malformed)?;
			return Ok(instance);
		}

		let values = layout
			.fields()
			.iter()
			.map(|field| self.default_value(field.kind()))
			.collect::<Result<_, _>>()?;
		Ok(Instance::new_unchecked(layout.clone(), values))
	}

	/// The default value of a vector kind: the result of its registered factory, or all lanes zero.
	pub fn default_vector(&self, kind: VectorKind) -> Result<Vector, InstantiationError> {
		let Some(factory) = self.registry().vector_factory(kind) else {
			return Ok(kind.zero());
		};
		let vector = factory(kind).map_err(|e| InstantiationError::FactoryFailed {
			ty: kind.to_string(),
			source: e.into(),
		})?;
		if vector.kind() != kind {
			return Err(InstantiationError::MalformedValue {
				ty: kind.to_string(),
				source: ShapeError::mismatch(kind, vector.kind()),
			});
		}
		Ok(vector)
	}

	fn default_value(&self, kind: &FieldKind) -> Result<Value, InstantiationError> {
		Ok(match kind {
			FieldKind::Scalar(kind) => Value::Scalar(kind.zero()),
			FieldKind::Vector(kind) => Value::Vector(self.default_vector(*kind)?),
			FieldKind::Composite(layout) => Value::Composite(self.instantiate_layout(layout)?),
			FieldKind::Array(array) => {
				Value::Array(ArrayValue::try_from_layout(array, |_| self.default_value(array.element()))?)
			}
		})
	}
}
