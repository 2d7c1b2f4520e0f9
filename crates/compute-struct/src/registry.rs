use crate::decl::CompositeDecl;
use crate::error::DeclarationError;
use crate::layout::StructLayout;
use crate::typed::ComputeStruct;
use crate::value::Instance;
use crate::vector::{Vector, VectorKind};
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Dense identity of a composite within its [`TypeRegistry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CompositeId(u32);

impl CompositeId {
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

/// Constructs the default instance of a composite, replacing zero initialization.
pub type CompositeFactory = Arc<dyn Fn(&Arc<StructLayout>) -> anyhow::Result<Instance> + Send + Sync>;

/// Constructs the default value of a vector kind, replacing zero initialization.
pub type VectorFactory = Arc<dyn Fn(VectorKind) -> anyhow::Result<Vector> + Send + Sync>;

/// Collects composite declarations and factories, see [`TypeRegistry`].
#[derive(Default)]
pub struct TypeRegistryBuilder {
	composites: Vec<CompositeDecl>,
	by_name: FxHashMap<String, CompositeId>,
	composite_factories: Vec<(String, CompositeFactory)>,
	vector_factories: FxHashMap<VectorKind, VectorFactory>,
}

impl TypeRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a composite. Referenced composites need not be declared yet, they are resolved once the first
	/// layout is computed.
	pub fn declare(&mut self, decl: CompositeDecl) -> Result<CompositeId, DeclarationError> {
		if decl.fields().is_empty() {
			return Err(DeclarationError::EmptyComposite {
				composite: decl.name().to_string(),
			});
		}
		if self.by_name.contains_key(decl.name()) {
			return Err(DeclarationError::DuplicateComposite {
				composite: decl.name().to_string(),
			});
		}
		let id = CompositeId(self.composites.len() as u32);
		self.by_name.insert(decl.name().to_string(), id);
		self.composites.push(decl);
		Ok(id)
	}

	/// Like [`Self::declare`], but returns the existing id if an identical composite is already registered under the
	/// same name. A different composite of the same name still fails with [`DeclarationError::DuplicateComposite`].
	pub fn declare_or_reuse(&mut self, decl: CompositeDecl) -> Result<CompositeId, DeclarationError> {
		match self.by_name.get(decl.name()) {
			Some(&id) if self.composites[id.index()] == decl => Ok(id),
			_ => self.declare(decl),
		}
	}

	/// Registers `T` and all composites it contains. Registering the same type twice returns the same id.
	pub fn register<T: ComputeStruct>(&mut self) -> Result<CompositeId, DeclarationError> {
		T::declare_struct(self)
	}

	pub fn id_of(&self, name: &str) -> Option<CompositeId> {
		self.by_name.get(name).copied()
	}

	pub fn composite_factory(
		&mut self,
		name: impl Into<String>,
		factory: impl Fn(&Arc<StructLayout>) -> anyhow::Result<Instance> + Send + Sync + 'static,
	) -> &mut Self {
		self.composite_factories.push((name.into(), Arc::new(factory)));
		self
	}

	pub fn vector_factory(
		&mut self,
		kind: VectorKind,
		factory: impl Fn(VectorKind) -> anyhow::Result<Vector> + Send + Sync + 'static,
	) -> &mut Self {
		self.vector_factories.insert(kind, Arc::new(factory));
		self
	}

	/// Freezes the registry. Fails if a factory was registered for a composite that was never declared.
	pub fn build(self) -> Result<Arc<TypeRegistry>, DeclarationError> {
		let mut composite_factories = vec![None; self.composites.len()];
		for (name, factory) in self.composite_factories {
			let id = self
				.by_name
				.get(&name)
				.ok_or(DeclarationError::UnknownComposite { composite: name })?;
			composite_factories[id.index()] = Some(factory);
		}
		Ok(Arc::new(TypeRegistry {
			composites: self.composites,
			by_name: self.by_name,
			composite_factories,
			vector_factories: self.vector_factories,
		}))
	}
}

/// The read-only set of all composites known to a [`LayoutCache`](crate::cache::LayoutCache), constructed once by a
/// [`TypeRegistryBuilder`].
pub struct TypeRegistry {
	composites: Vec<CompositeDecl>,
	by_name: FxHashMap<String, CompositeId>,
	composite_factories: Vec<Option<CompositeFactory>>,
	vector_factories: FxHashMap<VectorKind, VectorFactory>,
}

impl TypeRegistry {
	pub fn builder() -> TypeRegistryBuilder {
		TypeRegistryBuilder::new()
	}

	pub fn len(&self) -> usize {
		self.composites.len()
	}

	pub fn is_empty(&self) -> bool {
		self.composites.is_empty()
	}

	pub fn id_of(&self, name: &str) -> Option<CompositeId> {
		self.by_name.get(name).copied()
	}

	pub fn decl(&self, id: CompositeId) -> Option<&CompositeDecl> {
		self.composites.get(id.index())
	}

	/// The name of `id`, or its debug representation if it belongs to another registry.
	pub fn name(&self, id: CompositeId) -> String {
		self.decl(id)
			.map_or_else(|| format!("{id:?}"), |decl| decl.name().to_string())
	}

	pub fn ids(&self) -> impl Iterator<Item = CompositeId> + '_ {
		(0..self.composites.len()).map(|i| CompositeId(i as u32))
	}

	pub(crate) fn lookup(&self, id: CompositeId) -> Result<&CompositeDecl, DeclarationError> {
		self.decl(id).ok_or_else(|| DeclarationError::UnknownComposite {
			composite: format!("{id:?}"),
		})
	}

	pub(crate) fn composite_factory(&self, id: CompositeId) -> Option<&CompositeFactory> {
		self.composite_factories.get(id.index())?.as_ref()
	}

	pub(crate) fn vector_factory(&self, kind: VectorKind) -> Option<&VectorFactory> {
		self.vector_factories.get(&kind)
	}
}

impl Debug for TypeRegistry {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeRegistry")
			.field("composites", &self.composites)
			.field(
				"composite_factories",
				&self.composite_factories.iter().filter(|f| f.is_some()).count(),
			)
			.field("vector_factories", &self.vector_factories.len())
			.finish()
	}
}
