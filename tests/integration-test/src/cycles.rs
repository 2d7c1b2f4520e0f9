use compute_struct::cache::LayoutCache;
use compute_struct::decl::CompositeDecl;
use compute_struct::error::{DeclarationError, StructError};
use compute_struct::registry::TypeRegistry;

#[test]
fn test_indirect_cycle() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	builder.declare(CompositeDecl::new("ThisComposite").field("a", "A"))?;
	builder.declare(CompositeDecl::new("A").field("x", "ThisComposite"))?;
	let cache = LayoutCache::new(builder.build()?);
	for name in ["ThisComposite", "A"] {
		let err = cache.layout_of_name(name).unwrap_err();
		assert!(matches!(err, DeclarationError::CyclicType { .. }), "{err}");
	}
	Ok(())
}

#[test]
fn test_self_reference_through_array() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	builder.declare(
		CompositeDecl::new("Node")
			.field("value", "int")
			.array("children", "Node", [2]),
	)?;
	let cache = LayoutCache::new(builder.build()?);
	let err = StructError::from(cache.instantiate_name("Node").unwrap_err());
	assert!(err.to_string().contains("Node"), "{err}");
	let id = cache.registry().id_of("Node").ok_or_else(|| anyhow::anyhow!("Node is not registered"))?;
	assert!(!cache.is_cached(id));
	Ok(())
}
