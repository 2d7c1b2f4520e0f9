use crate::{run_double_test, test_structs};
use compute_struct::buffers;
use compute_struct::layout::FieldKind;
use compute_struct::scalar::ByteOrder;
use std::sync::Arc;

#[test]
fn test_nested_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructNested")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 4, 16, 32]);
	assert_eq!(layout.size(), 64);
	assert_eq!(layout.alignment(), 16);

	// nested composites share the cached layout
	let simple = cache.layout_of_name("StructSimple")?;
	match layout.field("ss").map(|f| f.kind()) {
		Some(FieldKind::Composite(inner)) => assert!(Arc::ptr_eq(inner, &simple)),
		other => panic!("expected a composite, found {other:?}"),
	}
	Ok(())
}

#[test]
fn test_nested_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructNested", ByteOrder::Little)?;
	run_double_test(&cache, "StructNested", ByteOrder::Big)
}

#[test]
fn test_nested_offsets_in_buffer() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let mut instance = cache.instantiate_name("StructNested")?;
	instance
		.get_mut("ss")?
		.as_instance_mut()
		.ok_or_else(|| anyhow::anyhow!("ss is not an instance"))?
		.set("f", 1.5f32)?;
	instance.set("c", 7i8)?;
	let buffer = buffers::to_buffer(ByteOrder::Little, &[instance])?;
	let bytes = buffer.as_bytes();
	assert_eq!(&bytes[8..12], &1.5f32.to_le_bytes());
	assert_eq!(bytes[16], 7);
	Ok(())
}
