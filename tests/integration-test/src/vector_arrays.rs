use crate::{run_double_test, test_structs};
use compute_struct::scalar::ByteOrder;
use compute_struct::vector::VectorKind;

#[test]
fn test_vector_arrays_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructVectorArrays")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 16]);
	assert_eq!(layout.size(), 160);
	assert_eq!(layout.alignment(), 16);
	Ok(())
}

#[test]
fn test_vector_arrays_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructVectorArrays", ByteOrder::Little)?;
	run_double_test(&cache, "StructVectorArrays", ByteOrder::Big)
}

#[test]
fn test_vector_arrays_initialized() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let instance = cache.instantiate_name("StructVectorArrays")?;
	let af4 = instance.get("af4")?.as_array().ok_or_else(|| anyhow::anyhow!("af4 is not an array"))?;
	assert_eq!(af4.dims().as_slice(), &[3, 3]);
	assert!(af4
		.elements()
		.iter()
		.all(|e| e.as_vector() == Some(&VectorKind::FLOAT4.zero())));
	Ok(())
}
