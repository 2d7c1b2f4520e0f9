use crate::{double_kernel, run_double_test, test_structs, COUNT};
use compute_struct::buffers;
use compute_struct::scalar::ByteOrder;
use compute_struct::vector::Vector;

#[test]
fn test_vector_types_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructVectorTypes")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 16]);
	assert_eq!(layout.size(), 32);
	assert_eq!(layout.alignment(), 16);
	assert_eq!(layout.padding(), [2..16]);
	Ok(())
}

#[test]
fn test_vector_types_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructVectorTypes", ByteOrder::Little)?;
	run_double_test(&cache, "StructVectorTypes", ByteOrder::Big)
}

#[test]
fn test_vector_types_lanes() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let items = (0..COUNT)
		.map(|i| {
			let mut instance = cache.instantiate_name("StructVectorTypes")?;
			instance.set("c2", Vector::from_lanes(&[i as i8, -(i as i8)])?)?;
			instance.set("f4", glam::Vec4::new(1.0, 2.0, 3.0, i as f32 + 0.25))?;
			Ok(instance)
		})
		.collect::<anyhow::Result<Vec<_>>>()?;
	let src = buffers::to_buffer(ByteOrder::Big, &items)?;
	let mut dst = double_kernel(&cache, &src, "StructVectorTypes", COUNT)?;
	let out = buffers::read_instances(&cache, &mut dst, "StructVectorTypes", COUNT)?;
	for (i, instance) in out.iter().enumerate() {
		let c2 = instance.get("c2")?.as_vector().and_then(|v| v.lane_values::<i8>());
		assert_eq!(c2.as_deref(), Some(&[2 * i as i8, -2 * i as i8][..]));
		let f4 = instance.get("f4")?.as_vector().ok_or_else(|| anyhow::anyhow!("f4 is not a vector"))?;
		let f4 = glam::Vec4::try_from(f4)?;
		approx::assert_relative_eq!(f4.w, 2.0 * i as f32 + 0.5);
		approx::assert_relative_eq!(f4.x, 2.0);
	}
	Ok(())
}
