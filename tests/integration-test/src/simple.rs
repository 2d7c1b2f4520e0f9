use crate::{run_double_test, test_structs, COUNT};
use compute_struct::buffers;
use compute_struct::scalar::ByteOrder;
use compute_struct::value::Value;

#[test]
fn test_simple_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructSimple")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 4, 8]);
	assert_eq!(layout.size(), 12);
	assert_eq!(layout.alignment(), 4);
	Ok(())
}

#[test]
fn test_simple_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructSimple", ByteOrder::Little)?;
	run_double_test(&cache, "StructSimple", ByteOrder::Big)
}

#[test]
fn test_simple_stride() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let items = (0..COUNT)
		.map(|i| {
			let mut instance = cache.instantiate_name("StructSimple")?;
			instance.set("s", i as i16 + 10)?;
			instance.set("f", i as f32 * 0.5)?;
			instance.set("c", -(i as i8))?;
			Ok(instance)
		})
		.collect::<anyhow::Result<Vec<_>>>()?;
	let buffer = buffers::to_buffer(ByteOrder::Little, &items)?;
	let bytes = buffer.as_bytes();
	assert_eq!(bytes.len(), 36);
	for i in 0..COUNT {
		let base = 12 * i;
		assert_eq!(i16::from_le_bytes([bytes[base], bytes[base + 1]]), i as i16 + 10);
		approx::assert_relative_eq!(
			f32::from_le_bytes(bytes[base + 4..base + 8].try_into()?),
			i as f32 * 0.5
		);
		assert_eq!(bytes[base + 8] as i8, -(i as i8));
	}
	assert_eq!(items[1].get("s")?, &Value::from(11i16));
	Ok(())
}
