use crate::{run_double_test, test_structs};
use compute_struct::buffers;
use compute_struct::scalar::ByteOrder;
use compute_struct::value::{ArrayValue, Value};

#[test]
fn test_arrays_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructArrays")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 8]);
	assert_eq!(layout.size(), 44);
	assert_eq!(layout.alignment(), 4);
	assert_eq!(layout.fields()[1].kind().to_string(), "float[3][3]");
	Ok(())
}

#[test]
fn test_arrays_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructArrays", ByteOrder::Little)?;
	run_double_test(&cache, "StructArrays", ByteOrder::Big)
}

#[test]
fn test_arrays_row_major() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let mut instance = cache.instantiate_name("StructArrays")?;
	let af = (0..9).map(|i| i as f32).collect::<Vec<_>>();
	instance.set("af", ArrayValue::from_scalars([3, 3], &af)?)?;
	let buffer = buffers::to_buffer(ByteOrder::Big, &[instance])?;
	let bytes = buffer.as_bytes();
	// af[i][j] is at 8 + (3 * i + j) * 4
	assert_eq!(&bytes[28..32], &5.0f32.to_be_bytes());
	assert_eq!(&bytes[40..44], &8.0f32.to_be_bytes());

	let mut reader = compute_struct::buffer::Buffer::new(bytes, ByteOrder::Big);
	let read = buffers::read_instances(&cache, &mut reader, "StructArrays", 1)?;
	let af = read[0].get("af")?.as_array().ok_or_else(|| anyhow::anyhow!("af is not an array"))?;
	assert_eq!(af.get(&[1, 2]).and_then(Value::scalar_as::<f32>), Some(5.0));
	Ok(())
}
