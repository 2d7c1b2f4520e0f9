use crate::{run_double_test, test_structs};
use compute_struct::scalar::ByteOrder;

#[test]
fn test_struct_arrays_layout() -> anyhow::Result<()> {
	let cache = test_structs()?;
	let layout = cache.layout_of_name("StructStructArrays")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 48]);
	assert_eq!(layout.size(), 336);
	assert_eq!(layout.alignment(), 16);
	assert_eq!(cache.size_of_name("StructStructArrays")?, 336);
	Ok(())
}

#[test]
fn test_struct_arrays_double() -> anyhow::Result<()> {
	let cache = test_structs()?;
	run_double_test(&cache, "StructStructArrays", ByteOrder::Little)?;
	run_double_test(&cache, "StructStructArrays", ByteOrder::Big)
}

#[test]
fn test_layout_invariants() -> anyhow::Result<()> {
	let cache = test_structs()?;
	for id in cache.registry().ids() {
		let layout = cache.layout_of(id)?;
		assert!(layout.size() > 0);
		assert_eq!(layout.size() % layout.alignment(), 0, "{layout}");
		for pair in layout.fields().windows(2) {
			assert!(pair[1].offset() >= pair[0].end(), "{layout}");
		}
		for field in layout.fields() {
			assert_eq!(field.offset() % field.alignment(), 0, "{layout}");
		}
	}
	Ok(())
}
