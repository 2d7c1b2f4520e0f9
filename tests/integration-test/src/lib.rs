#![cfg(test)]

use compute_struct::buffer::Buffer;
use compute_struct::buffers;
use compute_struct::cache::LayoutCache;
use compute_struct::decl::CompositeDecl;
use compute_struct::registry::TypeRegistry;
use compute_struct::scalar::{ByteOrder, Scalar};
use compute_struct::value::Instance;

pub mod arrays;
pub mod cycles;
pub mod derive;
pub mod nested;
pub mod simple;
pub mod struct_arrays;
pub mod vector_arrays;
pub mod vector_types;

/// The number of instances each test transfers.
pub const COUNT: usize = 3;

/// All test composites, declared the way a kernel source would declare them.
pub fn test_structs() -> anyhow::Result<LayoutCache> {
	let mut builder = TypeRegistry::builder();
	builder.declare(
		CompositeDecl::new("StructSimple")
			.field("s", "short")
			.field("f", "float")
			.field("c", "char"),
	)?;
	builder.declare(
		CompositeDecl::new("StructVectorTypes")
			.field("c2", "char2")
			.field("f4", "float4"),
	)?;
	builder.declare(
		CompositeDecl::new("StructNested")
			.field("s", "short")
			.field("ss", "StructSimple")
			.field("c", "char")
			.field("svt", "StructVectorTypes"),
	)?;
	builder.declare(
		CompositeDecl::new("StructArrays")
			.array("as", "short", [3])
			.array("af", "float", [3, 3]),
	)?;
	builder.declare(
		CompositeDecl::new("StructVectorArrays")
			.array("as2", "short2", [3])
			.array("af4", "float4", [3, 3]),
	)?;
	builder.declare(
		CompositeDecl::new("StructStructArrays")
			.array("ass", "StructSimple", [3])
			.array("asvt", "StructVectorTypes", [3, 3]),
	)?;
	Ok(LayoutCache::new(builder.build()?))
}

/// Fills every number of `instance` with small distinct values, starting after `seed`.
pub fn fill(instance: &mut Instance, seed: usize) {
	let mut next = seed;
	instance.map_scalars(&mut |_| {
		next += 1;
		Scalar::Int((next % 60) as i32)
	});
}

pub fn doubled(instance: &Instance) -> Instance {
	let mut out = instance.clone();
	out.map_scalars(&mut |s| s.kind().from_f64(s.to_f64() * 2.0));
	out
}

/// Stands in for a kernel computing `dst[gid] = 2 * src[gid]` for every number of a composite. Like a device, it only
/// sees the raw bytes of `src` and produces the raw bytes of `dst`.
pub fn double_kernel(cache: &LayoutCache, src: &Buffer, name: &str, count: usize) -> anyhow::Result<Buffer> {
	let mut input = Buffer::new(src.as_bytes(), src.byte_order());
	let instances = buffers::read_instances(cache, &mut input, name, count)?;
	let out = instances.iter().map(doubled).collect::<Vec<_>>();
	Ok(buffers::to_buffer(src.byte_order(), &out)?)
}

/// Writes [`COUNT`] filled instances of `name` to a buffer, runs [`double_kernel`] on it and checks that reading the
/// result yields the doubled instances.
pub fn run_double_test(cache: &LayoutCache, name: &str, order: ByteOrder) -> anyhow::Result<()> {
	let src = (0..COUNT)
		.map(|i| {
			let mut instance = cache.instantiate_name(name)?;
			fill(&mut instance, i * 7);
			Ok(instance)
		})
		.collect::<anyhow::Result<Vec<_>>>()?;

	let src_buffer = buffers::to_buffer(order, &src)?;
	assert_eq!(src_buffer.capacity(), COUNT * cache.size_of_name(name)?);
	let mut dst_buffer = double_kernel(cache, &src_buffer, name, COUNT)?;
	let dst = buffers::read_instances(cache, &mut dst_buffer, name, COUNT)?;
	assert_eq!(dst_buffer.remaining(), 0);

	let expected = src.iter().map(doubled).collect::<Vec<_>>();
	for (i, (dst, expected)) in dst.iter().zip(&expected).enumerate() {
		assert_eq!(dst, expected, "instance {i} of {name}: {dst} != {expected}");
	}
	Ok(())
}
