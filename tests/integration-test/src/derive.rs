use crate::COUNT;
use compute_struct::buffer::BufferConfig;
use compute_struct::buffers;
use compute_struct::cache::LayoutCache;
use compute_struct::error::{DeclarationError, ShapeError, StructError};
use compute_struct::registry::TypeRegistry;
use compute_struct::scalar::ByteOrder;
use compute_struct::ComputeStruct;
use glam::{UVec2, Vec3, Vec4};

#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
pub struct StructSimple {
	s: i16,
	f: f32,
	c: i8,
}

#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
pub struct StructArrays {
	r#as: [i16; 3],
	af: [[f32; 3]; 3],
}

#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
pub struct Outer {
	s: i16,
	inner: StructSimple,
	grid: [[StructSimple; 2]; 2],
}

#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
#[compute_struct(name = "Particle")]
pub struct GpuParticle {
	position: Vec4,
	velocity: Vec3,
	ids: [UVec2; 2],
	mass: f32,
}

fn simple(i: usize) -> StructSimple {
	StructSimple {
		s: i as i16 * 3,
		f: i as f32 + 0.5,
		c: -(i as i8),
	}
}

#[test]
fn test_derive_layouts() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	let outer = builder.register::<Outer>()?;
	assert_eq!(builder.register::<Outer>()?, outer);
	builder.register::<StructArrays>()?;
	builder.register::<GpuParticle>()?;
	let cache = LayoutCache::new(builder.build()?);

	let layout = cache.layout_of_struct::<StructSimple>()?;
	assert_eq!((layout.size(), layout.alignment()), (12, 4));

	let layout = cache.layout_of_struct::<Outer>()?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 4, 16]);
	assert_eq!(layout.size(), 64);

	let layout = cache.layout_of_struct::<StructArrays>()?;
	assert_eq!(layout.fields()[0].name(), "as");
	assert_eq!(layout.size(), 44);

	let layout = cache.layout_of_name("Particle")?;
	let offsets = layout.fields().iter().map(|f| f.offset()).collect::<Vec<_>>();
	assert_eq!(offsets, [0, 16, 32, 48]);
	assert_eq!(layout.size(), 64);
	assert_eq!(layout.alignment(), 16);
	Ok(())
}

#[test]
fn test_derive_round_trip() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	builder.register::<Outer>()?;
	let cache = LayoutCache::new(builder.build()?);

	let items = (0..COUNT)
		.map(|i| Outer {
			s: i as i16,
			inner: simple(i),
			grid: [[simple(i + 1), simple(i + 2)], [simple(i + 3), simple(i + 4)]],
		})
		.collect::<Vec<_>>();
	let mut buffer = buffers::allocate_structs::<Outer>(&cache, BufferConfig::with_byte_order(ByteOrder::Big), COUNT)?;
	assert_eq!(buffer.capacity(), 64 * COUNT);
	buffers::write_structs(&cache, &mut buffer, &items)?;
	buffer.rewind();
	let read = buffers::read_structs::<Outer, _>(&cache, &mut buffer, COUNT)?;
	assert_eq!(read, items);

	// grid[1][0].f of instance 2 is at 64 * 2 + 16 + 2 * 12 + 4
	let offset = 64 * 2 + 16 + 2 * 12 + 4;
	let f = f32::from_be_bytes(buffer.as_bytes()[offset..offset + 4].try_into()?);
	approx::assert_relative_eq!(f, simple(2 + 3).f);
	Ok(())
}

#[test]
fn test_derive_kernel() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	builder.register::<GpuParticle>()?;
	let cache = LayoutCache::new(builder.build()?);

	let items = (0..COUNT)
		.map(|i| GpuParticle {
			position: Vec4::splat(i as f32),
			velocity: Vec3::new(0.25, -1.0, i as f32),
			ids: [UVec2::new(i as u32, 1), UVec2::new(2, 3)],
			mass: 1.5,
		})
		.collect::<Vec<_>>();
	let mut src = buffers::allocate_structs::<GpuParticle>(&cache, BufferConfig::DEFAULT, COUNT)?;
	buffers::write_structs(&cache, &mut src, &items)?;
	let mut dst = crate::double_kernel(&cache, &src, "Particle", COUNT)?;
	let read = buffers::read_structs::<GpuParticle, _>(&cache, &mut dst, COUNT)?;
	for (item, read) in items.iter().zip(&read) {
		approx::assert_relative_eq!(read.position, item.position * 2.0);
		approx::assert_relative_eq!(read.velocity, item.velocity * 2.0);
		assert_eq!(read.ids, [item.ids[0] * 2, item.ids[1] * 2]);
		approx::assert_relative_eq!(read.mass, 3.0);
	}
	Ok(())
}

#[test]
fn test_derive_mismatch() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	builder.register::<StructSimple>()?;
	builder.register::<StructArrays>()?;
	let cache = LayoutCache::new(builder.build()?);

	let arrays = cache.layout_of_struct::<StructArrays>()?;
	assert!(simple(1).to_instance(&arrays).is_err());

	let mut instance = simple(1).to_instance(&cache.layout_of_struct::<StructSimple>()?)?;
	assert_eq!(StructSimple::from_instance(&instance)?, simple(1));
	*instance.get_mut("c")? = 1.0f64.into();
	let err = StructSimple::from_instance(&instance).unwrap_err();
	assert!(matches!(err, ShapeError::Mismatch { ref path, .. } if path == "c"), "{err}");

	let mut buffer = buffers::allocate_structs::<StructSimple>(&cache, BufferConfig::DEFAULT, 1)?;
	let err = buffers::read_structs::<StructSimple, _>(&cache, &mut buffer, 2).unwrap_err();
	assert!(matches!(err, StructError::Buffer(_)), "{err}");
	Ok(())
}

mod a {
	use compute_struct::ComputeStruct;

	#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
	pub struct Vertex {
		pub position: [f32; 3],
	}
}

mod b {
	use compute_struct::ComputeStruct;

	#[derive(ComputeStruct, Copy, Clone, Debug, PartialEq)]
	pub struct Vertex {
		pub position: [f32; 4],
		pub color: u32,
	}
}

#[test]
fn test_derive_name_clash() -> anyhow::Result<()> {
	let mut builder = TypeRegistry::builder();
	let id = builder.register::<a::Vertex>()?;
	assert_eq!(builder.register::<a::Vertex>()?, id);
	let err = builder.register::<b::Vertex>().unwrap_err();
	assert!(
		matches!(err, DeclarationError::DuplicateComposite { ref composite } if composite == "Vertex"),
		"{err}"
	);

	let cache = LayoutCache::new(builder.build()?);
	assert_eq!(cache.layout_of_struct::<a::Vertex>()?.size(), 12);
	Ok(())
}
