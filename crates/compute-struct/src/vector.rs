use crate::error::ShapeError;
use crate::scalar::{ByteOrder, Scalar, ScalarKind, ScalarType};
use core::fmt::{Display, Formatter};
use smallvec::SmallVec;

/// A fixed-width vector type like `float4`, identified by its lane kind and lane count.
///
/// Vectors are aligned to their size, rounded up to the next power of two lanes: a `float3` occupies 12 bytes but is
/// aligned like a `float4` to 16 bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VectorKind {
	lane: ScalarKind,
	lanes: u8,
}

impl VectorKind {
	pub const LANE_COUNTS: [usize; 5] = [2, 3, 4, 8, 16];

	pub const CHAR2: Self = Self::of(ScalarKind::Char, 2);
	pub const SHORT2: Self = Self::of(ScalarKind::Short, 2);
	pub const INT2: Self = Self::of(ScalarKind::Int, 2);
	pub const FLOAT2: Self = Self::of(ScalarKind::Float, 2);
	pub const FLOAT3: Self = Self::of(ScalarKind::Float, 3);
	pub const FLOAT4: Self = Self::of(ScalarKind::Float, 4);
	pub const DOUBLE4: Self = Self::of(ScalarKind::Double, 4);

	/// Only lane counts in [`Self::LANE_COUNTS`] exist.
	pub const fn new(lane: ScalarKind, lanes: usize) -> Option<Self> {
		match lanes {
			2 | 3 | 4 | 8 | 16 => Some(Self::of(lane, lanes as u8)),
			_ => None,
		}
	}

	pub(crate) const fn of(lane: ScalarKind, lanes: u8) -> Self {
		Self { lane, lanes }
	}

	pub const fn lane(self) -> ScalarKind {
		self.lane
	}

	pub const fn lanes(self) -> usize {
		self.lanes as usize
	}

	pub const fn size(self) -> usize {
		self.lanes() * self.lane.size()
	}

	pub const fn alignment(self) -> usize {
		self.lanes().next_power_of_two() * self.lane.size()
	}

	/// Parses OpenCL vector names like `float4` or `cl_uchar16`.
	pub fn from_name(name: &str) -> Option<Self> {
		let name = name.strip_prefix("cl_").unwrap_or(name);
		let split = name.find(|c: char| c.is_ascii_digit())?;
		let (lane, lanes) = name.split_at(split);
		Self::new(ScalarKind::from_name(lane)?, lanes.parse().ok()?)
	}

	pub fn zero(self) -> Vector {
		Vector {
			kind: self,
			lanes: SmallVec::from_elem(self.lane.zero(), self.lanes()),
		}
	}
}

impl Display for VectorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}{}", self.lane, self.lanes)
	}
}

/// A vector value, holding exactly [`VectorKind::lanes`] scalars of kind [`VectorKind::lane`].
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
	kind: VectorKind,
	lanes: SmallVec<[Scalar; 4]>,
}

impl Vector {
	pub fn new(kind: VectorKind, lanes: impl IntoIterator<Item = Scalar>) -> Result<Self, ShapeError> {
		let lanes: SmallVec<[Scalar; 4]> = lanes.into_iter().collect();
		if lanes.len() != kind.lanes() {
			return Err(ShapeError::mismatch(
				format!("{} lanes", kind.lanes()),
				format!("{} lanes", lanes.len()),
			));
		}
		if let Some((i, lane)) = lanes.iter().enumerate().find(|(_, l)| l.kind() != kind.lane()) {
			return Err(ShapeError::mismatch(kind.lane(), lane.kind()).within(&format!("[{i}]")));
		}
		Ok(Self { kind, lanes })
	}

	/// Creates a vector from a slice of primitives, the length of which must be a valid lane count.
	pub fn from_lanes<T: ScalarType>(values: &[T]) -> Result<Self, ShapeError> {
		let kind = VectorKind::new(T::KIND, values.len())
			.ok_or_else(|| ShapeError::mismatch("a vector lane count", format!("{} lanes", values.len())))?;
		Ok(Self {
			kind,
			lanes: values.iter().map(|v| (*v).into()).collect(),
		})
	}

	/// `N` must be one of [`VectorKind::LANE_COUNTS`].
	pub(crate) fn from_array<T: ScalarType, const N: usize>(values: [T; N]) -> Self {
		debug_assert!(VectorKind::LANE_COUNTS.contains(&N));
		Self {
			kind: VectorKind::of(T::KIND, N as u8),
			lanes: values.into_iter().map(Into::into).collect(),
		}
	}

	pub fn kind(&self) -> VectorKind {
		self.kind
	}

	pub fn lanes(&self) -> &[Scalar] {
		&self.lanes
	}

	pub fn lane(&self, index: usize) -> Option<Scalar> {
		self.lanes.get(index).copied()
	}

	pub fn set_lane(&mut self, index: usize, value: impl Into<Scalar>) -> Result<(), ShapeError> {
		let value = value.into();
		let kind = self.kind;
		let lane = self
			.lanes
			.get_mut(index)
			.ok_or_else(|| ShapeError::mismatch(format!("a lane index below {}", kind.lanes()), index))?;
		if value.kind() != kind.lane() {
			return Err(ShapeError::mismatch(kind.lane(), value.kind()).within(&format!("[{index}]")));
		}
		*lane = value;
		Ok(())
	}

	/// The lanes as primitives, `None` if `T` is not the lane kind.
	pub fn lane_values<T: ScalarType>(&self) -> Option<SmallVec<[T; 4]>> {
		self.lanes.iter().map(|l| T::from_scalar(*l)).collect()
	}

	/// Replaces every lane with `f(lane)`, cast back to the lane kind.
	pub fn map_lanes(&mut self, mut f: impl FnMut(Scalar) -> Scalar) {
		let kind = self.kind.lane();
		for lane in &mut self.lanes {
			*lane = f(*lane).cast(kind);
		}
	}

	pub(crate) fn encode(&self, out: &mut [u8], order: ByteOrder) {
		let stride = self.kind.lane().size();
		for (i, lane) in self.lanes.iter().enumerate() {
			lane.write(&mut out[i * stride..], order);
		}
	}

	pub(crate) fn decode(&mut self, bytes: &[u8], order: ByteOrder) {
		let lane_kind = self.kind.lane();
		let stride = lane_kind.size();
		for (i, lane) in self.lanes.iter_mut().enumerate() {
			*lane = lane_kind.read(&bytes[i * stride..], order);
		}
	}
}

impl Display for Vector {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}(", self.kind)?;
		for (i, lane) in self.lanes.iter().enumerate() {
			if i != 0 {
				f.write_str(", ")?;
			}
			write!(f, "{lane}")?;
		}
		f.write_str(")")
	}
}
