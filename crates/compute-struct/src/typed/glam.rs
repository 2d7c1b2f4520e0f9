use crate::decl::FieldShape;
use crate::error::{DeclarationError, ShapeError};
use crate::layout::FieldKind;
use crate::registry::TypeRegistryBuilder;
use crate::scalar::ScalarType;
use crate::typed::ComputeField;
use crate::value::Value;
use crate::vector::{Vector, VectorKind};
use ::glam::{
	DVec2, DVec3, DVec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3, IVec4, U64Vec2, U64Vec3, U64Vec4, UVec2, UVec3, UVec4, Vec2,
	Vec3, Vec4,
};

/// glam vectors and their [`VectorKind`].
pub trait VectorType {
	const KIND: VectorKind;
}

macro_rules! glam_vector {
	($t:ty, $lane:ty, $n:literal) => {
		impl VectorType for $t {
			const KIND: VectorKind = VectorKind::of(<$lane as ScalarType>::KIND, $n);
		}

		impl From<$t> for Vector {
			fn from(value: $t) -> Self {
				Vector::from_array(value.to_array())
			}
		}

		impl From<$t> for Value {
			fn from(value: $t) -> Self {
				Value::Vector(value.into())
			}
		}

		impl TryFrom<&Vector> for $t {
			type Error = ShapeError;

			fn try_from(vector: &Vector) -> Result<Self, Self::Error> {
				vector
					.lane_values::<$lane>()
					.and_then(|lanes| <[$lane; $n]>::try_from(lanes.as_slice()).ok())
					.map(<$t>::from_array)
					.ok_or_else(|| ShapeError::mismatch(<$t as VectorType>::KIND, vector.kind()))
			}
		}

		impl ComputeField for $t {
			fn declare(_registry: &mut TypeRegistryBuilder) -> Result<FieldShape, DeclarationError> {
				Ok(FieldShape::new(<$t as VectorType>::KIND))
			}

			fn push_leaves(&self, _element: &FieldKind, out: &mut Vec<Value>) -> Result<(), ShapeError> {
				out.push((*self).into());
				Ok(())
			}

			fn pop_leaves<'a>(leaves: &mut dyn Iterator<Item = &'a Value>) -> Result<Self, ShapeError> {
				match leaves.next() {
					Some(Value::Vector(vector)) => Self::try_from(vector),
					Some(other) => Err(ShapeError::mismatch(Self::KIND, other.describe())),
					None => Err(ShapeError::mismatch(Self::KIND, "no value")),
				}
			}
		}
	};
}

glam_vector!(Vec2, f32, 2);
glam_vector!(Vec3, f32, 3);
glam_vector!(Vec4, f32, 4);
glam_vector!(DVec2, f64, 2);
glam_vector!(DVec3, f64, 3);
glam_vector!(DVec4, f64, 4);
glam_vector!(IVec2, i32, 2);
glam_vector!(IVec3, i32, 3);
glam_vector!(IVec4, i32, 4);
glam_vector!(UVec2, u32, 2);
glam_vector!(UVec3, u32, 3);
glam_vector!(UVec4, u32, 4);
glam_vector!(I64Vec2, i64, 2);
glam_vector!(I64Vec3, i64, 3);
glam_vector!(I64Vec4, i64, 4);
glam_vector!(U64Vec2, u64, 2);
glam_vector!(U64Vec3, u64, 3);
glam_vector!(U64Vec4, u64, 4);
