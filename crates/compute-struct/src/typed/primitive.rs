use crate::decl::FieldShape;
use crate::error::{DeclarationError, ShapeError};
use crate::layout::FieldKind;
use crate::registry::TypeRegistryBuilder;
use crate::scalar::ScalarType;
use crate::typed::ComputeField;
use crate::value::Value;

macro_rules! scalar {
	($t:ty) => {
		impl ComputeField for $t {
			fn declare(_registry: &mut TypeRegistryBuilder) -> Result<FieldShape, DeclarationError> {
				Ok(FieldShape::new(<$t as ScalarType>::KIND))
			}

			fn push_leaves(&self, _element: &FieldKind, out: &mut Vec<Value>) -> Result<(), ShapeError> {
				out.push(Value::Scalar((*self).into()));
				Ok(())
			}

			fn pop_leaves<'a>(leaves: &mut dyn Iterator<Item = &'a Value>) -> Result<Self, ShapeError> {
				let kind = <$t as ScalarType>::KIND;
				match leaves.next() {
					Some(value) => value
						.scalar_as::<$t>()
						.ok_or_else(|| ShapeError::mismatch(kind, value.describe())),
					None => Err(ShapeError::mismatch(kind, "no value")),
				}
			}
		}
	};
}

scalar!(i8);
scalar!(u8);
scalar!(i16);
scalar!(u16);
scalar!(i32);
scalar!(u32);
scalar!(i64);
scalar!(u64);
scalar!(f32);
scalar!(f64);
