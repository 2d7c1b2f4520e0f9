use core::fmt::{Display, Formatter};

/// Byte order of the values stored in a [`Buffer`](crate::buffer::Buffer).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ByteOrder {
	Little,
	Big,
}

impl ByteOrder {
	#[cfg(target_endian = "little")]
	pub const NATIVE: Self = Self::Little;
	#[cfg(target_endian = "big")]
	pub const NATIVE: Self = Self::Big;
}

impl Default for ByteOrder {
	fn default() -> Self {
		Self::NATIVE
	}
}

/// Rust primitives that map onto a [`ScalarKind`].
pub trait ScalarType: Copy + Into<Scalar> + 'static {
	const KIND: ScalarKind;

	/// Returns `None` if `scalar` is of a different kind, no numeric conversion happens.
	fn from_scalar(scalar: Scalar) -> Option<Self>;
}

macro_rules! scalars {
	($($variant:ident($ty:ty) = $name:literal),* $(,)?) => {
		/// The scalar types of the OpenCL C compute ABI. Each scalar is aligned to its own size.
		#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
		pub enum ScalarKind {
			$($variant,)*
		}

		impl ScalarKind {
			pub const ALL: &'static [ScalarKind] = &[$(ScalarKind::$variant,)*];

			pub const fn size(self) -> usize {
				match self {
					$(ScalarKind::$variant => core::mem::size_of::<$ty>(),)*
				}
			}

			/// The OpenCL C name of this scalar, like `uchar` or `float`.
			pub const fn name(self) -> &'static str {
				match self {
					$(ScalarKind::$variant => $name,)*
				}
			}

			pub fn zero(self) -> Scalar {
				match self {
					$(ScalarKind::$variant => Scalar::$variant(0 as $ty),)*
				}
			}

			/// Converts with `as` semantics, like a C cast.
			pub fn from_f64(self, value: f64) -> Scalar {
				match self {
					$(ScalarKind::$variant => Scalar::$variant(value as $ty),)*
				}
			}

			fn from_i128(self, value: i128) -> Scalar {
				match self {
					$(ScalarKind::$variant => Scalar::$variant(value as $ty),)*
				}
			}

			/// Reads a scalar of this kind from the start of `bytes`, which must hold at least [`Self::size`] bytes.
			pub(crate) fn read(self, bytes: &[u8], order: ByteOrder) -> Scalar {
				match self {
					$(ScalarKind::$variant => {
						let mut raw = [0u8; core::mem::size_of::<$ty>()];
						raw.copy_from_slice(&bytes[..core::mem::size_of::<$ty>()]);
						Scalar::$variant(match order {
							ByteOrder::Little => <$ty>::from_le_bytes(raw),
							ByteOrder::Big => <$ty>::from_be_bytes(raw),
						})
					})*
				}
			}
		}

		/// A single scalar value.
		#[derive(Copy, Clone, Debug, PartialEq)]
		pub enum Scalar {
			$($variant($ty),)*
		}

		impl Scalar {
			pub const fn kind(&self) -> ScalarKind {
				match self {
					$(Scalar::$variant(_) => ScalarKind::$variant,)*
				}
			}

			pub fn to_f64(&self) -> f64 {
				match *self {
					$(Scalar::$variant(v) => v as f64,)*
				}
			}

			/// Writes this scalar to the start of `out`, which must hold at least `self.kind().size()` bytes.
			pub(crate) fn write(&self, out: &mut [u8], order: ByteOrder) {
				match *self {
					$(Scalar::$variant(v) => {
						let raw = match order {
							ByteOrder::Little => v.to_le_bytes(),
							ByteOrder::Big => v.to_be_bytes(),
						};
						out[..raw.len()].copy_from_slice(&raw);
					})*
				}
			}
		}

		$(
			impl From<$ty> for Scalar {
				fn from(value: $ty) -> Self {
					Scalar::$variant(value)
				}
			}

			impl ScalarType for $ty {
				const KIND: ScalarKind = ScalarKind::$variant;

				fn from_scalar(scalar: Scalar) -> Option<Self> {
					match scalar {
						Scalar::$variant(v) => Some(v),
						_ => None,
					}
				}
			}
		)*
	};
}

scalars! {
	Char(i8) = "char",
	UChar(u8) = "uchar",
	Short(i16) = "short",
	UShort(u16) = "ushort",
	Int(i32) = "int",
	UInt(u32) = "uint",
	Long(i64) = "long",
	ULong(u64) = "ulong",
	Float(f32) = "float",
	Double(f64) = "double",
}

impl ScalarKind {
	pub const fn alignment(self) -> usize {
		self.size()
	}

	/// Accepts both the OpenCL C name and the `cl_` prefixed host name, e.g. `float` and `cl_float`.
	pub fn from_name(name: &str) -> Option<Self> {
		let name = name.strip_prefix("cl_").unwrap_or(name);
		Self::ALL.iter().copied().find(|kind| kind.name() == name)
	}
}

impl ScalarKind {
	pub const fn is_float(self) -> bool {
		matches!(self, ScalarKind::Float | ScalarKind::Double)
	}
}

impl Scalar {
	/// Converts to `kind` with `as` semantics, a no-op if already of that kind. Integer to integer casts are exact
	/// before truncation, everything else goes through `f64`.
	pub fn cast(self, kind: ScalarKind) -> Scalar {
		if self.kind() == kind {
			return self;
		}
		match self.to_i128() {
			Some(value) if !kind.is_float() => kind.from_i128(value),
			_ => kind.from_f64(self.to_f64()),
		}
	}

	fn to_i128(self) -> Option<i128> {
		Some(match self {
			Scalar::Char(v) => v as i128,
			Scalar::UChar(v) => v as i128,
			Scalar::Short(v) => v as i128,
			Scalar::UShort(v) => v as i128,
			Scalar::Int(v) => v as i128,
			Scalar::UInt(v) => v as i128,
			Scalar::Long(v) => v as i128,
			Scalar::ULong(v) => v as i128,
			Scalar::Float(_) | Scalar::Double(_) => return None,
		})
	}
}

impl Display for ScalarKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.name())
	}
}

impl Display for Scalar {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		match self {
			Scalar::Char(v) => write!(f, "{v}"),
			Scalar::UChar(v) => write!(f, "{v}"),
			Scalar::Short(v) => write!(f, "{v}"),
			Scalar::UShort(v) => write!(f, "{v}"),
			Scalar::Int(v) => write!(f, "{v}"),
			Scalar::UInt(v) => write!(f, "{v}"),
			Scalar::Long(v) => write!(f, "{v}"),
			Scalar::ULong(v) => write!(f, "{v}"),
			Scalar::Float(v) => write!(f, "{v}"),
			Scalar::Double(v) => write!(f, "{v}"),
		}
	}
}
