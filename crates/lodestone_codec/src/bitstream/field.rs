//! Value types the stream can carry.

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width value that can be written to and read from a
/// [`super::BitStream`].
///
/// The value travels as its raw bit pattern: two's complement for signed
/// integers, IEEE 754 bits for floats, the scalar value for `char`.
pub trait BitField: Copy + sealed::Sealed {
    /// Width of the value in bits.
    const BITS: u32;

    /// Raw bit pattern, zero-extended to 64 bits.
    fn to_raw(self) -> u64;

    /// Rebuilds a value from its low [`Self::BITS`] bits.
    ///
    /// Returns `None` if the pattern is not a valid value of the type.
    fn from_raw(raw: u64) -> Option<Self>;
}

macro_rules! impl_bit_field {
    ($($ty:ty => $unsigned:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl BitField for $ty {
            const BITS: u32 = <$unsigned>::BITS;

            #[inline]
            #[allow(
                clippy::cast_sign_loss,
                clippy::unnecessary_cast,
                clippy::useless_conversion
            )]
            fn to_raw(self) -> u64 {
                u64::from(self as $unsigned)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap,
                clippy::unnecessary_cast
            )]
            fn from_raw(raw: u64) -> Option<Self> {
                Some(raw as $unsigned as $ty)
            }
        }
    )*};
}

impl_bit_field! {
    u8 => u8,
    i8 => u8,
    u16 => u16,
    i16 => u16,
    u32 => u32,
    i32 => u32,
    u64 => u64,
    i64 => u64,
}

impl sealed::Sealed for bool {}

impl BitField for bool {
    const BITS: u32 = 1;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_raw(raw: u64) -> Option<Self> {
        Some(raw & 1 != 0)
    }
}

impl sealed::Sealed for f32 {}

impl BitField for f32 {
    const BITS: u32 = 32;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_raw(raw: u64) -> Option<Self> {
        Some(f32::from_bits(raw as u32))
    }
}

impl sealed::Sealed for f64 {}

impl BitField for f64 {
    const BITS: u32 = 64;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_raw(raw: u64) -> Option<Self> {
        Some(f64::from_bits(raw))
    }
}

impl sealed::Sealed for char {}

impl BitField for char {
    const BITS: u32 = 32;

    #[inline]
    fn to_raw(self) -> u64 {
        u64::from(u32::from(self))
    }

    #[inline]
    fn from_raw(raw: u64) -> Option<Self> {
        u32::try_from(raw).ok().and_then(char::from_u32)
    }
}
