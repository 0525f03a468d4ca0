//! Scalar type tags and byte-order handling.

use std::fmt;

/// Discriminant tag for the scalar element type of a wire tensor.
///
/// The engine itself only cares about [`element_size`](Self::element_size);
/// the tag travels with the record so readers can refuse mistyped payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    U8 = 0,
    I8 = 1,
    I16 = 2,
    I32 = 3,
    I64 = 4,
    F16 = 5,
    F32 = 6,
    F64 = 7,
}

impl DataType {
    /// Size in bytes of one element of this type.
    pub const fn element_size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::I16 | Self::F16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    /// Convert from the raw u32 discriminant in a record.
    pub const fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::U8),
            1 => Some(Self::I8),
            2 => Some(Self::I16),
            3 => Some(Self::I32),
            4 => Some(Self::I64),
            5 => Some(Self::F16),
            6 => Some(Self::F32),
            7 => Some(Self::F64),
            _ => None,
        }
    }

    /// The raw discriminant written to a record.
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Lower-case type name, as printed by diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested or recorded byte order.
///
/// `Native` is a request-time convenience only: the serializer resolves it to
/// the machine order before anything reaches a record. Records always carry
/// `Little` or `Big`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Native,
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the running machine.
    pub const MACHINE: Endianness = if cfg!(target_endian = "little") {
        Endianness::Little
    } else {
        Endianness::Big
    };

    /// Resolve `Native` to the machine order; concrete orders pass through.
    pub const fn resolved(self) -> Endianness {
        match self {
            Self::Native => Self::MACHINE,
            other => other,
        }
    }

    /// The raw byte written to a record.
    ///
    /// # Panics
    /// Panics on `Native`, which must be resolved before encoding.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Little => 0,
            Self::Big => 1,
            Self::Native => panic!("native byte order must be resolved before encoding"),
        }
    }

    /// Convert from the raw byte in a record.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Little),
            1 => Some(Self::Big),
            _ => None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes() {
        assert_eq!(DataType::U8.element_size(), 1);
        assert_eq!(DataType::I8.element_size(), 1);
        assert_eq!(DataType::I16.element_size(), 2);
        assert_eq!(DataType::F16.element_size(), 2);
        assert_eq!(DataType::I32.element_size(), 4);
        assert_eq!(DataType::F32.element_size(), 4);
        assert_eq!(DataType::I64.element_size(), 8);
        assert_eq!(DataType::F64.element_size(), 8);
    }

    #[test]
    fn tag_roundtrip() {
        for tag in 0u32..=7 {
            let dt = DataType::from_u32(tag).expect("tag in range");
            assert_eq!(dt.as_u32(), tag);
        }
        assert_eq!(DataType::from_u32(8), None);
        assert_eq!(DataType::from_u32(u32::MAX), None);
    }

    #[test]
    fn native_resolves_to_machine() {
        assert_eq!(Endianness::Native.resolved(), Endianness::MACHINE);
        assert_eq!(Endianness::Little.resolved(), Endianness::Little);
        assert_eq!(Endianness::Big.resolved(), Endianness::Big);
    }

    #[test]
    fn order_byte_roundtrip() {
        assert_eq!(Endianness::from_u8(Endianness::Little.as_u8()), Some(Endianness::Little));
        assert_eq!(Endianness::from_u8(Endianness::Big.as_u8()), Some(Endianness::Big));
        assert_eq!(Endianness::from_u8(2), None);
    }

    #[test]
    #[should_panic(expected = "must be resolved")]
    fn encoding_native_panics() {
        let _ = Endianness::Native.as_u8();
    }

    #[test]
    fn machine_order_matches_target() {
        if cfg!(target_endian = "little") {
            assert_eq!(Endianness::MACHINE, Endianness::Little);
        } else {
            assert_eq!(Endianness::MACHINE, Endianness::Big);
        }
    }
}
