use crate::consts::MAX_SHARE_VERSION;

/// The info byte that follows a share's namespace.
///
/// Layout: the upper seven bits hold the share version, the lowest bit is set
/// on the first share of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InfoByte(u8);

impl InfoByte {
    /// Info byte of the first share of a version 0 sequence.
    pub const SEQUENCE_START_V0: Self = Self(0b0000_0001);

    /// Build an info byte. Returns `None` if `version` does not fit in 7 bits.
    pub fn new(version: u8, is_sequence_start: bool) -> Option<Self> {
        if version > MAX_SHARE_VERSION {
            return None;
        }
        Some(Self((version << 1) | u8::from(is_sequence_start)))
    }

    /// Interpret a raw byte. Every byte is structurally valid; callers check
    /// the version against the supported set.
    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn version(&self) -> u8 {
        self.0 >> 1
    }

    pub fn is_sequence_start(&self) -> bool {
        self.0 & 1 == 1
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_share_of_version_zero() {
        let info = InfoByte::new(0, true).unwrap();
        assert_eq!(info.as_u8(), 0b0000_0001);
        assert_eq!(info.version(), 0);
        assert!(info.is_sequence_start());
    }

    #[test]
    fn continuation_share() {
        let info = InfoByte::new(3, false).unwrap();
        assert_eq!(info.as_u8(), 0b0000_0110);
        assert_eq!(info.version(), 3);
        assert!(!info.is_sequence_start());
    }

    #[test]
    fn sequence_start_constant() {
        assert_eq!(InfoByte::new(0, true), Some(InfoByte::SEQUENCE_START_V0));
    }

    #[test]
    fn max_version_fits() {
        let info = InfoByte::new(MAX_SHARE_VERSION, true).unwrap();
        assert_eq!(info.as_u8(), 0xFF);
    }

    #[test]
    fn version_overflow_rejected() {
        assert!(InfoByte::new(128, false).is_none());
        assert!(InfoByte::new(u8::MAX, true).is_none());
    }

    #[test]
    fn from_byte_roundtrip() {
        for byte in [0u8, 1, 2, 0x7F, 0x80, 0xFF] {
            let info = InfoByte::from_byte(byte);
            assert_eq!(InfoByte::new(info.version(), info.is_sequence_start()), Some(info));
        }
    }
}
