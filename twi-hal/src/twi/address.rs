/// Transfer direction, carried by the LSB of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// A 7-bit bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Address(u8);

impl core::fmt::Display for Address {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct InvalidAddress(pub u8);

impl core::fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x} does not fit in 7 bits", self.0)
    }
}

impl Address {
    /// The broadcast address answered by nodes with general call recognition.
    pub const GENERAL_CALL: Self = Self(0);

    pub const MAX: u8 = 0b0111_1111;

    #[inline]
    pub const fn new(me: u8) -> Result<Self, InvalidAddress> {
        if me > Self::MAX {
            Err(InvalidAddress(me))
        } else {
            Ok(Self(me))
        }
    }

    #[inline]
    pub const fn const_new(me: u8) -> Self {
        if me > Self::MAX {
            panic!("Invalid address")
        } else {
            Self(me)
        }
    }

    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// SLA+R or SLA+W for `direction`.
    #[inline]
    pub const fn with_direction(self, direction: Direction) -> u8 {
        (self.0 << 1) | direction as u8
    }

    /// Splits an address byte as sent on the wire.
    #[inline]
    pub const fn from_byte(byte: u8) -> (Self, Direction) {
        let direction = if byte & 1 == 0 {
            Direction::Write
        } else {
            Direction::Read
        };
        (Self(byte >> 1), direction)
    }

    /// SLA+W: address in the upper seven bits, direction bit cleared.
    #[inline]
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }

    /// SLA+R: address in the upper seven bits, direction bit set.
    #[inline]
    pub const fn read_byte(self) -> u8 {
        (self.0 << 1) | 1
    }
}

impl TryFrom<u8> for Address {
    type Error = InvalidAddress;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for u8 {
    #[inline(always)]
    fn from(value: Address) -> u8 {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_eight_bit_values() {
        assert_eq!(Address::new(0x80), Err(InvalidAddress(0x80)));
        assert_eq!(Address::try_from(0xff), Err(InvalidAddress(0xff)));
        assert_eq!(Address::new(0x7f).map(Address::get), Ok(0x7f));
    }

    #[test]
    fn direction_bit_is_the_lsb() {
        let eeprom = Address::const_new(0x50);

        assert_eq!(eeprom.write_byte(), 0xA0);
        assert_eq!(eeprom.read_byte(), 0xA1);
        assert_eq!(eeprom.with_direction(Direction::Read), 0xA1);
        assert_eq!(Address::from_byte(0xA1), (eeprom, Direction::Read));
        assert_eq!(Address::from_byte(0xFE), (Address::const_new(0x7f), Direction::Write));
    }
}
