//! Typed view of the TWI register block.
//!
//! Every register the driver touches is a named bitfield so that the
//! sequencing code never does mask/shift arithmetic by hand. The
//! [`Registers`] trait is the only way the driver reaches the hardware.

use mycelium_bitfield::bitfield;

bitfield! {
    /// `TWCR`: control register.
    #[derive(PartialEq, Eq)]
    pub struct Twcr<u8> {
        /// `TWIE`: raise the TWI interrupt while `TWINT` is set.
        pub const TWIE: bool;
        const _RESERVED = 1;
        /// `TWEN`: enable the TWI block and take over the SDA/SCL pins.
        pub const TWEN: bool;
        /// `TWWC`: write collision, data written while `TWINT` was low.
        pub const TWWC: bool;
        /// `TWSTO`: emit a STOP condition. Cleared by hardware.
        pub const TWSTO: bool;
        /// `TWSTA`: emit a (repeated) START condition.
        pub const TWSTA: bool;
        /// `TWEA`: acknowledge received bytes.
        pub const TWEA: bool;
        /// `TWINT`: set by hardware when the current job is done. Writing a
        /// one clears it and starts the next job.
        pub const TWINT: bool;
    }
}

bitfield! {
    /// `TWSR`: status register.
    #[derive(PartialEq, Eq)]
    pub struct Twsr<u8> {
        /// `TWPS`: bit-rate prescaler selector.
        pub const TWPS = 2;
        const _RESERVED = 1;
        /// `TWS`: protocol status, read only.
        pub const TWS = 5;
    }
}

bitfield! {
    /// `TWAR`: own (slave) address register.
    #[derive(PartialEq, Eq)]
    pub struct Twar<u8> {
        /// `TWGCE`: answer the general call address.
        pub const TWGCE: bool;
        /// `TWA`: own 7-bit address.
        pub const TWA = 7;
    }
}

impl Twsr {
    /// Mask selecting the `TWS` bits in place.
    pub const STATUS_MASK: u8 = 0b1111_1000;
}

/// Access to one TWI controller.
///
/// Implementations must behave like the hardware: writing `TWSR` only
/// changes `TWPS`, and writing a one to `TWCR.TWINT` clears the flag and
/// starts whatever job the other `TWCR` bits describe.
pub trait Registers {
    fn twcr(&self) -> Twcr;

    fn set_twcr(&mut self, value: Twcr);

    fn twsr(&self) -> Twsr;

    fn set_twsr(&mut self, value: Twsr);

    fn twbr(&self) -> u8;

    fn set_twbr(&mut self, value: u8);

    fn twar(&self) -> Twar;

    fn set_twar(&mut self, value: Twar);

    fn twdr(&self) -> u8;

    fn set_twdr(&mut self, value: u8);
}

impl<R: Registers + ?Sized> Registers for &mut R {
    #[inline(always)]
    fn twcr(&self) -> Twcr {
        (**self).twcr()
    }

    #[inline(always)]
    fn set_twcr(&mut self, value: Twcr) {
        (**self).set_twcr(value)
    }

    #[inline(always)]
    fn twsr(&self) -> Twsr {
        (**self).twsr()
    }

    #[inline(always)]
    fn set_twsr(&mut self, value: Twsr) {
        (**self).set_twsr(value)
    }

    #[inline(always)]
    fn twbr(&self) -> u8 {
        (**self).twbr()
    }

    #[inline(always)]
    fn set_twbr(&mut self, value: u8) {
        (**self).set_twbr(value)
    }

    #[inline(always)]
    fn twar(&self) -> Twar {
        (**self).twar()
    }

    #[inline(always)]
    fn set_twar(&mut self, value: Twar) {
        (**self).set_twar(value)
    }

    #[inline(always)]
    fn twdr(&self) -> u8 {
        (**self).twdr()
    }

    #[inline(always)]
    fn set_twdr(&mut self, value: u8) {
        (**self).set_twdr(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bits_sit_where_the_datasheet_puts_them() {
        let start = Twcr::new()
            .with(Twcr::TWINT, true)
            .with(Twcr::TWSTA, true)
            .with(Twcr::TWEN, true);
        assert_eq!(start.bits(), 0xA4);

        let stop = Twcr::new()
            .with(Twcr::TWINT, true)
            .with(Twcr::TWSTO, true)
            .with(Twcr::TWEN, true);
        assert_eq!(stop.bits(), 0x94);

        let read_ack = Twcr::new()
            .with(Twcr::TWINT, true)
            .with(Twcr::TWEA, true)
            .with(Twcr::TWEN, true);
        assert_eq!(read_ack.bits(), 0xC4);

        assert_eq!(Twcr::new().with(Twcr::TWIE, true).bits(), 0x01);
    }

    #[test]
    fn status_code_occupies_the_top_five_bits() {
        let twsr = Twsr::from_bits(0x5B);

        assert_eq!(twsr.get(Twsr::TWPS), 0b11);
        assert_eq!(twsr.get(Twsr::TWS) << 3, 0x58);
        assert_eq!(twsr.bits() & Twsr::STATUS_MASK, 0x58);
    }

    #[test]
    fn own_address_is_shifted_past_general_call() {
        let twar = Twar::new().with(Twar::TWA, 0x50).with(Twar::TWGCE, true);

        assert_eq!(twar.bits(), 0xA1);
        assert_eq!(twar.get(Twar::TWA), 0x50);
        assert!(twar.get(Twar::TWGCE));
    }
}
