use crate::clock::Clock;

use super::{
    registers::{Twar, Twcr, Twsr},
    Address,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckMode {
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enable {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeneralCall {
    Off,
    On,
}

/// Bit-rate prescaler, stored in `TWSR.TWPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0b00,
    Div4 = 0b01,
    Div16 = 0b10,
    Div64 = 0b11,
}

impl Prescaler {
    pub const ALL: [Self; 4] = [Self::Div1, Self::Div4, Self::Div16, Self::Div64];

    #[inline]
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
        }
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Only the two low bits are considered.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Div1,
            0b01 => Self::Div4,
            0b10 => Self::Div16,
            _ => Self::Div64,
        }
    }
}

/// Everything [`Twi::new`](super::Twi::new) writes into the controller.
///
/// The value is consumed by the configurator and never stored by the
/// driver; [`Twi::configuration`](super::Twi::configuration) decodes it back
/// from the registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfiguration {
    pub interrupt_mode: InterruptMode,
    pub ack_mode: AckMode,
    pub enable: Enable,
    pub prescaler: Prescaler,
    pub general_call: GeneralCall,
    /// Only used when another master addresses this node.
    pub own_address: Address,
    pub bit_rate: u8,
}

impl BusConfiguration {
    /// Enabled master with ACK on, interrupts and general call off and own
    /// address 0.
    #[inline]
    pub const fn new(bit_rate: u8, prescaler: Prescaler) -> Self {
        Self {
            interrupt_mode: InterruptMode::Disabled,
            ack_mode: AckMode::On,
            enable: Enable::Enabled,
            prescaler,
            general_call: GeneralCall::Off,
            own_address: Address::GENERAL_CALL,
            bit_rate,
        }
    }

    /// Picks the smallest prescaler whose bit rate divisor fits in `TWBR`.
    ///
    /// Returns `None` when `speed` is zero, faster than `CLOCK::FREQ / 16`,
    /// or too slow even with the ÷64 prescaler.
    pub fn for_speed<CLOCK: Clock>(speed: u32) -> Option<Self> {
        if speed == 0 {
            return None;
        }

        let ratio = (CLOCK::FREQ / speed).checked_sub(16)?;
        Prescaler::ALL.into_iter().find_map(|prescaler| {
            let twbr = ratio / (2 * prescaler.divisor());
            u8::try_from(twbr)
                .ok()
                .map(|twbr| Self::new(twbr, prescaler))
        })
    }

    /// SCL frequency this configuration produces with the given CPU clock.
    #[inline]
    pub fn scl_frequency<CLOCK: Clock>(&self) -> u32 {
        CLOCK::FREQ / (16 + 2 * u32::from(self.bit_rate) * self.prescaler.divisor())
    }

    #[inline]
    pub const fn with_interrupt_mode(mut self, interrupt_mode: InterruptMode) -> Self {
        self.interrupt_mode = interrupt_mode;
        self
    }

    #[inline]
    pub const fn with_ack_mode(mut self, ack_mode: AckMode) -> Self {
        self.ack_mode = ack_mode;
        self
    }

    #[inline]
    pub const fn with_enable(mut self, enable: Enable) -> Self {
        self.enable = enable;
        self
    }

    #[inline]
    pub const fn with_general_call(mut self, general_call: GeneralCall) -> Self {
        self.general_call = general_call;
        self
    }

    #[inline]
    pub const fn with_own_address(mut self, own_address: Address) -> Self {
        self.own_address = own_address;
        self
    }

    pub(crate) fn twsr(&self) -> Twsr {
        Twsr::new().with(Twsr::TWPS, self.prescaler.bits())
    }

    pub(crate) fn twar(&self) -> Twar {
        Twar::new()
            .with(Twar::TWA, self.own_address.get())
            .with(Twar::TWGCE, self.general_call == GeneralCall::On)
    }

    pub(crate) fn twcr(&self) -> Twcr {
        Twcr::new()
            .with(Twcr::TWEA, self.ack_mode == AckMode::On)
            .with(Twcr::TWIE, self.interrupt_mode == InterruptMode::Enabled)
            .with(Twcr::TWEN, self.enable == Enable::Enabled)
    }

    pub(crate) fn decode(twbr: u8, twsr: Twsr, twar: Twar, twcr: Twcr) -> Self {
        Self {
            interrupt_mode: if twcr.get(Twcr::TWIE) {
                InterruptMode::Enabled
            } else {
                InterruptMode::Disabled
            },
            ack_mode: if twcr.get(Twcr::TWEA) {
                AckMode::On
            } else {
                AckMode::Off
            },
            enable: if twcr.get(Twcr::TWEN) {
                Enable::Enabled
            } else {
                Enable::Disabled
            },
            prescaler: Prescaler::from_bits(twsr.get(Twsr::TWPS)),
            general_call: if twar.get(Twar::TWGCE) {
                GeneralCall::On
            } else {
                GeneralCall::Off
            },
            own_address: Address::const_new(twar.get(Twar::TWA) & Address::MAX),
            bit_rate: twbr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{MHz1, MHz16, MHz8};

    #[test]
    fn standard_mode_at_16mhz() {
        let config = BusConfiguration::for_speed::<MHz16>(100_000).unwrap();

        assert_eq!(config.bit_rate, 72);
        assert_eq!(config.prescaler, Prescaler::Div1);
        assert_eq!(config.scl_frequency::<MHz16>(), 100_000);
    }

    #[test]
    fn fast_mode_at_8mhz() {
        let config = BusConfiguration::for_speed::<MHz8>(400_000).unwrap();

        assert_eq!(config.bit_rate, 2);
        assert_eq!(config.scl_frequency::<MHz8>(), 400_000);
    }

    #[test]
    fn slow_speeds_escalate_the_prescaler() {
        let config = BusConfiguration::for_speed::<MHz16>(10_000).unwrap();

        assert_eq!(config.prescaler, Prescaler::Div4);
        assert_eq!(config.bit_rate, 198);
    }

    #[test]
    fn impossible_speeds_are_rejected() {
        assert_eq!(BusConfiguration::for_speed::<MHz16>(0), None);
        assert_eq!(BusConfiguration::for_speed::<MHz1>(100_000), None);
        assert_eq!(BusConfiguration::for_speed::<MHz16>(100), None);
    }

    #[test]
    fn encoding_matches_register_layout() {
        let config = BusConfiguration::new(12, Prescaler::Div16)
            .with_own_address(Address::const_new(0x21))
            .with_general_call(GeneralCall::On)
            .with_interrupt_mode(InterruptMode::Enabled);

        assert_eq!(config.twsr().bits(), 0b10);
        assert_eq!(config.twar().bits(), 0x43);
        assert_eq!(config.twcr().bits(), 0x45);
    }
}
