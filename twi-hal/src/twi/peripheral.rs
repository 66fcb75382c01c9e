//! [`Registers`] for the real controller, through the `avr-device` PAC.
//!
//! Enabled by exactly one chip feature. The PAC register block is moved
//! into [`Twi`](super::Twi), so the owned `Peripherals` value is the only
//! way to get a handle.

#[cfg(any(
    feature = "atmega1280",
    feature = "atmega168",
    feature = "atmega2560",
    feature = "atmega328p",
    feature = "atmega32u4",
))]
use super::registers::{Registers, Twar, Twcr, Twsr};

#[cfg(any(
    feature = "atmega1280",
    feature = "atmega168",
    feature = "atmega2560",
    feature = "atmega328p",
    feature = "atmega32u4",
))]
macro_rules! impl_registers {
    ($($chip:ident)::+) => {
        impl Registers for $($chip)::+::TWI {
            #[inline(always)]
            fn twcr(&self) -> Twcr {
                Twcr::from_bits(self.twcr.read().bits())
            }

            #[allow(unused_unsafe)]
            #[inline(always)]
            fn set_twcr(&mut self, value: Twcr) {
                self.twcr.write(|w| unsafe { w.bits(value.bits()) });
            }

            #[inline(always)]
            fn twsr(&self) -> Twsr {
                Twsr::from_bits(self.twsr.read().bits())
            }

            #[allow(unused_unsafe)]
            #[inline(always)]
            fn set_twsr(&mut self, value: Twsr) {
                // TWS is read only, only TWPS lands.
                self.twsr.write(|w| unsafe { w.bits(value.bits()) });
            }

            #[inline(always)]
            fn twbr(&self) -> u8 {
                self.twbr.read().bits()
            }

            #[allow(unused_unsafe)]
            #[inline(always)]
            fn set_twbr(&mut self, value: u8) {
                self.twbr.write(|w| unsafe { w.bits(value) });
            }

            #[inline(always)]
            fn twar(&self) -> Twar {
                Twar::from_bits(self.twar.read().bits())
            }

            #[allow(unused_unsafe)]
            #[inline(always)]
            fn set_twar(&mut self, value: Twar) {
                self.twar.write(|w| unsafe { w.bits(value.bits()) });
            }

            #[inline(always)]
            fn twdr(&self) -> u8 {
                self.twdr.read().bits()
            }

            #[allow(unused_unsafe)]
            #[inline(always)]
            fn set_twdr(&mut self, value: u8) {
                self.twdr.write(|w| unsafe { w.bits(value) });
            }
        }

        pub type Pac = $($chip)::+::TWI;
    };
}

#[cfg(feature = "atmega1280")]
impl_registers!(avr_device::atmega1280);

#[cfg(feature = "atmega168")]
impl_registers!(avr_device::atmega168);

#[cfg(feature = "atmega2560")]
impl_registers!(avr_device::atmega2560);

#[cfg(feature = "atmega328p")]
impl_registers!(avr_device::atmega328p);

#[cfg(feature = "atmega32u4")]
impl_registers!(avr_device::atmega32u4);

#[cfg(any(
    feature = "atmega1280",
    feature = "atmega168",
    feature = "atmega2560",
    feature = "atmega328p",
    feature = "atmega32u4",
))]
pub type HardwareTwi = super::Twi<Pac>;

/// Configures the on-chip controller for `$speed` Hz SCL at `$clock`.
///
/// ```ignore
/// let dp = avr_device::atmega328p::Peripherals::take().unwrap();
/// let mut twi = twi_hal::twi!(dp, twi_hal::clock::MHz16, 100_000);
/// ```
#[macro_export]
macro_rules! twi {
    ($peripherals:ident, $clock:ty, $speed:expr) => {{
        match $crate::twi::BusConfiguration::for_speed::<$clock>($speed) {
            Some(config) => $crate::twi::Twi::new($peripherals.TWI, &config),
            None => panic!("SCL speed out of range for this clock"),
        }
    }};
}
