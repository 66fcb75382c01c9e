//! Buzzer on a single digital output, active high.

use embedded_hal::digital::OutputPin;

pub struct Buzzer<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Buzzer<P> {
    /// Takes the pin and makes sure the buzzer starts silent.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, on: false })
    }

    #[inline]
    pub fn on(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.on = true;
        Ok(())
    }

    #[inline]
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.on = false;
        Ok(())
    }

    #[inline(always)]
    pub fn is_on(&self) -> bool {
        self.on
    }

    #[inline(always)]
    pub fn free(self) -> P {
        self.pin
    }
}
