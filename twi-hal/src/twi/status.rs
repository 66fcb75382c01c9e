use super::registers::{Registers, Twsr};

/// Snapshot of `TWSR` with the prescaler bits masked off.
///
/// Any value read from the hardware is representable, including codes that
/// have no name here. Classification is left to the caller, see
/// [`StatusCode::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct StatusCode(u8);

impl StatusCode {
    pub const BUS_ERROR: Self = Self(0x00);
    pub const START: Self = Self(0x08);
    pub const REP_START: Self = Self(0x10);
    pub const MT_SLA_ACK: Self = Self(0x18);
    pub const MT_SLA_NACK: Self = Self(0x20);
    pub const MT_DATA_ACK: Self = Self(0x28);
    pub const MT_DATA_NACK: Self = Self(0x30);
    pub const ARB_LOST: Self = Self(0x38);
    pub const MR_SLA_ACK: Self = Self(0x40);
    pub const MR_SLA_NACK: Self = Self(0x48);
    pub const MR_DATA_ACK: Self = Self(0x50);
    pub const MR_DATA_NACK: Self = Self(0x58);
    pub const NO_INFO: Self = Self(0xF8);

    /// Keeps the five status bits of a raw `TWSR` value.
    #[inline(always)]
    pub const fn from_twsr(raw: u8) -> Self {
        Self(raw & Twsr::STATUS_MASK)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn kind(self) -> Option<Status> {
        Some(match self.0 {
            0x00 => Status::BusError,
            0x08 => Status::StartSent,
            0x10 => Status::RepeatedStartSent,
            0x18 => Status::WriteAddressAcked,
            0x20 => Status::WriteAddressNacked,
            0x28 => Status::DataSentAcked,
            0x30 => Status::DataSentNacked,
            0x38 => Status::ArbitrationLost,
            0x40 => Status::ReadAddressAcked,
            0x48 => Status::ReadAddressNacked,
            0x50 => Status::DataReceivedAcked,
            0x58 => Status::DataReceivedNacked,
            0xF8 => Status::NoInformation,
            _ => return None,
        })
    }
}

impl From<StatusCode> for u8 {
    #[inline(always)]
    fn from(value: StatusCode) -> u8 {
        value.0
    }
}

impl core::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{:#04x} ({})", self.0, kind),
            None => write!(f, "{:#04x}", self.0),
        }
    }
}

/// Master mode states named by the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    StartSent,
    RepeatedStartSent,
    WriteAddressAcked,
    WriteAddressNacked,
    DataSentAcked,
    DataSentNacked,
    ArbitrationLost,
    ReadAddressAcked,
    ReadAddressNacked,
    DataReceivedAcked,
    DataReceivedNacked,
    NoInformation,
    BusError,
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::StartSent => "START sent",
            Self::RepeatedStartSent => "repeated START sent",
            Self::WriteAddressAcked => "SLA+W sent, ACK received",
            Self::WriteAddressNacked => "SLA+W sent, NACK received",
            Self::DataSentAcked => "data sent, ACK received",
            Self::DataSentNacked => "data sent, NACK received",
            Self::ArbitrationLost => "arbitration lost",
            Self::ReadAddressAcked => "SLA+R sent, ACK received",
            Self::ReadAddressNacked => "SLA+R sent, NACK received",
            Self::DataReceivedAcked => "data received, ACK returned",
            Self::DataReceivedNacked => "data received, NACK returned",
            Self::NoInformation => "no state information",
            Self::BusError => "bus error",
        })
    }
}

#[inline(always)]
pub(crate) fn decode<R: Registers>(regs: &R) -> StatusCode {
    StatusCode::from_twsr(regs.twsr().bits())
}
