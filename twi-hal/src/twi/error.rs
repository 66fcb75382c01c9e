use super::StatusCode;

/// Why a bus step did not reach the expected state.
///
/// The register-level operations never produce this: they only expose the
/// raw [`StatusCode`]. It is built by the bounded waits and by the
/// transaction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Another master won the bus.
    ArbitrationLost,
    /// Nobody acknowledged SLA+R or SLA+W.
    AddressNack,
    /// The addressed peer refused a data byte.
    DataNack,
    /// Illegal START or STOP seen on the bus.
    BusError,
    /// Any other status where a specific one was expected.
    Unexpected(StatusCode),
    /// `TWINT` was not set within the allowed number of polls.
    Timeout,
}

impl Error {
    /// Classifies a status that was not the expected one.
    pub const fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::ARB_LOST => Self::ArbitrationLost,
            StatusCode::MT_SLA_NACK | StatusCode::MR_SLA_NACK => Self::AddressNack,
            StatusCode::MT_DATA_NACK => Self::DataNack,
            StatusCode::BUS_ERROR => Self::BusError,
            other => Self::Unexpected(other),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ArbitrationLost => f.write_str("arbitration lost"),
            Self::AddressNack => f.write_str("address not acknowledged"),
            Self::DataNack => f.write_str("data not acknowledged"),
            Self::BusError => f.write_str("bus error"),
            Self::Unexpected(status) => write!(f, "unexpected status {}", status),
            Self::Timeout => f.write_str("timed out waiting for TWINT"),
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

        match self {
            Self::ArbitrationLost => ErrorKind::ArbitrationLoss,
            Self::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Self::BusError => ErrorKind::Bus,
            Self::Unexpected(_) | Self::Timeout => ErrorKind::Other,
        }
    }
}
