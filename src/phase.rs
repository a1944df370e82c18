use std::fmt::Display;

/// The two states a signal alternates between.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Red = 0,
    Green = 1,
}

impl Phase {
    /// The phase a signal flips to from `self`.
    pub fn complement(self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    pub fn is_red(self) -> bool {
        self == Phase::Red
    }

    pub fn is_green(self) -> bool {
        self == Phase::Green
    }

    pub(crate) fn from_raw(raw: u8) -> Phase {
        match raw {
            1 => Phase::Green,
            _ => Phase::Red,
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Phase::Red),
            1 => Ok(Phase::Green),
            other => Err(other),
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Red => write!(f, "red"),
            Phase::Green => write!(f, "green"),
        }
    }
}
