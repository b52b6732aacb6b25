use std::fmt;

use glam::DVec3;

/// DIS dead reckoning algorithm: rotation Fixed or Rotating, constant rate
/// of Position or Velocity, World or Body coordinates.
///
/// Body-frame variants and all angular extrapolation are not implemented and
/// leave the pose untouched; [`DeadReckoningModel::is_implemented`] reports
/// which variants actually move an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeadReckoningModel {
    #[default]
    Other,
    Static,
    Fpw,
    Rpw,
    Rvw,
    Fvw,
    Fpb,
    Rpb,
    Rvb,
    Fvb,
}

impl From<u8> for DeadReckoningModel {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Static,
            2 => Self::Fpw,
            3 => Self::Rpw,
            4 => Self::Rvw,
            5 => Self::Fvw,
            6 => Self::Fpb,
            7 => Self::Rpb,
            8 => Self::Rvb,
            9 => Self::Fvb,
            _ => Self::Other,
        }
    }
}

impl From<DeadReckoningModel> for u8 {
    fn from(model: DeadReckoningModel) -> Self {
        match model {
            DeadReckoningModel::Other => 0,
            DeadReckoningModel::Static => 1,
            DeadReckoningModel::Fpw => 2,
            DeadReckoningModel::Rpw => 3,
            DeadReckoningModel::Rvw => 4,
            DeadReckoningModel::Fvw => 5,
            DeadReckoningModel::Fpb => 6,
            DeadReckoningModel::Rpb => 7,
            DeadReckoningModel::Rvb => 8,
            DeadReckoningModel::Fvb => 9,
        }
    }
}

impl DeadReckoningModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Static => "Static",
            Self::Fpw => "FPW",
            Self::Rpw => "RPW",
            Self::Rvw => "RVW",
            Self::Fvw => "FVW",
            Self::Fpb => "FPB",
            Self::Rpb => "RPB",
            Self::Rvb => "RVB",
            Self::Fvb => "FVB",
        }
    }

    pub fn is_body_frame(self) -> bool {
        matches!(self, Self::Fpb | Self::Rpb | Self::Rvb | Self::Fvb)
    }

    /// `Static` counts as implemented: holding still is its behaviour.
    pub fn is_implemented(self) -> bool {
        matches!(
            self,
            Self::Static | Self::Fpw | Self::Rpw | Self::Rvw | Self::Fvw
        )
    }

    /// Position after `dt` seconds, or `None` when this model leaves the
    /// position unchanged.
    pub fn extrapolate(
        self,
        position: DVec3,
        velocity: DVec3,
        acceleration: DVec3,
        dt: f64,
    ) -> Option<DVec3> {
        match self {
            // rotating variants share the linear term; angular rate is ignored
            Self::Fpw | Self::Rpw => Some(position + velocity * dt),
            Self::Fvw | Self::Rvw => Some(position + velocity * dt + acceleration * (0.5 * dt * dt)),
            Self::Static | Self::Other => None,
            Self::Fpb | Self::Rpb | Self::Rvb | Self::Fvb => None,
        }
    }
}

impl fmt::Display for DeadReckoningModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
