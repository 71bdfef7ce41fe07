//! Actuator directives emitted by behaviors.

use std::fmt;

use crate::{ControlError, ControlResult};

/// The three shared actuators behaviors compete for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Pump,
    PitchMotor,
    Fin,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Pump, Channel::PitchMotor, Channel::Fin];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Pump       => 0,
            Channel::PitchMotor => 1,
            Channel::Fin        => 2,
        }
    }
}

/// A request for one actuator channel.
///
/// The channel is implied by the variant, so routing is total.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Directive {
    /// Ballast volume, cc (`c_ballast_pumped`).
    BallastPumped(f64),
    /// Battery position, inch (`c_battpos`).
    BattPos(f64),
    /// Pitch angle, rad (`c_pitch`); resolved through the pitch PID.
    Pitch(f64),
    /// Heading, rad (`c_heading`); resolved through the fin PID.
    Heading(f64),
    /// Fin angle, rad (`c_fin`).
    Fin(f64),
    /// Waypoint in local mission coordinates (`c_wpt_latlon`).
    Waypoint { x: f64, y: f64 },
}

impl Directive {
    pub fn channel(self) -> Channel {
        match self {
            Directive::BallastPumped(_)           => Channel::Pump,
            Directive::BattPos(_) | Directive::Pitch(_) => Channel::PitchMotor,
            Directive::Heading(_) | Directive::Fin(_) | Directive::Waypoint { .. } => Channel::Fin,
        }
    }

    /// Flight-computer name of the directive.
    pub fn name(self) -> &'static str {
        match self {
            Directive::BallastPumped(_) => "c_ballast_pumped",
            Directive::BattPos(_)       => "c_battpos",
            Directive::Pitch(_)         => "c_pitch",
            Directive::Heading(_)       => "c_heading",
            Directive::Fin(_)           => "c_fin",
            Directive::Waypoint { .. }  => "c_wpt_latlon",
        }
    }

    /// Build a directive from its flight-computer name and value(s).
    ///
    /// `c_wpt_latlon` takes two values (LMC x, y); every other name takes one.
    pub fn from_name(name: &str, values: &[f64]) -> ControlResult<Self> {
        let scalar = || match values {
            [v] => Ok(*v),
            _ => Err(ControlError::Config(format!(
                "`{name}` takes one value, got {}",
                values.len()
            ))),
        };
        match name {
            "c_ballast_pumped" => Ok(Directive::BallastPumped(scalar()?)),
            "c_battpos"        => Ok(Directive::BattPos(scalar()?)),
            "c_pitch"          => Ok(Directive::Pitch(scalar()?)),
            "c_heading"        => Ok(Directive::Heading(scalar()?)),
            "c_fin"            => Ok(Directive::Fin(scalar()?)),
            "c_wpt_latlon" => match values {
                [x, y] => Ok(Directive::Waypoint { x: *x, y: *y }),
                _ => Err(ControlError::Config(format!(
                    "`c_wpt_latlon` takes two values, got {}",
                    values.len()
                ))),
            },
            other => Err(ControlError::UnknownDirective(other.to_owned())),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Waypoint { x, y } => write!(f, "{}=({x:.1}, {y:.1})", self.name()),
            Directive::BallastPumped(v)
            | Directive::BattPos(v)
            | Directive::Pitch(v)
            | Directive::Heading(v)
            | Directive::Fin(v) => write!(f, "{}={v:.4}", self.name()),
        }
    }
}
