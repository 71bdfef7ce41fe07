//! The closed vocabulary of mission-state variables.
//!
//! Naming follows the flight-computer convention: `m_*` measured, `c_*`
//! commanded, `x_*` internal estimates, `u_*` user settings.  Everything the
//! control stack, the flight model, or a sensor preset may touch has a
//! variant here, so a misspelt name is rejected once at load time instead of
//! surfacing mid-run.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Generate the `Field` enum together with its name table and seed values.
macro_rules! glider_fields {
    ($($(#[$attr:meta])* $variant:ident => $name:literal = $init:expr,)*) => {
        /// One variable of the mission state.
        ///
        /// The discriminant doubles as the index into
        /// [`GliderState`][crate::GliderState]'s value array.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub enum Field {
            $($(#[$attr])* $variant,)*
        }

        impl Field {
            /// Every field, in declaration order.
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            /// Number of fields; the length of the state value array.
            pub const COUNT: usize = Field::ALL.len();

            /// The flight-computer name of this field (e.g. `"m_depth"`).
            pub fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)*
                }
            }

            /// Value the field holds when a mission state is created.
            pub fn initial_value(self) -> f64 {
                match self {
                    $(Field::$variant => $init,)*
                }
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self as usize
            }
        }

        impl FromStr for Field {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Field, CoreError> {
                match s {
                    $($name => Ok(Field::$variant),)*
                    other => Err(CoreError::UnknownField(other.to_owned())),
                }
            }
        }
    };
}

glider_fields! {
    // ── Depth, time and idle timers ──────────────────────────────────────
    Depth                  => "m_depth"                     = 0.0,
    Pressure               => "m_pressure"                  = 0.0,
    Altitude               => "m_altitude"                  = 1e9,
    PresentTime            => "m_present_time"              = 0.0,
    PresentSecsIntoMission => "m_present_secs_into_mission" = 0.0,
    MissionStartTime       => "m_mission_start_time"        = 0.0,
    SamedepthFor           => "samedepth_for"               = 0.0,
    HoverFor               => "hover_for"                   = 0.0,
    StalledFor             => "stalled_for"                 = 0.0,
    Nocomms                => "nocomms"                     = 0.0,
    TimeSinceCycleStart    => "time_since_cycle_start"      = 0.0,
    SegmentNumber          => "m_segment_number"            = 0.0,
    /// Seconds the vehicle stays busy at the surface before the next dive.
    InitDiveTime           => "init_dive_time"              = 80.0,
    /// Non-zero when continuing a mission that was already underway.
    Pickup                 => "pickup"                      = 0.0,

    // ── Actuator stack bookkeeping ───────────────────────────────────────
    Stack                  => "stack"                       = 1.0,
    BpumpStack             => "bpump_stack"                 = 0.0,
    PitchStack             => "pitch_stack"                 = 0.0,
    FinStack               => "fin_stack"                   = 0.0,
    KeepStackBusy          => "keep_stack_busy"             = 0.0,

    // ── Actuators ────────────────────────────────────────────────────────
    BallastPumped          => "m_ballast_pumped"            = 0.0,
    CBallastPumped         => "c_ballast_pumped"            = 230.0,
    BattPos                => "m_battpos"                   = 0.0,
    CBattPos               => "c_battpos"                   = 1.0,
    Fin                    => "m_fin"                       = 0.0,
    CFin                   => "c_fin"                       = 0.0,

    // ── Attitude ─────────────────────────────────────────────────────────
    Pitch                  => "m_pitch"                     = 0.0,
    CPitch                 => "c_pitch"                     = 0.0,
    Heading                => "m_heading"                   = 0.0,
    HeadingRate            => "m_heading_rate"              = 0.0,
    CHeading               => "c_heading"                   = 0.0,
    Speed                  => "m_speed"                     = 0.0,
    XSpeed                 => "x_speed"                     = 0.0,
    XEastwardVelocity      => "x_eastward_glider_velocity"  = 0.0,
    XNorthwardVelocity     => "x_northward_glider_velocity" = 0.0,
    XUpwardVelocity        => "x_upward_glider_velocity"    = 0.0,

    // ── Position and navigation ──────────────────────────────────────────
    /// Dead-reckoned latitude, NMEA `DDMM.mmmm`.
    Lat                    => "m_lat"                       = 0.0,
    /// Dead-reckoned longitude, NMEA `DDDMM.mmmm`.
    Lon                    => "m_lon"                       = 0.0,
    LmcX                   => "m_lmc_x"                     = 0.0,
    LmcY                   => "m_lmc_y"                     = 0.0,
    XLat                   => "x_lat"                       = 0.0,
    XLon                   => "x_lon"                       = 0.0,
    XLmcX                  => "x_lmc_x"                     = 0.0,
    XLmcY                  => "x_lmc_y"                     = 0.0,
    XLmcZ                  => "x_lmc_z"                     = 0.0,
    DistToWpt              => "m_dist_to_wpt"               = 9e9,
    CWptLat                => "c_wpt_lat"                   = -1.0,
    CWptLon                => "c_wpt_lon"                   = -1.0,
    CWptLmcX               => "c_wpt_lmc_x"                 = 0.0,
    CWptLmcY               => "c_wpt_lmc_y"                 = 0.0,
    XLastWptLat            => "x_last_wpt_lat"              = 69_696_969.0,
    XLastWptLon            => "x_last_wpt_lon"              = 69_696_969.0,
    XLmcXWptCalc           => "x_lmc_x_wpt_calc"            = 0.0,
    XLmcYWptCalc           => "x_lmc_y_wpt_calc"            = 0.0,
    XGpsLmcXDive           => "x_gps_lmc_x_dive"            = 0.0,
    XGpsLmcYDive           => "x_gps_lmc_y_dive"            = 0.0,
    XTimeDive              => "x_time_dive"                 = 0.0,
    GpsStatus              => "m_gps_status"                = 0.0,
    CGpsOn                 => "c_gps_on"                    = 0.0,
    UseCurrentCorrection   => "u_use_current_correction"    = 0.0,
    WaterVx                => "m_water_vx"                  = 0.0,
    WaterVy                => "m_water_vy"                  = 0.0,

    // ── Ambient water ────────────────────────────────────────────────────
    XU                     => "x_u"                         = 0.0,
    XV                     => "x_v"                         = 0.0,
    XW                     => "x_w"                         = 0.0,
    Temp                   => "temp"                        = 0.0,
    Salt                   => "salt"                        = 0.0,
    Rho                    => "rho"                         = 0.0,
    WaterDepth             => "water_depth"                 = 0.0,
    XWaterDepth            => "x_water_depth"               = 0.0,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
