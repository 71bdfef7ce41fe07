//! The mission-status bitmask.

use bitflags::bitflags;
use log::info;

bitflags! {
    /// Progress of one mission run.
    ///
    /// Monotonic: bits are only ever added via [`raise`][MissionStatus::raise]
    /// during a run.  A fresh run starts at [`MissionStatus::start`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MissionStatus: u32 {
        const IN_PROGRESS      = 1;
        const TO_QUIT          = 2;
        const COMPLETED        = 4;
        const ABORT_OVERTIME   = 8;
        const ABORT_OVERDEPTH  = 16;
        const ABORT_SAMEDEPTH  = 32;
        const ABORT_STACK_IDLE = 64;

        const ABORTS = Self::ABORT_OVERTIME.bits()
            | Self::ABORT_OVERDEPTH.bits()
            | Self::ABORT_SAMEDEPTH.bits()
            | Self::ABORT_STACK_IDLE.bits();
    }
}

impl MissionStatus {
    pub fn start() -> Self {
        MissionStatus::IN_PROGRESS
    }

    /// Add `bits`; never clears anything.
    pub fn raise(&mut self, bits: MissionStatus) {
        let new = bits.difference(*self);
        if !new.is_empty() {
            info!("mission status raised: {new:?}");
        }
        self.insert(bits);
    }

    /// Any abort bit is set.
    #[inline]
    pub fn is_aborting(self) -> bool {
        self.intersects(MissionStatus::ABORTS)
    }

    /// Completed or aborting: behaviors no longer get a say.
    #[inline]
    pub fn overrides_behaviors(self) -> bool {
        self.intersects(MissionStatus::COMPLETED | MissionStatus::ABORTS)
    }
}

impl Default for MissionStatus {
    fn default() -> Self {
        MissionStatus::start()
    }
}
