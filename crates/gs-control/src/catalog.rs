//! Serializable behavior specs and their construction.

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, ControlBehavior};
use crate::behaviors::{
    Abend, AbendParams, DiveClimb, DiveClimbParams, GotoList, GotoListParams, Passive, PrepareToDive,
    PrepareToDiveParams, SampleParams, SensorsInParams, SetHeading, SetHeadingParams, SgYoParams, Surface,
    SurfaceParams, Yo, YoParams,
};
use crate::ControlResult;

/// One entry of a mission's behavior list, tagged by `"behavior"`:
///
/// ```json
/// { "behavior": "dive_to", "target_depth": 20.0, "use_pitch": 3, "pitch_value": -0.45 }
/// ```
///
/// Omitted parameters take their documented defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum BehaviorConfig {
    Abend(AbendParams),
    DiveTo(DiveClimbParams),
    ClimbTo(DiveClimbParams),
    Yo(YoParams),
    SgYo(SgYoParams),
    GotoList(GotoListParams),
    Surface(SurfaceParams),
    SetHeading(SetHeadingParams),
    PrepareToDive(PrepareToDiveParams),
    Sample(SampleParams),
    SensorsIn(SensorsInParams),
}

impl BehaviorConfig {
    /// The behavior's mission-file name.
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorConfig::Abend(_)         => "Abend",
            BehaviorConfig::DiveTo(_)        => "Dive_to",
            BehaviorConfig::ClimbTo(_)       => "Climb_to",
            BehaviorConfig::Yo(_)            => "Yo",
            BehaviorConfig::SgYo(_)          => "SGYo",
            BehaviorConfig::GotoList(_)      => "Goto_list",
            BehaviorConfig::Surface(_)       => "Surface",
            BehaviorConfig::SetHeading(_)    => "Set_heading",
            BehaviorConfig::PrepareToDive(_) => "Prepare_to_dive",
            BehaviorConfig::Sample(_)        => "Sample",
            BehaviorConfig::SensorsIn(_)     => "Sensors_in",
        }
    }

    /// Construct and wire the behavior.  Parameter errors surface here.
    pub fn build(self) -> ControlResult<Box<dyn ControlBehavior>> {
        let behavior: Box<dyn ControlBehavior> = match self {
            BehaviorConfig::Abend(p)         => Box::new(Behavior::new(Abend::new(p))?),
            BehaviorConfig::DiveTo(p)        => Box::new(Behavior::new(DiveClimb::dive(p))?),
            BehaviorConfig::ClimbTo(p)       => Box::new(Behavior::new(DiveClimb::climb(p))?),
            BehaviorConfig::Yo(p)            => Box::new(Behavior::new(Yo::new(p))?),
            BehaviorConfig::SgYo(p)          => Box::new(Behavior::new(Yo::seaglider(p)?)?),
            BehaviorConfig::GotoList(p)      => Box::new(Behavior::new(GotoList::new(p))?),
            BehaviorConfig::Surface(p)       => Box::new(Behavior::new(Surface::new(p))?),
            BehaviorConfig::SetHeading(p)    => Box::new(Behavior::new(SetHeading::new(p))?),
            BehaviorConfig::PrepareToDive(p) => Box::new(Behavior::new(PrepareToDive::new(p))?),
            BehaviorConfig::Sample(p)        => Box::new(Behavior::new(Passive::sample(p))?),
            BehaviorConfig::SensorsIn(p)     => Box::new(Behavior::new(Passive::sensors_in(p))?),
        };
        Ok(behavior)
    }
}
