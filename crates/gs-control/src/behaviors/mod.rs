//! The behavior catalogue.

pub mod abend;
pub mod dive_climb;
pub mod goto_list;
pub mod passive;
pub mod prepare;
pub mod set_heading;
pub mod surface;
pub mod yo;

pub use abend::{Abend, AbendParams};
pub use dive_climb::{DiveClimb, DiveClimbParams, UpDown, Vertical};
pub use goto_list::{GotoList, GotoListParams};
pub use passive::{Passive, SampleParams, SensorsInParams};
pub use prepare::{PrepareToDive, PrepareToDiveParams};
pub use set_heading::{SetHeading, SetHeadingParams};
pub use surface::{Surface, SurfaceParams};
pub use yo::{SgYoParams, Yo, YoParams};
