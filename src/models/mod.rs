/// Reference bottle dimensions keyed by type tag
pub mod bottle_spec;
/// Stage outputs (detections, levels, volumes)
pub mod detection;
/// Borrowed interleaved color frames
pub mod frame;
/// Axis-aligned pixel rectangles
pub mod region;

pub use bottle_spec::{BottleSpec, GENERIC_BOTTLE};
pub use detection::{BottleDetection, FluidLevelEstimate, LevelSource, VolumeEstimate};
pub use frame::{ChannelOrder, Frame};
pub use region::BoundingRegion;
