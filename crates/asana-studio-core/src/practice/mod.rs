mod phase;
mod queue;
mod step;

pub use phase::{phase, phase_labels, Phase};
pub use queue::{move_item, Queue};
pub use step::{HoldSeconds, PoseId, PoseStep, Side};
