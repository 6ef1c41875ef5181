// Clock abstraction and the scheduled-task registry used by the spawner.

mod clock;
mod task;

pub use clock::{ClockSource, MockClock, SystemClock};
pub use task::{Epoch, TaskQueue};
