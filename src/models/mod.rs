//! Allocation domain models.
//!
//! Passive data the round driver owns and the dispatcher mutates:
//! tasks split into scenes, providers with availability and a ledger,
//! per-round combos, and dispatch output records.
//!
//! # Domain Mappings
//!
//! | render-alloc | Rendering farm | Batch compute |
//! |--------------|----------------|---------------|
//! | Task | Render job | Job array |
//! | Scene | Shot / frame range | Array element |
//! | Provider | GPU node | Worker VM |
//! | Combo | Round proposal | Placement plan |

mod calendar;
mod combo;
mod input;
mod provider;
mod schedule;
mod task;

pub use calendar::{hours_to_ms, ms_to_hours, Availability, TimeWindow, MS_PER_HOUR};
pub use combo::Combo;
pub use input::{InputData, ProviderSpec, TaskSpec};
pub use provider::Provider;
pub use schedule::{Assignment, Reservation, ReservationScope, Schedule};
pub use task::{SceneAllocation, Task};
