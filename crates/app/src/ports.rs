//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory;
pub mod clock;
pub mod times_source;

pub use accessory::AccessorySink;
pub use clock::{Clock, SystemClock};
pub use times_source::PrayerTimesSource;
