//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod renderer;
mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use renderer::{ContentRenderer, RenderError};
pub use repository::{BaseRepository, PostRepository, TagRepository};
