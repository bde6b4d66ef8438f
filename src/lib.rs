//! # driftfield
//!
//! A decorative animated particle backdrop behind a static greeting page.
//!
//! A fixed pool of 100 falling point sprites is drawn with wgpu beneath a
//! centered heading. Particles re-randomize horizontally when the window
//! resizes, fall a little every frame, and recycle back to the top once they
//! drop past the bottom edge.
//!
//! ## Quick Start
//!
//! ```ignore
//! fn main() -> Result<(), driftfield::AppError> {
//!     driftfield::run()
//! }
//! ```
//!
//! The animation itself lives in [`ParticleField`] and is pure CPU-side
//! array math; the GPU layer re-uploads the instance buffer whenever the
//! field flags its positions dirty.

mod app;
pub mod camera;
pub mod error;
pub mod field;
mod gpu;
mod ui;

pub use app::{run, App};
pub use camera::{Camera, Viewport};
pub use error::{AppError, GpuError};
pub use field::{FieldRng, ParticleField, PARTICLE_COUNT};
