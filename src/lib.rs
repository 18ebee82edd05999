mod color;
mod effect;
mod error;
mod gpu;
mod host;
mod param;
#[cfg(feature = "preview")]
mod provider;

pub use color::*;
pub use effect::*;
pub use error::*;
pub use gpu::*;
pub use host::*;
pub use param::*;
#[cfg(feature = "preview")]
pub use provider::*;
