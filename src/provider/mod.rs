mod desktop;

pub use desktop::*;
