//! Shows the solid color generator in a desktop window.
//!
//! Usage: `cargo run --example preview --features preview -- [red] [green] [blue] [alpha]`
//! where every component is a number between 0 and 1. Missing components keep their default.

use solid_color::*;

fn main() {
    init_logging();

    let mut effect: SolidColorEffect<GlowBackend> = SolidColorEffect::new();
    for (slot, argument) in ColorParam::ALL.iter().zip(std::env::args().skip(1)) {
        match argument.parse::<f32>() {
            Ok(value) => {
                if !effect.parameters_mut().set_normalized(slot.index(), value) {
                    eprintln!("Ignoring invalid {} value {}", slot.name(), argument);
                }
            }
            Err(_) => eprintln!("Ignoring {} value {}: not a number", slot.name(), argument),
        }
    }

    if let Err(error) = start(effect, "Solid Color") {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
