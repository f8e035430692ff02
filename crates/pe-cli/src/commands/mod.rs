pub mod check;
pub mod eval;
pub mod synth;

pub use check::check_command;
pub use eval::eval_command;
pub use synth::synth_command;
