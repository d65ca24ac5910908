mod build;
mod defines;
mod pipeline;
mod release;

pub use build::build;
pub use defines::defines;
pub use release::release;
