pub mod bundler;
pub mod error;
pub mod esbuild;
pub mod executor;
pub mod sentry;

pub use bundler::{BundleError, BundleOutcome, Bundler};
pub use error::ExecError;
pub use executor::{CommandExecutor, RealExecutor};
pub use sentry::ReleaseError;
