//! Host collaborators for the review engine.
//!
//! The engine never talks to the platform directly. It asks these traits
//! for the time, the running app version, a prompt, and a place to log.

pub mod clock;
pub mod logging;
pub mod prompt;
pub mod traits;
pub mod version;

pub use clock::{ManualClock, SystemClock};
pub use logging::{init_tracing, TracingLogger};
pub use prompt::{CommandPrompt, RecordingPrompt, StderrPrompt};
pub use traits::{Clock, PromptRequester, ReviewLogger, VersionProvider};
pub use version::{AppVersion, EnvVersion, StaticVersion};
