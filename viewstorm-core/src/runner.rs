mod attempt;
mod error;
mod progress;
mod run;
mod stop;
mod worker;

pub use attempt::{Attempt, BODY_PREVIEW_CHARS, RequestTemplate, send_one};
pub use error::{Error, Result};
pub use progress::{ProgressFn, ProgressUpdate};
pub use run::{RunOptions, run};
pub use stop::StopSignal;
