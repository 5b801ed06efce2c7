use crate::exit_codes::ExitCode;

#[derive(Debug)]
pub enum RunError {
    InvalidInput(anyhow::Error),
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }

    #[must_use]
    pub fn anyhow(&self) -> &anyhow::Error {
        match self {
            Self::InvalidInput(e) | Self::RuntimeError(e) => e,
        }
    }
}

impl From<viewstorm_core::runner::Error> for RunError {
    fn from(err: viewstorm_core::runner::Error) -> Self {
        match err {
            viewstorm_core::runner::Error::Config(err) => {
                Self::InvalidInput(anyhow::Error::new(err).context("invalid configuration"))
            }
            err @ viewstorm_core::runner::Error::Join(_) => {
                Self::RuntimeError(anyhow::Error::new(err).context("run failed"))
            }
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(e) | Self::RuntimeError(e) => {
                write!(f, "{e:#}")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.anyhow().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewstorm_core::ConfigError;

    #[test]
    fn config_errors_map_to_invalid_input() {
        let err = RunError::from(viewstorm_core::runner::Error::Config(
            ConfigError::InvalidConcurrency,
        ));
        assert_eq!(err.exit_code(), ExitCode::InvalidInput);
        assert_eq!(
            err.to_string(),
            "invalid configuration: `concurrency` must be a positive integer"
        );
    }
}
