//! Error taxonomy shared by the solver, the fitter and the binary.
//!
//! Every failure is a local, deterministic computation failure: retrying the same
//! call yields the same error, so nothing here is retried.

/// Which of the two nested curve fits failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStage {
    /// Inner fit `Vmax(T) = a / T` for one displacement sample.
    Duration,
    /// Outer fit `a(xT) = b·xT + c` over all displacement samples.
    Displacement,
}

impl FitStage {
    pub fn display_name(self) -> &'static str {
        match self {
            FitStage::Duration => "duration (Vmax = a/T)",
            FitStage::Displacement => "displacement (a = b*xT + c)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Degenerate input, e.g. `T = 0` or a closed form that is not finite.
    Domain,
    /// Invalid sweep or schedule configuration.
    Configuration,
    /// Nonlinear least squares did not converge.
    FitConvergence {
        stage: FitStage,
        /// Displacement sample index for inner-fit failures.
        sample: Option<usize>,
    },
    /// Export/file errors (binary only).
    Io,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn fit_convergence(stage: FitStage, sample: Option<usize>, reason: impl std::fmt::Display) -> Self {
        let message = match sample {
            Some(i) => format!("Fit did not converge at stage {} (sample {i}): {reason}", stage.display_name()),
            None => format!("Fit did not converge at stage {}: {reason}", stage.display_name()),
        };
        Self::new(ErrorKind::FitConvergence { stage, sample }, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Configuration => 2,
            ErrorKind::Domain => 3,
            ErrorKind::FitConvergence { .. } => 4,
            ErrorKind::Io => 5,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
