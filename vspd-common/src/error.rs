use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error as ErrorTrait;

#[derive(Debug, Clone, ErrorTrait)]
pub struct Error {
    ctx: Kind,
}

impl Error {
    fn new(ctx: Kind) -> Self {
        Self { ctx }
    }

    pub fn kind(&self) -> &Kind {
        &self.ctx
    }

    pub fn is_config(&self) -> bool {
        matches!(&self.ctx, Kind::Config(_))
    }

    pub fn is_inventory(&self) -> bool {
        matches!(&self.ctx, Kind::Inventory(_))
    }

    pub fn is_check_failed(&self) -> bool {
        matches!(&self.ctx, Kind::CheckFailed { .. })
    }

    pub fn is_cycle_incomplete(&self) -> bool {
        matches!(&self.ctx, Kind::CycleIncomplete(_))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(Kind::Config(msg.into()))
    }

    pub fn inventory(msg: impl Into<String>) -> Self {
        Self::new(Kind::Inventory(msg.into()))
    }

    pub fn check_failed(check: &'static str, reason: impl Into<String>) -> Self {
        Self::new(Kind::CheckFailed {
            check,
            reason: reason.into(),
        })
    }

    pub fn cycle_incomplete(failed_checks: usize) -> Self {
        Self::new(Kind::CycleIncomplete(failed_checks))
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self::new(Kind::Failed(cause.into()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        Display::fmt(&self.ctx, f)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Config(msg) => write!(f, "config error: {}", msg),
            Self::Inventory(msg) => write!(f, "inventory error: {}", msg),
            Self::CheckFailed { check, reason } => write!(f, "check {} failed: {}", check, reason),
            Self::CycleIncomplete(failed) => {
                write!(f, "check cycle incomplete, {} check(s) failed", failed)
            }
            Self::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Kind {
    Config(String),
    Inventory(String),
    CheckFailed { check: &'static str, reason: String },
    CycleIncomplete(usize),
    Failed(String),
}
