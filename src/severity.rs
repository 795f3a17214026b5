//! Severity levels of runtime error signals.
//!
//! Severities are single bits so they can be combined into reporting masks.
//! Signals carry the raw `i32` code; [`Severity`] names the known bits.

use strum_macros::{Display, EnumIter, IntoStaticStr};

/// All severities combined.
pub const ALL: i32 = 0x7FFF;

/// A known severity bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[repr(i32)]
pub enum Severity {
    #[strum(serialize = "Error")]
    Error = 1,
    #[strum(serialize = "Warning")]
    Warning = 2,
    #[strum(serialize = "Parse Error")]
    Parse = 4,
    #[strum(serialize = "Notice")]
    Notice = 8,
    #[strum(serialize = "Core Error")]
    CoreError = 16,
    #[strum(serialize = "Core Warning")]
    CoreWarning = 32,
    #[strum(serialize = "Compile Error")]
    CompileError = 64,
    #[strum(serialize = "Compile Warning")]
    CompileWarning = 128,
    #[strum(serialize = "User Error")]
    UserError = 256,
    #[strum(serialize = "User Warning")]
    UserWarning = 512,
    #[strum(serialize = "User Notice")]
    UserNotice = 1024,
    #[strum(serialize = "Strict Standards")]
    Strict = 2048,
    #[strum(serialize = "Recoverable Error")]
    RecoverableError = 4096,
    #[strum(serialize = "Deprecated")]
    Deprecated = 8192,
    #[strum(serialize = "User Deprecated")]
    UserDeprecated = 16384,
}

impl Severity {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up the severity for an exact single-bit code.
    pub fn from_code(code: i32) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|severity| severity.code() == code)
    }

    /// Whether signals of this severity are fatal to the current operation.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::Error
                | Self::Parse
                | Self::CoreError
                | Self::CompileError
                | Self::UserError
                | Self::RecoverableError
        )
    }

    pub fn is_deprecation(self) -> bool {
        matches!(self, Self::Deprecated | Self::UserDeprecated)
    }
}

impl From<Severity> for i32 {
    fn from(severity: Severity) -> Self {
        severity.code()
    }
}

/// Human readable name for a raw severity code, `"Unknown Error"` for
/// combined or unknown bits.
pub fn name_of(code: i32) -> &'static str {
    Severity::from_code(code)
        .map(<&'static str>::from)
        .unwrap_or("Unknown Error")
}
