//! Stage of a two-stage run

/// Which half of a two-stage run an exchange belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Classification under the triage profile.
    Triage,
    /// Follow-up under the detailed profile.
    Detailed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Triage => "triage",
            Stage::Detailed => "detailed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
