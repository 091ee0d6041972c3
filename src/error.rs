use thiserror::Error;

/// Fatal conditions. A value that merely fails numeric or URI parsing is
/// handled inside the parser as a skip and never becomes one of these.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to load label config")]
    Config(#[source] anyhow::Error),

    #[error("failed to read input")]
    Input(#[source] anyhow::Error),

    #[error("could not find {label} label at line {line}")]
    MissingField { label: String, line: u64 },

    #[error("terminal rendering failed")]
    Render(#[source] anyhow::Error),
}

impl ProfileError {
    /// sysexits-style codes: EX_IOERR for unreadable input, EX_SOFTWARE for
    /// anything that dies mid-run.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProfileError::Input(_) => 74,
            ProfileError::Config(_)
            | ProfileError::MissingField { .. }
            | ProfileError::Render(_) => 70,
        }
    }
}
