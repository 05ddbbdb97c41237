use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("replay failed: {0}")]
    Replay(#[from] raceguard_io::IoError),

    #[error("unknown demo scenario: {0} (expected one of s1-s6)")]
    UnknownScenario(String),
}
