use std::fmt;
use std::str::FromStr;

/// Display status of an evaluation's audio, derived purely from the
/// `audio_sent` / `audio_treated` flags. Never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioStatus {
    Pending,
    Processing,
    Completed,
}

impl AudioStatus {
    pub fn from_flags(sent: bool, treated: bool) -> Self {
        match (sent, treated) {
            (_, true) => AudioStatus::Completed,
            (true, false) => AudioStatus::Processing,
            (false, false) => AudioStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioStatus::Pending => "pending",
            AudioStatus::Processing => "processing",
            AudioStatus::Completed => "completed",
        }
    }
}

impl FromStr for AudioStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AudioStatus::Pending),
            "processing" => Ok(AudioStatus::Processing),
            "completed" => Ok(AudioStatus::Completed),
            _ => Err(format!("Invalid audio status: {}", s)),
        }
    }
}

impl fmt::Display for AudioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of an evaluation in the upload/processing lifecycle.
///
/// `None` — no audio ever associated. `UploadPending` — an upload URL was
/// issued but the client has not confirmed the PUT. `Sent` — upload
/// confirmed, worker has not finished. `Treated` — analysis durably stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    None,
    UploadPending,
    Sent,
    Treated,
}

impl AudioState {
    pub fn derive(file_name: Option<&str>, sent: bool, treated: bool) -> Self {
        match (file_name, sent, treated) {
            (None, _, _) => AudioState::None,
            (Some(_), false, _) => AudioState::UploadPending,
            (Some(_), true, false) => AudioState::Sent,
            (Some(_), true, true) => AudioState::Treated,
        }
    }
}
