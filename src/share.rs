use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

const SHARE_FILE: &str = "share.txt";

pub fn share_text(game: &str, score: u32) -> String {
    format!(
        "I just took a break with {game} in StressCade and scored {score} points! \
         Taking care of my mental health one session at a time. #StressRelief #MentalHealth"
    )
}

/// Drop the share message into `dir/share.txt` for the user to copy.
/// Failures are logged and swallowed.
pub fn share(dir: &Path, game: &str, score: u32) -> Option<PathBuf> {
    let path = dir.join(SHARE_FILE);
    match fs::write(&path, share_text(game, score)) {
        Ok(()) => {
            info!(path = %path.display(), "share text written");
            Some(path)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "sharing failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_share_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = share(dir.path(), "Bubble Pop", 120).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("Bubble Pop"));
        assert!(text.contains("120 points"));
    }

    #[test]
    fn missing_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert!(share(&dir.path().join("nope"), "Breathing", 100).is_none());
    }
}
