//! The working queue, kept between invocations as `queue.json`.

use std::path::{Path, PathBuf};

use asana_studio_core::{PoseStep, Queue};

use crate::config::data_dir;

#[derive(Debug, Clone)]
pub struct QueueFile {
    path: PathBuf,
}

impl QueueFile {
    /// The queue file in the data directory.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::at(data_dir()?.join("queue.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is an empty queue.
    pub fn load(&self) -> Result<Queue, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Queue::new()),
            Ok(content) => {
                let queue: Queue = serde_json::from_str(&content)
                    .map_err(|e| format!("{}: {e}", self.path.display()))?;
                tracing::debug!(len = queue.len(), path = %self.path.display(), "queue loaded");
                Ok(queue)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Queue::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, queue: &Queue) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(queue)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(len = queue.len(), path = %self.path.display(), "queue saved");
        Ok(())
    }
}

/// Reads a JSON array of steps, e.g. a file written by `queue show --json`.
pub fn read_steps(path: &Path) -> Result<Vec<PoseStep>, Box<dyn std::error::Error>> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_studio_core::{HoldSeconds, Side};

    #[test]
    fn missing_file_is_empty_queue() {
        let dir = tempfile::tempdir().unwrap();
        let file = QueueFile::at(dir.path().join("queue.json"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_holds() {
        let dir = tempfile::tempdir().unwrap();
        let file = QueueFile::at(dir.path().join("queue.json"));

        let queue: Queue = vec![
            PoseStep::new(7, "Tree Pose", Side::Left, HoldSeconds::clamped(45)),
            PoseStep::new(7, "Tree Pose", Side::Right, HoldSeconds::clamped(45)),
            PoseStep::new(1, "Corpse Pose", Side::Both, HoldSeconds::default()),
        ]
        .into_iter()
        .collect();
        file.save(&queue).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, queue);
        assert_eq!(loaded.total_duration_seconds(), 120);
    }

    #[test]
    fn corrupt_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = QueueFile::at(&path).load().unwrap_err();
        assert!(err.to_string().contains("queue.json"));
    }

    #[test]
    fn read_steps_accepts_step_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.json");
        std::fs::write(
            &path,
            r#"[{"pose_id":3,"english_name":"Cat","side":"both","hold_seconds":20}]"#,
        )
        .unwrap();

        let steps = read_steps(&path).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].hold_seconds().get(), 20);
    }
}
