//! CSV reward recorder.
use anyhow::Result;
use log::info;
use rtd3_core::record::{Record, Recorder};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

/// Appends per-episode returns to a CSV file.
///
/// Records are buffered in memory and written on flush, so a crash loses at
/// most the records of the current save interval. The header row is written
/// only when the file is created; later flushes append.
pub struct CsvRecorder {
    path: PathBuf,
    buffer: Vec<Record>,
}

impl CsvRecorder {
    /// Creates a recorder writing to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer: Vec::new(),
        }
    }
}

impl Recorder for CsvRecorder {
    fn store(&mut self, record: Record) {
        self.buffer.push(record);
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(&["episode", "episode_return"])?;
        }
        let n = self.buffer.len();
        for record in self.buffer.drain(..) {
            let episode = record.get_scalar("episode")?;
            let episode_return = record.get_scalar("episode_return")?;
            writer.write_record(&[
                format!("{}", episode as usize),
                format!("{}", episode_return),
            ])?;
        }
        writer.flush()?;
        info!("Wrote {} records to {}", n, self.path.to_string_lossy());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtd3_core::record::RecordValue::Scalar;
    use tempdir::TempDir;

    fn record(episode: usize, episode_return: f32) -> Record {
        Record::from_slice(&[
            ("episode", Scalar(episode as f32)),
            ("episode_return", Scalar(episode_return)),
        ])
    }

    #[test]
    fn writes_header_once_and_appends() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("rewards.csv");
        let mut recorder = CsvRecorder::new(&path);

        recorder.store(record(0, -1500.0));
        recorder.store(record(1, -1200.5));
        recorder.flush()?;
        recorder.store(record(2, -900.0));
        recorder.flush()?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "episode,episode_return");
        assert_eq!(lines[3], "2,-900");
        Ok(())
    }

    #[test]
    fn flush_without_records_is_a_no_op() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("rewards.csv");
        let mut recorder = CsvRecorder::new(&path);
        recorder.flush()?;
        assert!(!path.exists());
        Ok(())
    }
}
