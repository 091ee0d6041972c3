use std::{
    fs::File,
    io::{BufRead, BufReader, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Follows a log file from the beginning, surviving truncation and rotation
/// by reopening. Polling follow, no inotify.
pub struct LineSource {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
    #[cfg(unix)]
    inode: u64,
}

impl LineSource {
    /// The file must exist up front; a missing path is fatal, not awaited.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        #[cfg(unix)]
        let inode = {
            use std::os::unix::fs::MetadataExt;
            file.metadata()?.ino()
        };
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            offset: 0,
            #[cfg(unix)]
            inode,
        })
    }

    /// Next complete line, or None when caught up with the file's end.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let n = self
            .reader
            .read_line(&mut buf)
            .with_context(|| format!("read {}", self.path.display()))?;
        if n == 0 {
            self.check_reopen()?;
            return Ok(None);
        }
        if !buf.ends_with('\n') {
            // Partial line still being appended; rewind and wait for the rest.
            self.reader.seek(SeekFrom::Start(self.offset))?;
            return Ok(None);
        }
        self.offset += n as u64;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    /// Reopen from the start after truncation or rotation.
    fn check_reopen(&mut self) -> Result<()> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(m) => m,
            // The file can vanish mid-rotation; keep polling.
            Err(_) => return Ok(()),
        };

        let truncated = metadata.len() < self.offset;
        #[cfg(unix)]
        let rotated = {
            use std::os::unix::fs::MetadataExt;
            metadata.ino() != self.inode
        };
        #[cfg(not(unix))]
        let rotated = false;

        if truncated || rotated {
            let file = File::open(&self.path)
                .with_context(|| format!("reopen {}", self.path.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::MetadataExt;
                self.inode = file.metadata()?.ino();
            }
            self.reader = BufReader::new(file);
            self.offset = 0;
        }
        Ok(())
    }
}
