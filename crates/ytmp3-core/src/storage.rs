//! Output layout and raw stream storage

use crate::client::ByteStream;
use crate::video_id::VideoId;
use chrono::NaiveDate;
use futures::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Where one run writes its files:
/// `<home>/<root>/<YYYY-MM-DD>/{<id>-temp.mp4,<id>.mp3}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub temp_file: PathBuf,
    pub final_file: PathBuf,
}

impl OutputPaths {
    pub fn new(home: &Path, root: &Path, date: NaiveDate, id: &VideoId) -> Self {
        let dir = home.join(root).join(date.format("%Y-%m-%d").to_string());
        Self {
            temp_file: dir.join(format!("{}-temp.mp4", id)),
            final_file: dir.join(format!("{}.mp3", id)),
            dir,
        }
    }
}

/// Create `dir` and any missing parents (`rwxr-xr-x` on Unix).
/// An existing directory is not an error.
pub async fn create_output_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(dir).await
}

/// Create (or truncate) the file at `path`.
pub async fn create_file(path: &Path) -> io::Result<File> {
    File::create(path).await
}

/// Copy every chunk of `stream` into `file`, returning the number of bytes
/// written. A failure part-way leaves the bytes written so far in place.
pub async fn write_stream(file: &mut File, mut stream: ByteStream) -> io::Result<u64> {
    let mut written = 0u64;

    let copied: io::Result<()> = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        Ok(())
    }
    .await;

    // Flush after a failed copy too: the partial file stays on disk.
    let flushed = file.flush().await;
    copied?;
    flushed?;

    debug!("Wrote {} bytes", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;

    fn id(s: &str) -> VideoId {
        VideoId::from_url(&format!("watch?v={}", s)).unwrap()
    }

    fn chunks(parts: Vec<io::Result<&'static str>>) -> ByteStream {
        stream::iter(parts.into_iter().map(|p| p.map(|s| Bytes::from_static(s.as_bytes())))).boxed()
    }

    #[test]
    fn test_output_paths_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let paths = OutputPaths::new(
            Path::new("/home/ana"),
            Path::new("Desktop/YTVideos"),
            date,
            &id("INbQpAoaWSw"),
        );

        assert_eq!(paths.dir, PathBuf::from("/home/ana/Desktop/YTVideos/2024-03-07"));
        assert_eq!(
            paths.temp_file,
            PathBuf::from("/home/ana/Desktop/YTVideos/2024-03-07/INbQpAoaWSw-temp.mp4")
        );
        assert_eq!(
            paths.final_file,
            PathBuf::from("/home/ana/Desktop/YTVideos/2024-03-07/INbQpAoaWSw.mp3")
        );
    }

    #[tokio::test]
    async fn test_create_output_dir_is_repeatable() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join("Desktop/YTVideos/2024-03-07");

        create_output_dir(&dir).await.unwrap();
        create_output_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_create_output_dir_fails_under_a_file() {
        let home = tempfile::tempdir().unwrap();
        let blocker = home.path().join("Desktop");
        std::fs::write(&blocker, b"not a dir").unwrap();

        assert!(create_output_dir(&blocker.join("YTVideos")).await.is_err());
    }

    #[tokio::test]
    async fn test_write_stream_copies_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc-temp.mp4");
        std::fs::write(&path, b"stale contents from an earlier run").unwrap();

        let mut file = create_file(&path).await.unwrap();
        let written = write_stream(&mut file, chunks(vec![Ok("ftyp"), Ok("moov"), Ok("mdat")]))
            .await
            .unwrap();
        drop(file);

        assert_eq!(written, 12);
        assert_eq!(std::fs::read(&path).unwrap(), b"ftypmoovmdat");
    }

    #[tokio::test]
    async fn test_write_stream_keeps_partial_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc-temp.mp4");

        let mut file = create_file(&path).await.unwrap();
        let result = write_stream(
            &mut file,
            chunks(vec![
                Ok("ftyp"),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                Ok("never"),
            ]),
        )
        .await;
        drop(file);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(std::fs::read(&path).unwrap(), b"ftyp");
    }
}
