//! Background directory scan and thumbnail generation.
//!
//! A worker thread lists the source directory, reports the ordered file list
//! in one message, then streams one thumbnail per file. The UI drains the
//! channel a few events per frame so the playlist fills in incrementally.
//! Starting a new scan simply drops the old `Scanner`: its worker notices
//! the cancel flag (or the closed channel) and exits.

use crate::playlist::scan_directory;
use crate::thumbnail::{Thumbnail, THUMBNAIL_EDGE};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress reported by the scan worker, in this order:
/// one `Listed`, any number of `Thumbnail`/`Failed`, then `Finished`.
#[derive(Debug)]
pub enum ScanEvent {
    Listed(Vec<PathBuf>),
    Thumbnail {
        index: usize,
        name: String,
        thumb: Thumbnail,
    },
    Failed {
        index: usize,
        name: String,
        error: String,
    },
    Finished,
}

pub struct Scanner {
    generation: u64,
    rx: Receiver<ScanEvent>,
    cancel: Arc<AtomicBool>,
    finished: bool,
}

impl Scanner {
    /// Spawn the worker for `dir`. Files whose names are in `known` already
    /// have thumbnails and are listed but not decoded again.
    pub fn start(dir: PathBuf, known: HashSet<String>, generation: u64) -> std::io::Result<Self> {
        let (tx, rx) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        log::info!("scan #{} of {} started", generation, dir.display());
        std::thread::Builder::new()
            .name("slowshow-scan".into())
            .spawn(move || run_scan(&dir, &known, &tx, &worker_cancel))?;

        Ok(Self {
            generation,
            rx,
            cancel,
            finished: false,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take up to `max` pending events without blocking.
    pub fn poll(&mut self, max: usize) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        while events.len() < max && !self.finished {
            match self.rx.try_recv() {
                Ok(event) => {
                    if matches!(event, ScanEvent::Finished) {
                        self.finished = true;
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("scan #{} worker exited early", self.generation);
                    self.finished = true;
                }
            }
        }
        events
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_scan(dir: &Path, known: &HashSet<String>, tx: &Sender<ScanEvent>, cancel: &AtomicBool) {
    let files = scan_directory(dir);
    if tx.send(ScanEvent::Listed(files.clone())).is_err() {
        return;
    }

    for (index, path) in files.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::info!("scan of {} cancelled", dir.display());
            return;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if known.contains(&name) {
            continue;
        }

        let event = match Thumbnail::generate(path, THUMBNAIL_EDGE) {
            Ok(thumb) => ScanEvent::Thumbnail { index, name, thumb },
            Err(e) => {
                log::warn!("no thumbnail for {}: {}", path.display(), e);
                ScanEvent::Failed {
                    index,
                    name,
                    error: e.to_string(),
                }
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }

    let _ = tx.send(ScanEvent::Finished);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::time::{Duration, Instant};

    fn drain(scanner: &mut Scanner) -> Vec<ScanEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while !scanner.is_finished() && Instant::now() < deadline {
            events.extend(scanner.poll(8));
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::new(200, 100).save(dir.path().join("show_2.png")).unwrap();
        RgbaImage::new(50, 50).save(dir.path().join("show_1.png")).unwrap();
        std::fs::write(dir.path().join("show_3.jpg"), b"not a jpeg").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"skip me").unwrap();
        dir
    }

    #[test]
    fn events_arrive_in_order() {
        let dir = fixture();
        let mut scanner = Scanner::start(dir.path().to_path_buf(), HashSet::new(), 1).unwrap();
        let events = drain(&mut scanner);

        match events.first() {
            Some(ScanEvent::Listed(files)) => {
                let names: Vec<String> = files
                    .iter()
                    .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                    .collect();
                assert_eq!(names, vec!["show_1.png", "show_2.png", "show_3.jpg"]);
            }
            other => panic!("expected Listed first, got {:?}", other),
        }
        assert!(matches!(events.last(), Some(ScanEvent::Finished)));

        let thumbs: Vec<(usize, &str)> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Thumbnail { index, name, .. } => Some((*index, name.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(thumbs, vec![(0, "show_1.png"), (1, "show_2.png")]);

        let failed = events
            .iter()
            .filter(|e| matches!(e, ScanEvent::Failed { index: 2, .. }))
            .count();
        assert_eq!(failed, 1);
    }

    #[test]
    fn known_names_are_not_decoded_again() {
        let dir = fixture();
        let known: HashSet<String> = ["show_1.png".to_string(), "show_3.jpg".to_string()].into();
        let mut scanner = Scanner::start(dir.path().to_path_buf(), known, 2).unwrap();
        let events = drain(&mut scanner);

        let decoded: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Thumbnail { name, .. } | ScanEvent::Failed { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(decoded, vec!["show_2.png"]);
    }

    #[test]
    fn poll_respects_the_cap() {
        let dir = fixture();
        let mut scanner = Scanner::start(dir.path().to_path_buf(), HashSet::new(), 3).unwrap();
        std::thread::sleep(Duration::from_millis(200));
        assert!(scanner.poll(1).len() <= 1);
        assert_eq!(scanner.generation(), 3);
    }

    #[test]
    fn empty_directory_lists_nothing_and_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let mut scanner = Scanner::start(dir.path().to_path_buf(), HashSet::new(), 4).unwrap();
        let events = drain(&mut scanner);
        assert!(matches!(events.as_slice(), [ScanEvent::Listed(files), ScanEvent::Finished] if files.is_empty()));
    }

    #[test]
    fn cancel_stops_before_the_next_file() {
        let dir = tempfile::tempdir().unwrap();
        let count = 30;
        for i in 0..count {
            RgbaImage::new(600, 600)
                .save(dir.path().join(format!("slide_{}.png", i)))
                .unwrap();
        }
        let mut scanner = Scanner::start(dir.path().to_path_buf(), HashSet::new(), 5).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let first = scanner.poll(1);
            if matches!(first.first(), Some(ScanEvent::Listed(files)) if files.len() == count) {
                break;
            }
            assert!(first.is_empty() && Instant::now() < deadline, "expected Listed first");
            std::thread::sleep(Duration::from_millis(1));
        }
        scanner.cancel();

        let rest = drain(&mut scanner);
        assert!(scanner.is_finished());
        assert!(!rest.iter().any(|e| matches!(e, ScanEvent::Finished)));
        let per_file = rest
            .iter()
            .filter(|e| matches!(e, ScanEvent::Thumbnail { .. } | ScanEvent::Failed { .. }))
            .count();
        assert!(per_file < count, "{} of {} files decoded after cancel", per_file, count);
    }

    #[test]
    fn dropping_a_scanner_cancels_its_worker() {
        let dir = fixture();
        let scanner = Scanner::start(dir.path().to_path_buf(), HashSet::new(), 6).unwrap();
        let flag = Arc::clone(&scanner.cancel);
        assert!(!flag.load(Ordering::Relaxed));
        drop(scanner);
        assert!(flag.load(Ordering::Relaxed));
    }
}
