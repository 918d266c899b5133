use crate::*;
use mpsc::{Receiver, TryRecvError};

/// An opened [`Source`].
pub enum FrameSource {
    Still(Mat),
    Stream(videoio::VideoCapture),
}

impl FrameSource {
    pub fn open(source: &Source) -> Result<Self> {
        let opened = match source {
            Source::Image(path) => {
                let frame = imgcodecs::imread_def(&path.to_string_lossy())
                    .map_err(|e| Error::SourceOpen(format!("{}: {}", source, e)))?;
                if frame.empty() {
                    return Err(Error::SourceOpen(format!("could not read {}", source)));
                }
                return Ok(Self::Still(frame));
            }
            Source::Video(path) => {
                videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
            }
            Source::Camera(index) => videoio::VideoCapture::new(*index, videoio::CAP_ANY),
        };

        let capture = opened.map_err(|e| Error::SourceOpen(format!("{}: {}", source, e)))?;
        if !capture.is_opened()? {
            return Err(Error::SourceOpen(format!("could not open {}", source)));
        }
        Ok(Self::Stream(capture))
    }

    pub fn is_still(&self) -> bool {
        matches!(self, Self::Still(_))
    }

    /// `None` once a stream runs out. A still source never runs out.
    pub fn next_frame(&mut self) -> Result<Option<Mat>> {
        match self {
            Self::Still(frame) => Ok(Some(frame.try_clone()?)),
            Self::Stream(capture) => {
                let mut frame = Mat::default();
                if !capture.read(&mut frame)? || frame.empty() {
                    return Ok(None);
                }
                Ok(Some(frame))
            }
        }
    }
}

pub enum Captured {
    Frame(Mat),
    Pending,
    Ended,
}

/// Reads a [`Source`] on its own thread and hands frames to the UI thread.
pub struct CaptureWorker {
    frames: Receiver<Mat>,
}

impl CaptureWorker {
    /// Blocks until the worker has tried to open `source`.
    pub fn spawn(source: Source) -> Result<Self> {
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);
        let (frame_tx, frame_rx) = mpsc::sync_channel::<Mat>(1);

        thread::spawn(move || {
            let mut frames = match FrameSource::open(&source) {
                Ok(frames) => {
                    let _ = ready_tx.send(Ok(()));
                    frames
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            log::debug!("Capture thread reading {}", source);

            loop {
                match frames.next_frame() {
                    Ok(Some(frame)) => {
                        if frame_tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        log::info!("End of stream");
                        break;
                    }
                    Err(e) => {
                        log::error!("Capture failed: {}", e);
                        break;
                    }
                }
                if frames.is_still() {
                    break;
                }
            }
        });

        ready_rx
            .recv()
            .map_err(|_| Error::SourceOpen("capture thread exited early".to_string()))??;
        Ok(Self { frames: frame_rx })
    }

    /// Newest frame since the last poll, never blocking.
    pub fn poll(&self) -> Captured {
        let mut latest = None;
        loop {
            match self.frames.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(frame) => Captured::Frame(frame),
                        None => Captured::Ended,
                    }
                }
            }
        }
        match latest {
            Some(frame) => Captured::Frame(frame),
            None => Captured::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn still_image(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("colorthresh-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("still.png");
        let pixels: Vec<Vec3b> = (0..24u8)
            .map(|i| Vec3b::from([i * 10, 255 - i * 10, i]))
            .collect();
        let frame = Mat::from_slice(&pixels)
            .unwrap()
            .reshape(3, 4)
            .unwrap()
            .try_clone()
            .unwrap();
        assert!(imgcodecs::imwrite_def(&path.to_string_lossy(), &frame).unwrap());
        path
    }

    fn poll_until(worker: &CaptureWorker, want: fn(&Captured) -> bool) -> Captured {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let captured = worker.poll();
            if want(&captured) {
                return captured;
            }
            assert!(Instant::now() < deadline, "capture worker stalled");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_image_is_a_source_error() {
        let source = Source::Image(PathBuf::from("does/not/exist.png"));
        assert!(matches!(FrameSource::open(&source), Err(Error::SourceOpen(_))));
    }

    #[test]
    fn missing_video_is_a_source_error() {
        let source = Source::Video(PathBuf::from("does/not/exist.avi"));
        assert!(matches!(FrameSource::open(&source), Err(Error::SourceOpen(_))));
    }

    #[test]
    fn worker_reports_open_failure() {
        let source = Source::Image(PathBuf::from("does/not/exist.png"));
        assert!(matches!(CaptureWorker::spawn(source), Err(Error::SourceOpen(_))));
    }

    #[test]
    fn still_image_repeats_the_same_frame() {
        let path = still_image("still");
        let mut frames = FrameSource::open(&Source::Image(path.clone())).unwrap();
        assert!(frames.is_still());

        let first = frames.next_frame().unwrap().unwrap();
        let second = frames.next_frame().unwrap().unwrap();
        assert_eq!((first.rows(), first.cols(), first.channels()), (4, 6, 3));
        assert_eq!(first.data_bytes().unwrap(), second.data_bytes().unwrap());
        assert_eq!(*first.at_2d::<Vec3b>(0, 1).unwrap(), Vec3b::from([10, 245, 1]));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn worker_sends_still_frame_then_ends() {
        let path = still_image("worker");
        let worker = CaptureWorker::spawn(Source::Image(path.clone())).unwrap();

        match poll_until(&worker, |c| !matches!(c, Captured::Pending)) {
            Captured::Frame(frame) => assert_eq!((frame.rows(), frame.cols()), (4, 6)),
            Captured::Ended => panic!("ended before the frame arrived"),
            Captured::Pending => unreachable!(),
        }
        poll_until(&worker, |c| matches!(c, Captured::Ended));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
