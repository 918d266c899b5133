use path::{Path, PathBuf};
use simple_logger::SimpleLogger;

use crate::*;

const OUTPUT_FOLDER: &str = "output";

/// Debug logging unless `quiet`, then Info.
pub fn init_logging(quiet: bool) -> Result<()> {
    let log_level = if quiet {
        log::Level::Info.to_level_filter()
    } else {
        log::Level::Debug.to_level_filter()
    };
    SimpleLogger::new()
        .with_level(log_level)
        .with_utc_timestamps()
        .init()?;
    Ok(())
}

pub fn get_save_filepath(name: &str) -> Result<PathBuf> {
    next_numbered_path(Path::new(OUTPUT_FOLDER), name)
}

/// `<folder>/<n>-<name>` with `n` one past the highest numbered entry.
pub fn next_numbered_path(folder: &Path, name: &str) -> Result<PathBuf> {
    if !folder.exists() {
        fs::create_dir_all(folder)?;
    }

    let mut i = 0;
    for item in folder.read_dir()? {
        let file_name = item?.file_name();
        if let Some((num_str, _)) = file_name.to_string_lossy().split_once('-') {
            if let Ok(num) = num_str.parse() {
                if num > i {
                    i = num;
                }
            }
        }
    }

    Ok(folder.join(format!("{}-{}", i + 1, name)))
}

/// Scales `frame` to `width` keeping the aspect ratio; `width <= 0` copies.
pub fn resize_to_width(frame: &Mat, width: i32) -> Result<Mat> {
    if width <= 0 || frame.cols() == 0 {
        return Ok(frame.try_clone()?);
    }
    let height = (width as f64 / frame.cols() as f64 * frame.rows() as f64) as i32;
    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(width, height.max(1)),
        0.,
        0.,
        imgproc::INTER_AREA,
    )?;
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("colorthresh-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn numbering_continues_past_existing_files() {
        let dir = scratch_dir("numbering");
        let first = next_numbered_path(&dir, "out.png").unwrap();
        assert_eq!(first, dir.join("1-out.png"));

        fs::write(dir.join("4-old.png"), b"").unwrap();
        fs::write(dir.join("notes.txt"), b"").unwrap();
        let next = next_numbered_path(&dir, "out.png").unwrap();
        assert_eq!(next, dir.join("5-out.png"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resize_keeps_aspect() {
        let frame = Mat::new_rows_cols_with_default(50, 100, CV_8UC3, Scalar::all(0.)).unwrap();
        let resized = resize_to_width(&frame, 40).unwrap();
        assert_eq!((resized.cols(), resized.rows()), (40, 20));
        let same = resize_to_width(&frame, 0).unwrap();
        assert_eq!((same.cols(), same.rows()), (100, 50));
    }
}
