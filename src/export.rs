//! JPEG export of flattened snips

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::error::Result;

/// File name offered in the save dialog
pub fn suggested_file_name(captured_at: DateTime<Local>) -> String {
    captured_at
        .format("Snip_%Y-%m-%d_%H-%M-%S.jpg")
        .to_string()
}

/// Pictures folder (or home) joined with the suggested name
pub fn suggested_path(captured_at: DateTime<Local>) -> PathBuf {
    let dir = dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default();
    dir.join(suggested_file_name(captured_at))
}

/// Append `.jpg` unless the path already ends in .jpg/.jpeg
pub fn ensure_jpeg_extension(path: PathBuf) -> PathBuf {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".jpg");
        PathBuf::from(name)
    }
}

pub fn write_jpeg<W: io::Write>(w: W, image: &RgbImage, quality: u8) -> Result<()> {
    let mut encoder = JpegEncoder::new_with_quality(w, quality.clamp(1, 100));
    encoder.encode_image(image)?;
    Ok(())
}

/// Encode `image` as JPEG at `path`
pub fn save_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_jpeg(&mut writer, image, quality)?;
    io::Write::flush(&mut writer)?;
    log::info!(
        "Saved {}x{} snip to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/// Native save dialog filtered to JPEG. `None` when dismissed.
pub fn choose_save_path(suggested: &Path) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save snip")
        .add_filter("JPEG files", &["jpg", "jpeg"]);
    if let Some(dir) = suggested.parent().filter(|d| d.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    if let Some(name) = suggested.file_name().and_then(|n| n.to_str()) {
        dialog = dialog.set_file_name(name);
    }
    dialog.save_file().map(ensure_jpeg_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgb;

    #[test]
    fn test_suggested_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(suggested_file_name(at), "Snip_2024-03-09_14-05-07.jpg");
    }

    #[test]
    fn test_ensure_jpeg_extension() {
        assert_eq!(
            ensure_jpeg_extension(PathBuf::from("/tmp/a.JPG")),
            PathBuf::from("/tmp/a.JPG")
        );
        assert_eq!(
            ensure_jpeg_extension(PathBuf::from("/tmp/a.jpeg")),
            PathBuf::from("/tmp/a.jpeg")
        );
        assert_eq!(
            ensure_jpeg_extension(PathBuf::from("/tmp/a")),
            PathBuf::from("/tmp/a.jpg")
        );
        assert_eq!(
            ensure_jpeg_extension(PathBuf::from("/tmp/a.png")),
            PathBuf::from("/tmp/a.png.jpg")
        );
    }

    #[test]
    fn test_save_jpeg_decodes_with_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snip.jpg");
        let img = RgbImage::from_pixel(37, 21, Rgb([200, 120, 30]));

        save_jpeg(&img, &path, 90).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (37, 21));
        let Rgb([r, g, b]) = *decoded.get_pixel(18, 10);
        assert!(r.abs_diff(200) < 8 && g.abs_diff(120) < 8 && b.abs_diff(30) < 8);
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("snip.jpg");
        assert!(save_jpeg(&RgbImage::new(4, 4), &path, 90).is_err());
    }
}
