//! Four-to-one tile combination.
//!
//! A coarse tile is the mosaic of its four finer tiles, each halved first:
//!
//! ```text
//! ┌──────────┬──────────┐
//! │ 0 (TL)   │ 1 (TR)   │   TR starts at x = TL.width / 2
//! ├──────────┼──────────┤
//! │ 2 (BL)   │ 3 (BR)   │   BL starts at y = TL.height / 2
//! └──────────┴──────────┘
//! ```
//!
//! Edge tiles of a level are often smaller than the tile size and some
//! quadrants may not exist at all, so the canvas is sized from the halved
//! quadrants that are actually present.

use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use thiserror::Error;

use crate::descriptor::TileFormat;

/// Canvas fill where no quadrant is pasted.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Errors from [`combine4`].
#[derive(Debug, Error)]
pub enum CombineError {
    /// The mandatory top-left quadrant could not be opened or decoded
    #[error("Failed to read top-left quadrant {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The combined image could not be encoded
    #[error("Failed to encode combined tile {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The combined image could not be written
    #[error("Failed to write combined tile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful [`combine4`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOutcome {
    /// A new tile was written
    Written {
        width: u32,
        height: u32,
        /// Number of quadrants that contributed, 1 to 4
        quadrants: usize,
    },
    /// The destination already existed and was left untouched
    AlreadyExists,
}

/// Halve both dimensions (floor division) with a Lanczos3 filter.
///
/// A dimension of 1 stays 1, there is no zero-sized image.
pub fn half(image: &DynamicImage) -> DynamicImage {
    let width = (image.width() / 2).max(1);
    let height = (image.height() / 2).max(1);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

/// Paste already-halved quadrants onto a white canvas.
///
/// `others` holds top-right, bottom-left and bottom-right in that order.
pub fn mosaic(top_left: &DynamicImage, others: [Option<&DynamicImage>; 3]) -> RgbImage {
    let [top_right, bottom_left, bottom_right] = others;
    let (origin_x, origin_y) = (top_left.width(), top_left.height());

    let right_width = [top_right, bottom_right]
        .iter()
        .flatten()
        .map(|image| image.width())
        .max()
        .unwrap_or(0);
    let bottom_height = [bottom_left, bottom_right]
        .iter()
        .flatten()
        .map(|image| image.height())
        .max()
        .unwrap_or(0);

    let mut canvas =
        RgbImage::from_pixel(origin_x + right_width, origin_y + bottom_height, BACKGROUND);

    let placements = [
        (Some(top_left), 0, 0),
        (top_right, origin_x, 0),
        (bottom_left, 0, origin_y),
        (bottom_right, origin_x, origin_y),
    ];
    for (image, x, y) in placements {
        if let Some(image) = image {
            imageops::replace(&mut canvas, &image.to_rgb8(), x.into(), y.into());
        }
    }

    canvas
}

/// Combine up to four tiles into `dest`.
///
/// `sources` is in quadrant order `[top-left, top-right, bottom-left,
/// bottom-right]`. The top-left entry is mandatory. Any other entry that is
/// `None` or cannot be decoded is treated as absent.
///
/// The tile is encoded in memory, written next to `dest` and hard-linked into
/// place, so `dest` either does not exist or holds a complete image. If
/// `dest` already exists nothing is written.
pub fn combine4(
    sources: [Option<&Path>; 4],
    dest: &Path,
    format: TileFormat,
) -> Result<CombineOutcome, CombineError> {
    if dest.symlink_metadata().is_ok() {
        return Ok(CombineOutcome::AlreadyExists);
    }

    let [top_left_path, rest @ ..] = sources;
    let top_left_path = top_left_path.ok_or_else(|| CombineError::Source {
        path: PathBuf::new(),
        source: image::ImageError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            "top-left quadrant is mandatory",
        )),
    })?;
    let top_left = open_half(top_left_path).map_err(|source| CombineError::Source {
        path: top_left_path.to_path_buf(),
        source,
    })?;

    let others = rest.map(|path| path.and_then(|p| open_half(p).ok()));
    let quadrants = 1 + others.iter().flatten().count();
    let [a, b, c] = &others;
    let canvas = mosaic(&top_left, [a.as_ref(), b.as_ref(), c.as_ref()]);

    let mut encoded = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut encoded), format.image_format())
        .map_err(|source| CombineError::Encode {
            path: dest.to_path_buf(),
            source,
        })?;

    if !write_new(dest, &encoded)? {
        return Ok(CombineOutcome::AlreadyExists);
    }

    Ok(CombineOutcome::Written {
        width: canvas.width(),
        height: canvas.height(),
        quadrants,
    })
}

fn open_half(path: &Path) -> Result<DynamicImage, image::ImageError> {
    Ok(half(&image::open(path)?))
}

/// Write `bytes` to `dest` unless it already exists. Returns whether the
/// file was created.
fn write_new(dest: &Path, bytes: &[u8]) -> Result<bool, CombineError> {
    let io_err = |source| CombineError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let file_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = dest.with_file_name(format!(".{}.{}.partial", file_name, std::process::id()));

    let mut file = File::create(&staging).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    let linked = fs::hard_link(&staging, dest);
    let _ = fs::remove_file(&staging);
    match linked {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(io_err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use tempfile::TempDir;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn write_solid(dir: &Path, name: &str, width: u32, height: u32, color: Rgb<u8>) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, color)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn assert_close(actual: &Rgb<u8>, expected: Rgb<u8>) {
        for channel in 0..3 {
            let diff = (actual[channel] as i16 - expected[channel] as i16).abs();
            assert!(diff <= 2, "expected {:?}, got {:?}", expected, actual);
        }
    }

    #[test]
    fn test_half_floors_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(9, 7));
        let halved = half(&image);
        assert_eq!((halved.width(), halved.height()), (4, 3));
    }

    #[test]
    fn test_half_never_reaches_zero() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(1, 5));
        let halved = half(&image);
        assert_eq!((halved.width(), halved.height()), (1, 2));
    }

    #[test]
    fn test_mosaic_places_quadrants() {
        let tl = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, RED));
        let tr = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 2, GREEN));
        let bl = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, BLUE));
        let br = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, BLACK));

        let canvas = mosaic(&tl, [Some(&tr), Some(&bl), Some(&br)]);

        assert_eq!(canvas.dimensions(), (3, 3));
        assert_eq!(*canvas.get_pixel(1, 1), RED);
        assert_eq!(*canvas.get_pixel(2, 0), GREEN);
        assert_eq!(*canvas.get_pixel(0, 2), BLUE);
        assert_eq!(*canvas.get_pixel(2, 2), BLACK);
    }

    #[test]
    fn test_mosaic_fills_gaps_with_white() {
        let tl = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, RED));
        let tr = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, GREEN));
        let bl = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, BLUE));

        let canvas = mosaic(&tl, [Some(&tr), Some(&bl), None]);

        assert_eq!(canvas.dimensions(), (4, 4));
        assert_eq!(*canvas.get_pixel(3, 3), BACKGROUND);
    }

    #[test]
    fn test_combine_four_solid_tiles() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 8, 8, RED);
        let tr = write_solid(dir, "tr.png", 8, 8, GREEN);
        let bl = write_solid(dir, "bl.png", 8, 8, BLUE);
        let br = write_solid(dir, "br.png", 8, 8, BLACK);
        let dest = dir.join("out.png");

        let outcome = combine4(
            [Some(tl.as_path()), Some(tr.as_path()), Some(bl.as_path()), Some(br.as_path())],
            &dest,
            TileFormat::Png,
        )
        .unwrap();

        assert_eq!(
            outcome,
            CombineOutcome::Written {
                width: 8,
                height: 8,
                quadrants: 4
            }
        );
        let out = image::open(&dest).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (8, 8));
        assert_close(out.get_pixel(1, 1), RED);
        assert_close(out.get_pixel(6, 1), GREEN);
        assert_close(out.get_pixel(1, 6), BLUE);
        assert_close(out.get_pixel(6, 6), BLACK);
    }

    #[test]
    fn test_combine_uneven_edge_tiles() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 8, 8, RED);
        let tr = write_solid(dir, "tr.png", 6, 8, GREEN);
        let bl = write_solid(dir, "bl.png", 8, 2, BLUE);
        let br = write_solid(dir, "br.png", 6, 2, BLACK);
        let dest = dir.join("out.png");

        combine4(
            [Some(tl.as_path()), Some(tr.as_path()), Some(bl.as_path()), Some(br.as_path())],
            &dest,
            TileFormat::Png,
        )
        .unwrap();

        let out = image::open(&dest).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (4 + 3, 4 + 1));
        assert_close(out.get_pixel(5, 4), BLACK);
    }

    #[test]
    fn test_combine_single_quadrant_is_halved_top_left() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 10, 6, RED);
        let dest = dir.join("out.png");

        let outcome = combine4([Some(tl.as_path()), None, None, None], &dest, TileFormat::Png)
            .unwrap();

        assert_eq!(
            outcome,
            CombineOutcome::Written {
                width: 5,
                height: 3,
                quadrants: 1
            }
        );
        let out = image::open(&dest).unwrap();
        assert_eq!((out.width(), out.height()), (5, 3));
    }

    #[test]
    fn test_unreadable_optional_quadrant_is_absent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 8, 8, RED);
        let missing = dir.join("missing.png");
        let garbage = dir.join("garbage.png");
        fs::write(&garbage, b"not an image").unwrap();
        let dest = dir.join("out.png");

        let outcome = combine4(
            [
                Some(tl.as_path()),
                Some(missing.as_path()),
                Some(garbage.as_path()),
                None,
            ],
            &dest,
            TileFormat::Png,
        )
        .unwrap();

        assert_eq!(
            outcome,
            CombineOutcome::Written {
                width: 4,
                height: 4,
                quadrants: 1
            }
        );
    }

    #[test]
    fn test_missing_top_left_is_fatal() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let missing = dir.join("missing.png");
        let tr = write_solid(dir, "tr.png", 8, 8, GREEN);

        let err = combine4(
            [Some(missing.as_path()), Some(tr.as_path()), None, None],
            &dir.join("out.png"),
            TileFormat::Png,
        )
        .unwrap_err();

        assert!(matches!(err, CombineError::Source { .. }));
        assert!(err.to_string().contains("missing.png"));
        assert!(!dir.join("out.png").exists());
    }

    #[test]
    fn test_existing_destination_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 8, 8, RED);
        let dest = dir.join("out.png");
        fs::write(&dest, b"keep me").unwrap();

        let outcome = combine4([Some(tl.as_path()), None, None, None], &dest, TileFormat::Png)
            .unwrap();

        assert_eq!(outcome, CombineOutcome::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"keep me");
    }

    #[test]
    fn test_jpeg_output() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let tl = write_solid(dir, "tl.png", 16, 16, BLUE);
        let dest = dir.join("out.jpg");

        combine4([Some(tl.as_path()), None, None, None], &dest, TileFormat::Jpeg).unwrap();

        let bytes = fs::read(&dest).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let leftovers: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
