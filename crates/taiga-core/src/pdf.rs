use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

/// Extensions recognized as page candidates.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Sort key for files whose stem is not a plain number; they land after
/// every indexed page, keeping listing order among themselves.
pub const UNNUMBERED_SORT_KEY: u64 = u64::MAX;

/// JPEG quality used when re-encoding pages for embedding.
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("No valid images found in folder.")]
    NoImages,

    #[error("None of the images could be processed.")]
    NoneProcessed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

struct Page {
    width: u32,
    height: u32,
    jpeg: Vec<u8>,
}

/// Render every recognized image in `folder` into one multi-page PDF at
/// `output`, ordered by numeric filename stem.
///
/// Returns the page count. Files that fail to decode are logged and
/// skipped; the operation fails only when no page could be produced, and
/// then writes nothing.
pub fn assemble_pdf(folder: &Path, output: &Path) -> Result<usize, PdfError> {
    let files = candidate_files(folder)?;
    if files.is_empty() {
        return Err(PdfError::NoImages);
    }

    tracing::info!(count = files.len(), "creating PDF");

    let mut pages = Vec::new();
    for path in &files {
        match encode_page(path) {
            Ok(page) => pages.push(page),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable image");
            }
        }
    }
    if pages.is_empty() {
        return Err(PdfError::NoneProcessed);
    }

    let count = pages.len();
    write_document(&pages, output)?;
    tracing::info!(path = %output.display(), count, "PDF created");
    Ok(count)
}

/// Recognized images in `folder`, ordered by numeric filename stem with
/// unnumbered files last (stable, so they keep listing order).
fn candidate_files(folder: &Path) -> Result<Vec<PathBuf>, PdfError> {
    let mut files: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(UNNUMBERED_SORT_KEY);
        files.push((key, path));
    }

    files.sort_by_key(|(key, _)| *key);
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Decode one image, normalize to RGB, and re-encode as JPEG for embedding.
fn encode_page(path: &Path) -> Result<Page, image::ImageError> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;

    Ok(Page {
        width,
        height,
        jpeg,
    })
}

/// One page per image: the JPEG goes in as a DCTDecode XObject drawn over
/// a media box matching the pixel dimensions.
fn write_document(pages: &[Page], output: &Path) -> Result<(), PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let width = i64::from(page.width);
        let height = i64::from(page.height);

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            page.jpeg.clone(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        height.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                width.into(),
                height.into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, size: u32) {
        RgbImage::from_pixel(size, size, Rgb([120, 30, 200]))
            .save(dir.join(name))
            .unwrap();
    }

    fn page_widths(path: &Path) -> Vec<i64> {
        let doc = Document::load(path).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let page = doc.get_dictionary(page_id).unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[2].as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_pages_follow_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "2.jpg", 20);
        write_image(dir.path(), "1.png", 10);
        write_image(dir.path(), "10.jpg", 30);

        let output = dir.path().join("out.pdf");
        let count = assemble_pdf(dir.path(), &output).unwrap();
        assert_eq!(count, 3);
        assert_eq!(page_widths(&output), vec![10, 20, 30]);
    }

    #[test]
    fn test_unnumbered_files_sort_last() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "cover.jpg", 40);
        write_image(dir.path(), "1.jpg", 10);

        let output = dir.path().join("out.pdf");
        assemble_pdf(dir.path(), &output).unwrap();
        assert_eq!(page_widths(&output), vec![10, 40]);
    }

    #[test]
    fn test_empty_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");

        let err = assemble_pdf(dir.path(), &output).unwrap_err();
        assert!(matches!(err, PdfError::NoImages));
        assert!(!output.exists());
    }

    #[test]
    fn test_non_image_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        let output = dir.path().join("out.pdf");

        let err = assemble_pdf(dir.path(), &output).unwrap_err();
        assert!(matches!(err, PdfError::NoImages));
        assert!(!output.exists());
    }

    #[test]
    fn test_undecodable_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "1.jpg", 10);
        fs::write(dir.path().join("2.jpg"), b"garbage bytes").unwrap();

        let output = dir.path().join("out.pdf");
        let count = assemble_pdf(dir.path(), &output).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_all_undecodable_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.jpg"), b"garbage bytes").unwrap();
        let output = dir.path().join("out.pdf");

        let err = assemble_pdf(dir.path(), &output).unwrap_err();
        assert!(matches!(err, PdfError::NoneProcessed));
        assert!(!output.exists());
    }
}
