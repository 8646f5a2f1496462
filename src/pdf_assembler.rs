//! # PDF Assembly Module
//!
//! Combines an ordered list of images into a single multi-page PDF.
//!
//! ## Page layout:
//! - One image per page, drawn full-bleed
//! - Page size in points is `pixels * 72 / resolution`, so with the default
//!   resolution of 100 a 1000px wide scan becomes a 720pt wide page
//! - Page order is exactly the order of the input slice
//!
//! ## Encoding:
//! Every image is decoded with `image` (format sniffed from its first bytes,
//! not from the file name), flattened to 8-bit RGB and stored as
//! a `FlateDecode` image XObject. The document is written to a `.part` file
//! next to the destination and renamed once complete: a failed write leaves
//! nothing at the destination path.
//!
//! ## Example:
//! ```ignore
//! let assembler = PdfAssembler::new(100.0);
//! let pdf = assembler.assemble(&images, Path::new("out/book.pdf"))?;
//! println!("{} pages", pdf.pages);
//! ```

use crate::error::{ConvertError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::io::Reader;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const POINTS_PER_INCH: f32 = 72.0;

/// Result of a successful assembly
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPdf {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: u64,
}

/// Decoded page image ready for embedding
struct PageImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PageImage {
    fn load(path: &Path) -> Result<Self> {
        let decoded = Self::decode(path).map_err(|e| {
            ConvertError::Assembly(format!("Cannot decode image {}: {}", path.display(), e))
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb.as_raw())?;
        let data = encoder.finish()?;

        debug!("Decoded {} ({}x{})", path.display(), width, height);
        Ok(Self { width, height, data })
    }

    /// Format comes from the file contents; the name may only contain the extension
    fn decode(path: &Path) -> image::ImageResult<DynamicImage> {
        Reader::open(path)?.with_guessed_format()?.decode()
    }
}

/// Writes image sequences as PDF documents
#[derive(Debug, Clone)]
pub struct PdfAssembler {
    resolution: f32,
}

impl PdfAssembler {
    pub fn new(resolution: f32) -> Self {
        Self { resolution }
    }

    /// Build a PDF at `destination` with one page per image, in order
    pub fn assemble(&self, images: &[PathBuf], destination: &Path) -> Result<AssembledPdf> {
        if images.is_empty() {
            return Err(ConvertError::Assembly(format!(
                "No images to assemble into {}",
                destination.display()
            )));
        }

        info!("Creating {} file from images.", destination.display());

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(images.len());
        for image_path in images {
            let page = PageImage::load(image_path)?;
            let page_id = self.add_page(&mut doc, pages_id, page)?;
            kids.push(page_id.into());
        }

        let page_count = kids.len();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let bytes = Self::write_atomically(&mut doc, destination)?;

        Ok(AssembledPdf {
            path: destination.to_path_buf(),
            pages: page_count,
            bytes,
        })
    }

    /// Page dimensions in points for an image of the given pixel size
    pub fn page_size(&self, width: u32, height: u32) -> (f32, f32) {
        let scale = POINTS_PER_INCH / self.resolution;
        (width as f32 * scale, height as f32 * scale)
    }

    fn add_page(&self, doc: &mut Document, pages_id: ObjectId, page: PageImage) -> Result<ObjectId> {
        let (page_width, page_height) = self.page_size(page.width, page.height);

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => page.width as i64,
                "Height" => page.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            page.data,
        );
        let image_id = doc.add_object(image_stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_width.into(),
                        0.into(),
                        0.into(),
                        page_height.into(),
                        0.into(),
                        0.into(),
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
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });

        Ok(page_id)
    }

    fn write_atomically(doc: &mut Document, destination: &Path) -> Result<u64> {
        let mut partial_name = destination.as_os_str().to_os_string();
        partial_name.push(".part");
        let partial = PathBuf::from(partial_name);

        if let Err(e) = Self::write_and_rename(doc, &partial, destination) {
            let _ = fs::remove_file(&partial);
            return Err(ConvertError::Assembly(format!(
                "Cannot write {}: {}",
                destination.display(),
                e
            )));
        }

        Ok(fs::metadata(destination)?.len())
    }

    fn write_and_rename(doc: &mut Document, partial: &Path, destination: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(partial)?);
        doc.save_to(&mut writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(partial, destination)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 10, 10])).save(path).unwrap();
    }

    fn write_encoded(path: &Path, width: u32, format: ImageOutputFormat) {
        let mut bytes = Cursor::new(Vec::new());
        RgbImage::from_pixel(width, 10, Rgb([10, 200, 10]))
            .write_to(&mut bytes, format)
            .unwrap();
        fs::write(path, bytes.into_inner()).unwrap();
    }

    fn media_box_width(doc: &Document, page_id: ObjectId) -> f64 {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        match &media_box[2] {
            Object::Real(v) => *v as f64,
            Object::Integer(v) => *v as f64,
            other => panic!("unexpected MediaBox value: {other:?}"),
        }
    }

    #[test]
    fn test_page_size_uses_resolution() {
        let assembler = PdfAssembler::new(100.0);
        let (w, h) = assembler.page_size(1000, 500);
        assert!((w - 720.0).abs() < 0.001);
        assert!((h - 360.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_image_list_is_assembly_error() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("empty.pdf");

        let err = PdfAssembler::new(100.0).assemble(&[], &destination).unwrap_err();

        assert!(matches!(err, ConvertError::Assembly(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_assemble_keeps_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.png");
        let second = temp_dir.path().join("second.jpg");
        let third = temp_dir.path().join("third.png");
        write_image(&first, 100, 10);
        write_image(&second, 200, 10);
        write_image(&third, 300, 10);
        let destination = temp_dir.path().join("out.pdf");

        let pdf = PdfAssembler::new(100.0)
            .assemble(&[first, second, third], &destination)
            .unwrap();

        assert_eq!(pdf.pages, 3);
        assert_eq!(pdf.bytes, fs::metadata(&destination).unwrap().len());

        let doc = Document::load(&destination).unwrap();
        let widths: Vec<f64> = doc
            .get_pages()
            .values()
            .map(|id| media_box_width(&doc, *id))
            .collect();
        assert_eq!(widths.len(), 3);
        assert!((widths[0] - 72.0).abs() < 0.01);
        assert!((widths[1] - 144.0).abs() < 0.01);
        assert!((widths[2] - 216.0).abs() < 0.01);
    }

    #[test]
    fn test_format_detected_from_contents() {
        let temp_dir = TempDir::new().unwrap();
        let suffixed = temp_dir.path().join("a.png.orig");
        let numbered = temp_dir.path().join("b.jpg.1");
        let mislabelled = temp_dir.path().join("c.png");
        write_encoded(&suffixed, 100, ImageOutputFormat::Png);
        write_encoded(&numbered, 200, ImageOutputFormat::Jpeg(90));
        write_encoded(&mislabelled, 300, ImageOutputFormat::Jpeg(90));
        let destination = temp_dir.path().join("out.pdf");

        let pdf = PdfAssembler::new(100.0)
            .assemble(&[suffixed, numbered, mislabelled], &destination)
            .unwrap();

        assert_eq!(pdf.pages, 3);
        let doc = Document::load(&destination).unwrap();
        let widths: Vec<f64> = doc
            .get_pages()
            .values()
            .map(|id| media_box_width(&doc, *id))
            .collect();
        assert!((widths[0] - 72.0).abs() < 0.01);
        assert!((widths[1] - 144.0).abs() < 0.01);
        assert!((widths[2] - 216.0).abs() < 0.01);
    }

    #[test]
    fn test_undecodable_image_is_assembly_error() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("a.png");
        let bad = temp_dir.path().join("b.png");
        write_image(&good, 10, 10);
        fs::write(&bad, b"not a png").unwrap();
        let destination = temp_dir.path().join("out.pdf");

        let err = PdfAssembler::new(100.0).assemble(&[good, bad], &destination).unwrap_err();

        assert!(matches!(err, ConvertError::Assembly(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_unwritable_destination_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("a.png");
        write_image(&image_path, 10, 10);
        let destination = temp_dir.path().join("missing_dir").join("out.pdf");

        let err = PdfAssembler::new(100.0).assemble(&[image_path], &destination).unwrap_err();

        assert!(matches!(err, ConvertError::Assembly(_)));
        assert!(!destination.exists());
    }
}
