//! Embedded image extraction
//!
//! Walks a PDF's page resources for image XObjects and decodes them into
//! rasters. Maps distributed as PDFs usually carry one large JPEG or
//! flate-compressed bitmap per page; small decorative images are filtered
//! out by the size thresholds.

use std::collections::HashSet;
use std::path::Path;

use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// First page to scan (1-based)
    pub first_page: u32,
    /// Last page to scan, inclusive (all remaining pages when `None`)
    pub last_page: Option<u32>,
    /// Skip images narrower than this
    pub min_width: u32,
    /// Skip images shorter than this
    pub min_height: u32,
    /// Skip images whose stored stream is smaller than this
    pub min_bytes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            first_page: 1,
            last_page: None,
            min_width: 100,
            min_height: 100,
            min_bytes: 512 * 1024,
        }
    }
}

/// Extract embedded images from the PDF at `path`, in page order.
///
/// Images shared between pages are returned once. Streams using filters we
/// cannot decode are skipped with a log message rather than failing the
/// whole run.
pub async fn extract_images(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Vec<DynamicImage>> {
    let path = path.as_ref().to_owned();
    let options = options.clone();
    tokio::task::spawn_blocking(move || extract_images_sync(&path, &options)).await?
}

fn extract_images_sync(path: &Path, options: &ExtractOptions) -> Result<Vec<DynamicImage>> {
    let doc = Document::load(path)?;
    let mut seen: HashSet<ObjectId> = HashSet::new();
    let mut images = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        if page_number < options.first_page {
            continue;
        }
        if let Some(last) = options.last_page {
            if page_number > last {
                break;
            }
        }

        let (resources, resource_ids) = doc.get_page_resources(page_id)?;
        let mut dicts: Vec<&Dictionary> = resources.into_iter().collect();
        for id in resource_ids {
            if let Ok(dict) = doc.get_dictionary(id) {
                dicts.push(dict);
            }
        }

        for dict in dicts {
            let Ok(xobjects) = dict.get(b"XObject").and_then(|o| resolve(&doc, o)?.as_dict())
            else {
                continue;
            };
            for (name, entry) in xobjects.iter() {
                let Object::Reference(id) = entry else {
                    continue;
                };
                if !seen.insert(*id) {
                    continue;
                }
                let Ok(stream) = doc.get_object(*id).and_then(Object::as_stream) else {
                    continue;
                };
                match decode_image_stream(&doc, stream, options) {
                    Ok(Some(image)) => {
                        log::debug!(
                            "page {page_number}: extracted {} ({}x{})",
                            String::from_utf8_lossy(name),
                            image.width(),
                            image.height()
                        );
                        images.push(image);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        log::debug!(
                            "page {page_number}: skipping {}: {err}",
                            String::from_utf8_lossy(name)
                        );
                    }
                }
            }
        }
    }

    log::info!("extracted {} images from {}", images.len(), path.display());
    Ok(images)
}

/// Decode one XObject stream, or `None` when it is not an image that passes
/// the size filters.
fn decode_image_stream(
    doc: &Document,
    stream: &Stream,
    options: &ExtractOptions,
) -> Result<Option<DynamicImage>> {
    if !matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image") {
        return Ok(None);
    }

    let width = stream.dict.get(b"Width")?.as_i64()? as u32;
    let height = stream.dict.get(b"Height")?.as_i64()? as u32;
    if width < options.min_width
        || height < options.min_height
        || stream.content.len() < options.min_bytes
    {
        log::debug!("filtered out {width}x{height} image ({} bytes)", stream.content.len());
        return Ok(None);
    }

    let image = match last_filter(stream).as_deref() {
        Some(b"DCTDecode") => image::load_from_memory(&stream.content)?,
        Some(b"FlateDecode") | None => decode_raw_bitmap(doc, stream, width, height)?,
        Some(other) => {
            log::debug!(
                "unsupported image filter {}",
                String::from_utf8_lossy(other)
            );
            return Ok(None);
        }
    };

    match soft_mask(doc, stream, width, height) {
        Some(alpha) => Ok(Some(apply_alpha(image, &alpha))),
        None => Ok(Some(image)),
    }
}

/// Decompress and interpret a raw bitmap stream (8 bits per component,
/// gray or RGB).
fn decode_raw_bitmap(
    doc: &Document,
    stream: &Stream,
    width: u32,
    height: u32,
) -> Result<DynamicImage> {
    let bits = stream
        .dict
        .get(b"BitsPerComponent")
        .and_then(Object::as_i64)
        .unwrap_or(8);
    if bits != 8 {
        return Err(parse_error(format!("{bits} bits per component")));
    }

    let data = stream.decompressed_content()?;
    match color_components(doc, stream)? {
        3 => {
            let buffer = image::RgbImage::from_raw(width, height, data)
                .ok_or_else(|| parse_error("RGB data shorter than declared size".into()))?;
            Ok(DynamicImage::ImageRgb8(buffer))
        }
        1 => {
            let buffer = image::GrayImage::from_raw(width, height, data)
                .ok_or_else(|| parse_error("gray data shorter than declared size".into()))?;
            Ok(DynamicImage::ImageLuma8(buffer))
        }
        n => Err(parse_error(format!("{n} color components"))),
    }
}

/// Number of color components implied by the stream's ColorSpace entry.
fn color_components(doc: &Document, stream: &Stream) -> Result<usize> {
    let space = resolve(doc, stream.dict.get(b"ColorSpace")?)?;
    match space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceRGB" => Ok(3),
            b"DeviceGray" => Ok(1),
            other => Err(parse_error(format!(
                "color space {}",
                String::from_utf8_lossy(other)
            ))),
        },
        Object::Array(arr) => {
            // ICCBased streams declare their component count as /N
            if matches!(arr.first(), Some(Object::Name(n)) if n == b"ICCBased") {
                let profile = arr
                    .get(1)
                    .ok_or_else(|| parse_error("truncated ICCBased color space".into()))?;
                let n = resolve(doc, profile)?.as_stream()?.dict.get(b"N")?.as_i64()?;
                Ok(n as usize)
            } else {
                Err(parse_error("indexed or separation color space".into()))
            }
        }
        _ => Err(parse_error("unreadable color space".into())),
    }
}

/// Decode the SMask entry as an alpha channel, if present and usable.
fn soft_mask(doc: &Document, stream: &Stream, width: u32, height: u32) -> Option<Vec<u8>> {
    let mask = resolve(doc, stream.dict.get(b"SMask").ok()?).ok()?;
    let mask = mask.as_stream().ok()?;

    let mask_width = mask.dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let mask_height = mask.dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    if (mask_width, mask_height) != (width, height) {
        log::debug!("soft mask size differs from image, ignoring");
        return None;
    }

    let data = match last_filter(mask).as_deref() {
        Some(b"DCTDecode") => image::load_from_memory(&mask.content).ok()?.to_luma8().into_raw(),
        Some(b"FlateDecode") | None => mask.decompressed_content().ok()?,
        _ => return None,
    };
    if data.len() < (width * height) as usize {
        return None;
    }
    Some(data)
}

fn apply_alpha(image: DynamicImage, alpha: &[u8]) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for (pixel, a) in rgba.pixels_mut().zip(alpha) {
        pixel.0[3] = *a;
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Innermost filter name of a stream, following arrays to the last entry.
fn last_filter(stream: &Stream) -> Option<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(name.clone()),
        Ok(Object::Array(arr)) => arr.iter().rev().find_map(|obj| match obj {
            Object::Name(name) => Some(name.clone()),
            _ => None,
        }),
        _ => None,
    }
}

/// Follow a reference to its target object; non-references pass through.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

fn parse_error(message: String) -> crate::PdfError {
    crate::PdfError::Pdf(message)
}
