//! PDF rendering of composed tile pages
//!
//! One output page per tile: the cropped raster placed inside the drawing
//! border, solid corner ticks and dashed cut lines drawn from the tile's
//! registration marks. Geometry comes from the tiling core; this module
//! only translates it into printpdf operations.

use std::io::Cursor;
use std::path::Path;

use ::image::DynamicImage;
use map_tiling::{BorderSpec, LayoutPlan, PixelScale, RegistrationMark, TilePage};
use printpdf::*;

use crate::{PdfError, Result};

const MARK_THICKNESS_PT: f32 = 0.5;
/// Dash pattern for shared cut lines, in points
const DASH_LENGTH_PT: i64 = 3;

/// Render composed tile pages to a PDF file.
pub async fn write_tiled_pdf(
    pages: Vec<TilePage<DynamicImage>>,
    plan: &LayoutPlan,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let plan = plan.clone();
    let output_path = output_path.as_ref().to_owned();

    let bytes = tokio::task::spawn_blocking(move || tiled_pdf_bytes(pages, &plan)).await??;
    tokio::fs::write(&output_path, bytes).await?;
    log::info!("wrote tiled PDF to {}", output_path.display());

    Ok(())
}

fn tiled_pdf_bytes(pages: Vec<TilePage<DynamicImage>>, plan: &LayoutPlan) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new("Tiled map");

    let (page_width_mm, page_height_mm) = plan.paper_dimensions_mm();
    let (north_mm, _, _, west_mm) = plan.drawing_borders_mm();

    log::info!(
        "building PDF: {} pages of {} {:?}",
        pages.len(),
        plan.paper.label(),
        plan.orientation
    );

    for page in pages {
        let mut ops = Vec::new();

        let content_width_mm = page.tile.crop.width() as f32 / plan.pixels_per_mm;
        let content_height_mm = page.tile.crop.height() as f32 / plan.pixels_per_mm;

        ops.extend(image_ops(
            &mut doc,
            &page.raster,
            west_mm,
            page_height_mm - north_mm - content_height_mm,
            content_width_mm,
            content_height_mm,
        )?);
        ops.extend(mark_ops(&page.marks, page_width_mm, page_height_mm));

        doc.pages.push(pdf_page(page_width_mm, page_height_mm, ops));
    }

    let mut warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Write a PDF with a single page sized exactly to the image plus its
/// borders. Useful for print houses that accept custom page sizes; nothing
/// is tiled and no marks are drawn.
pub async fn write_single_page_pdf(
    image: DynamicImage,
    squares_wide: f32,
    squares_high: f32,
    border: &BorderSpec,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let border = *border;
    let output_path = output_path.as_ref().to_owned();

    let bytes =
        tokio::task::spawn_blocking(move || single_page_pdf_bytes(&image, squares_wide, squares_high, &border))
            .await??;
    tokio::fs::write(&output_path, bytes).await?;
    log::info!("wrote single page PDF to {}", output_path.display());

    Ok(())
}

fn single_page_pdf_bytes(
    image: &DynamicImage,
    squares_wide: f32,
    squares_high: f32,
    border: &BorderSpec,
) -> Result<Vec<u8>> {
    let scale = PixelScale::from_reference_squares(
        image.width(),
        image.height(),
        squares_wide,
        squares_high,
    )?;
    let image_width_mm = scale.px_to_mm(image.width() as f32);
    let image_height_mm = scale.px_to_mm(image.height() as f32);
    let page_width_mm = image_width_mm + border.west_mm + border.east_mm;
    let page_height_mm = image_height_mm + border.north_mm + border.south_mm;

    let mut doc = PdfDocument::new("Map");
    let ops = image_ops(
        &mut doc,
        image,
        border.west_mm,
        border.south_mm,
        image_width_mm,
        image_height_mm,
    )?;
    doc.pages.push(pdf_page(page_width_mm, page_height_mm, ops));

    let mut warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

fn pdf_page(width_mm: f32, height_mm: f32, ops: Vec<Op>) -> PdfPage {
    let bounds = Rect {
        x: Pt(0.0),
        y: Pt(0.0),
        width: Mm(width_mm).into_pt(),
        height: Mm(height_mm).into_pt(),
    };
    PdfPage {
        media_box: bounds.clone(),
        trim_box: bounds.clone(),
        crop_box: bounds,
        ops,
    }
}

/// Embed the raster and place it at the given position (PDF coordinates,
/// origin bottom-left) with the given physical size.
fn image_ops(
    doc: &mut PdfDocument,
    image: &DynamicImage,
    x_mm: f32,
    y_mm: f32,
    width_mm: f32,
    height_mm: f32,
) -> Result<Vec<Op>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ::image::ImageFormat::Png)?;

    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(&png, &mut warnings)
        .map_err(|e| PdfError::Pdf(format!("Failed to embed image: {e}")))?;
    let image_id = doc.add_image(&raw);

    // At 72 dpi one pixel is one point, so the scale factors are plain
    // pt-per-px ratios
    let scale_x = Mm(width_mm).into_pt().0 / image.width() as f32;
    let scale_y = Mm(height_mm).into_pt().0 / image.height() as f32;

    Ok(vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Mm(x_mm).into_pt()),
            translate_y: Some(Mm(y_mm).into_pt()),
            rotate: None,
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(72.0),
        },
    }])
}

/// Stroke the registration marks. Mark geometry uses a top-left origin with
/// y growing southward; PDF pages use a bottom-left origin, so y flips here.
fn mark_ops(marks: &[RegistrationMark], page_width_mm: f32, page_height_mm: f32) -> Vec<Op> {
    let mut ops = Vec::with_capacity(marks.len() * 2 + 4);

    ops.push(Op::SaveGraphicsState);
    ops.push(Op::SetOutlineColor {
        col: Color::Rgb(Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            icc_profile: None,
        }),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(MARK_THICKNESS_PT),
    });

    // Solid marks first, then dashed, so the dash pattern is set only once
    let mut sorted: Vec<&RegistrationMark> = marks.iter().collect();
    sorted.sort_by_key(|m| m.dashed);

    let mut dash_active = false;
    for mark in sorted {
        if mark.dashed && !dash_active {
            ops.push(Op::SetLineDashPattern {
                dash: LineDashPattern {
                    offset: 0,
                    dash_1: Some(DASH_LENGTH_PT),
                    gap_1: Some(DASH_LENGTH_PT),
                    ..Default::default()
                },
            });
            dash_active = true;
        }

        let ((start_x, start_y), (end_x, end_y)) = mark.endpoints(page_width_mm, page_height_mm);
        let line = Line {
            points: vec![
                LinePoint {
                    p: Point::new(Mm(start_x), Mm(page_height_mm - start_y)),
                    bezier: false,
                },
                LinePoint {
                    p: Point::new(Mm(end_x), Mm(page_height_mm - end_y)),
                    bezier: false,
                },
            ],
            is_closed: false,
        };
        ops.push(Op::DrawLine { line });
    }

    ops.push(Op::RestoreGraphicsState);
    ops
}
