use std::io::{Cursor, Write};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Color;
use crate::engine::{Kernel, Layer, RasterEngine, RasterFlag};
use crate::foundation::core::{Coordinate, Dimension, Region};
use crate::foundation::error::{RasterError, RasterResult};

/// Options for [`CpuEngine`].
#[derive(Debug, Clone, Copy)]
pub struct CpuEngineOpts {
    pub(crate) encode_format: ImageFormat,
    pub(crate) max_dimension: u32,
    pub(crate) resize_filter: FilterType,
}

impl Default for CpuEngineOpts {
    fn default() -> Self {
        Self {
            encode_format: ImageFormat::Png,
            max_dimension: 16_384,
            resize_filter: FilterType::Triangle,
        }
    }
}

impl CpuEngineOpts {
    /// Format used for in-memory encoding and for paths without a known extension.
    pub fn with_encode_format(mut self, format: ImageFormat) -> Self {
        self.encode_format = format;
        self
    }

    /// Largest accepted width or height.
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Interpolation used when a copy stretches pixels.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Configured encode format.
    pub fn encode_format(&self) -> ImageFormat {
        self.encode_format
    }
}

/// Raster handle of the [`CpuEngine`]: straight-alpha RGBA8 pixels plus rendering flags.
///
/// Not `Clone`: a second surface only comes from [`RasterEngine::duplicate`].
#[derive(Debug)]
pub struct CpuSurface {
    pixels: RgbaImage,
    alpha_blending: bool,
    interlace: bool,
    tile: Option<RgbaImage>,
    brush: Option<RgbaImage>,
}

impl CpuSurface {
    /// Wrap raw pixels. Alpha blending starts enabled, interlace disabled.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            alpha_blending: true,
            interlace: false,
            tile: None,
            brush: None,
        }
    }

    /// Pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Unwrap into the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Whether fills and copies composite instead of replacing.
    pub fn is_alpha_blending(&self) -> bool {
        self.alpha_blending
    }

    /// Whether interlaced output was requested.
    pub fn is_interlaced(&self) -> bool {
        self.interlace
    }

    fn write_pixel(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        let out = if self.alpha_blending {
            blend_over(*self.pixels.get_pixel(x, y), src)
        } else {
            src
        };
        self.pixels.put_pixel(x, y, out);
    }
}

/// Native paint of the [`CpuEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum CpuPaint {
    /// One color everywhere.
    Solid(Rgba<u8>),
    /// Colors cycled in row-major pixel order.
    Styled(Vec<Rgba<u8>>),
    /// Pattern repeated from the fill origin.
    Tiled(RgbaImage),
    /// Brush image stamped once, centred on the fill origin.
    Brushed(RgbaImage),
}

impl CpuPaint {
    /// Paint at `(x, y)`; `None` leaves the pixel untouched.
    fn at(&self, x: u32, y: u32, origin: Coordinate, width: u32) -> Option<Rgba<u8>> {
        match self {
            Self::Solid(c) => Some(*c),
            Self::Styled(colors) => {
                let i = (y as usize) * (width as usize) + (x as usize);
                colors.get(i % colors.len().max(1)).copied()
            }
            Self::Tiled(tile) => {
                let tx = (i64::from(x) - i64::from(origin.x)).rem_euclid(i64::from(tile.width()));
                let ty =
                    (i64::from(y) - i64::from(origin.y)).rem_euclid(i64::from(tile.height()));
                Some(*tile.get_pixel(tx as u32, ty as u32))
            }
            Self::Brushed(brush) => {
                let bx = i64::from(x) - i64::from(origin.x) + i64::from(brush.width() / 2);
                let by = i64::from(y) - i64::from(origin.y) + i64::from(brush.height() / 2);
                let inside = (0..i64::from(brush.width())).contains(&bx)
                    && (0..i64::from(brush.height())).contains(&by);
                if !inside {
                    return None;
                }
                Some(*brush.get_pixel(bx as u32, by as u32))
            }
        }
    }
}

/// Default raster engine: `image` buffers, `imageops` resampling and codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEngine {
    opts: CpuEngineOpts,
}

impl CpuEngine {
    /// Engine with explicit options.
    pub fn new(opts: CpuEngineOpts) -> Self {
        Self { opts }
    }

    /// Active options.
    pub fn opts(&self) -> &CpuEngineOpts {
        &self.opts
    }

    fn check_dimension(&self, width: u32, height: u32) -> RasterResult<Dimension> {
        let max = self.opts.max_dimension;
        if width > max || height > max {
            return Err(RasterError::InvalidDimension { width, height });
        }
        Dimension::new(width, height)
    }

    fn encode_bytes(&self, surface: &CpuSurface, format: ImageFormat) -> RasterResult<Vec<u8>> {
        let mut buf = Vec::new();
        let px = &surface.pixels;
        let res = if format == ImageFormat::Jpeg {
            // JPEG has no alpha channel.
            image::DynamicImage::ImageRgba8(px.clone())
                .to_rgb8()
                .write_to(&mut Cursor::new(&mut buf), format)
        } else {
            px.write_to(&mut Cursor::new(&mut buf), format)
        };
        res.map_err(|e| RasterError::output(format!("encode {format:?}: {e}")))?;
        Ok(buf)
    }
}

impl RasterEngine for CpuEngine {
    type Surface = CpuSurface;
    type Paint = CpuPaint;

    fn allocate(&self, dimension: Dimension) -> RasterResult<CpuSurface> {
        let d = self.check_dimension(dimension.width(), dimension.height())?;
        tracing::debug!(width = d.width(), height = d.height(), "allocate surface");
        Ok(CpuSurface::from_image(RgbaImage::from_pixel(
            d.width(),
            d.height(),
            Rgba([0, 0, 0, 255]),
        )))
    }

    fn decode_file(&self, path: &Path) -> RasterResult<CpuSurface> {
        let img = image::open(path).map_err(|e| {
            RasterError::canvas(format!("decode image '{}': {e}", path.display()))
        })?;
        let rgba = img.to_rgba8();
        self.check_dimension(rgba.width(), rgba.height())?;
        tracing::debug!(path = %path.display(), width = rgba.width(), height = rgba.height(), "decoded file");
        Ok(CpuSurface::from_image(rgba))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> RasterResult<CpuSurface> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| RasterError::canvas(format!("decode image from memory: {e}")))?;
        let rgba = img.to_rgba8();
        self.check_dimension(rgba.width(), rgba.height())?;
        tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded bytes");
        Ok(CpuSurface::from_image(rgba))
    }

    fn encode_to_file(&self, surface: &CpuSurface, path: &Path) -> RasterResult<()> {
        let format = ImageFormat::from_path(path).unwrap_or(self.opts.encode_format);
        let bytes = self.encode_bytes(surface, format)?;
        std::fs::write(path, bytes)
            .map_err(|e| RasterError::output(format!("write '{}': {e}", path.display())))
    }

    fn encode_to_writer(&self, surface: &CpuSurface, out: &mut dyn Write) -> RasterResult<()> {
        let bytes = self.encode_bytes(surface, self.opts.encode_format)?;
        out.write_all(&bytes)
            .map_err(|e| RasterError::output(format!("write encoded canvas: {e}")))
    }

    fn free(&self, surface: CpuSurface) -> RasterResult<()> {
        tracing::debug!(
            width = surface.pixels.width(),
            height = surface.pixels.height(),
            "free surface"
        );
        drop(surface);
        Ok(())
    }

    fn validate(&self, surface: &CpuSurface) -> RasterResult<()> {
        let (w, h) = surface.pixels.dimensions();
        self.check_dimension(w, h)
            .map(|_| ())
            .map_err(|_| RasterError::invalid_argument(format!("surface has unusable size {w}x{h}")))
    }

    fn dimension(&self, surface: &CpuSurface) -> RasterResult<Dimension> {
        let (w, h) = surface.pixels.dimensions();
        Dimension::new(w, h)
    }

    fn duplicate(&self, surface: &CpuSurface) -> RasterResult<CpuSurface> {
        Ok(CpuSurface {
            pixels: surface.pixels.clone(),
            alpha_blending: surface.alpha_blending,
            interlace: surface.interlace,
            tile: surface.tile.clone(),
            brush: surface.brush.clone(),
        })
    }

    fn copy_region(
        &self,
        src: &CpuSurface,
        src_region: Region,
        dst: &mut CpuSurface,
        dst_region: Region,
    ) -> RasterResult<()> {
        let src_dim = self.dimension(src)?;
        let dst_dim = self.dimension(dst)?;
        if !src_region.fits_within(src_dim) {
            return Err(RasterError::invalid_argument(
                "source region exceeds the source surface",
            ));
        }
        if !dst_region.fits_within(dst_dim) {
            return Err(RasterError::invalid_argument(
                "destination region exceeds the destination surface",
            ));
        }

        let patch = imageops::crop_imm(
            &src.pixels,
            src_region.x() as u32,
            src_region.y() as u32,
            src_region.width(),
            src_region.height(),
        )
        .to_image();
        let patch = if src_region.dimension == dst_region.dimension {
            patch
        } else {
            imageops::resize(
                &patch,
                dst_region.width(),
                dst_region.height(),
                self.opts.resize_filter,
            )
        };

        let (ox, oy) = (dst_region.x() as u32, dst_region.y() as u32);
        for (x, y, px) in patch.enumerate_pixels() {
            dst.write_pixel(ox + x, oy + y, *px);
        }
        Ok(())
    }

    fn fill_region(
        &self,
        surface: &mut CpuSurface,
        paint: &CpuPaint,
        origin: Coordinate,
    ) -> RasterResult<()> {
        let dim = self.dimension(surface)?;
        if !origin.is_inside(dim) {
            return Err(RasterError::invalid_argument(format!(
                "fill origin ({}, {}) is outside the surface",
                origin.x, origin.y
            )));
        }

        // One state byte per pixel; the region is painted in a second pass over the mask.
        const SEEN: u8 = 1;
        const FILL: u8 = 2;

        let (w, h) = (dim.width(), dim.height());
        let index = |x: u32, y: u32| (y as usize) * (w as usize) + (x as usize);
        let target = *surface.pixels.get_pixel(origin.x as u32, origin.y as u32);
        let mut mask = vec![0u8; (w as usize) * (h as usize)];
        let start = (origin.x as u32, origin.y as u32);
        mask[index(start.0, start.1)] = SEEN;
        let mut stack = vec![start];

        while let Some((x, y)) = stack.pop() {
            if *surface.pixels.get_pixel(x, y) != target {
                continue;
            }
            mask[index(x, y)] = FILL;
            let neighbours = [
                (x > 0).then(|| (x - 1, y)),
                (x + 1 < w).then(|| (x + 1, y)),
                (y > 0).then(|| (x, y - 1)),
                (y + 1 < h).then(|| (x, y + 1)),
            ];
            for (nx, ny) in neighbours.into_iter().flatten() {
                let m = &mut mask[index(nx, ny)];
                if *m == 0 {
                    *m = SEEN;
                    stack.push((nx, ny));
                }
            }
        }

        for (i, _) in mask.iter().enumerate().filter(|(_, m)| **m == FILL) {
            let (x, y) = ((i % w as usize) as u32, (i / w as usize) as u32);
            if let Some(px) = paint.at(x, y, origin, w) {
                surface.write_pixel(x, y, px);
            }
        }
        Ok(())
    }

    fn set_tile(&self, surface: &mut CpuSurface, tile: &CpuSurface) -> RasterResult<()> {
        surface.tile = Some(tile.pixels.clone());
        Ok(())
    }

    fn set_brush(&self, surface: &mut CpuSurface, brush: &CpuSurface) -> RasterResult<()> {
        surface.brush = Some(brush.pixels.clone());
        Ok(())
    }

    fn stamp_brush(&self, surface: &mut CpuSurface, points: &[Coordinate]) -> RasterResult<()> {
        let brush = surface
            .brush
            .clone()
            .ok_or_else(|| RasterError::canvas("no brush registered on the surface"))?;
        let (w, h) = surface.pixels.dimensions();
        let (half_w, half_h) = (i64::from(brush.width() / 2), i64::from(brush.height() / 2));

        for p in points {
            for (bx, by, px) in brush.enumerate_pixels() {
                if px[3] == 0 {
                    continue;
                }
                let x = i64::from(p.x) - half_w + i64::from(bx);
                let y = i64::from(p.y) - half_h + i64::from(by);
                if x < 0 || y < 0 || x >= i64::from(w) || y >= i64::from(h) {
                    continue;
                }
                surface.write_pixel(x as u32, y as u32, *px);
            }
        }
        Ok(())
    }

    fn apply_convolution(
        &self,
        surface: &mut CpuSurface,
        kernel: &Kernel,
        divisor: f32,
        offset: f32,
    ) -> RasterResult<()> {
        if divisor == 0.0 || !divisor.is_finite() || !offset.is_finite() {
            return Err(RasterError::canvas(format!(
                "convolution needs a finite non-zero divisor and finite offset (divisor={divisor}, offset={offset})"
            )));
        }

        let src = &surface.pixels;
        let (w, h) = src.dimensions();
        let max_x = i64::from(w) - 1;
        let max_y = i64::from(h) - 1;
        let mut out = RgbaImage::new(w, h);

        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 3];
                for (j, row) in kernel.rows().iter().enumerate() {
                    let sy = (i64::from(y) + j as i64 - 1).clamp(0, max_y) as u32;
                    for (i, &k) in row.iter().enumerate() {
                        let sx = (i64::from(x) + i as i64 - 1).clamp(0, max_x) as u32;
                        let p = src.get_pixel(sx, sy);
                        for c in 0..3 {
                            acc[c] += k * f32::from(p[c]);
                        }
                    }
                }
                let center = src.get_pixel(x, y);
                let mut px = [0u8, 0, 0, center[3]];
                for c in 0..3 {
                    px[c] = (acc[c] / divisor + offset).clamp(0.0, 255.0) as u8;
                }
                out.put_pixel(x, y, Rgba(px));
            }
        }

        surface.pixels = out;
        Ok(())
    }

    fn set_flag(
        &self,
        surface: &mut CpuSurface,
        flag: RasterFlag,
        enabled: bool,
    ) -> RasterResult<()> {
        match flag {
            RasterFlag::AlphaBlending => surface.alpha_blending = enabled,
            RasterFlag::Interlace => surface.interlace = enabled,
        }
        Ok(())
    }

    fn flag(&self, surface: &CpuSurface, flag: RasterFlag) -> bool {
        match flag {
            RasterFlag::AlphaBlending => surface.alpha_blending,
            RasterFlag::Interlace => surface.interlace,
        }
    }

    fn resolve_color(&self, surface: &CpuSurface, color: &Color) -> RasterResult<CpuPaint> {
        match color {
            Color::Rgb(c) => Ok(CpuPaint::Solid(Rgba(c.to_array()))),
            Color::Transparent => Ok(CpuPaint::Solid(Rgba([0, 0, 0, 0]))),
            Color::Styled(colors) => {
                if colors.is_empty() {
                    return Err(RasterError::config(
                        "styled color needs at least one color",
                    ));
                }
                Ok(CpuPaint::Styled(
                    colors.iter().map(|c| Rgba(c.to_array())).collect(),
                ))
            }
            Color::Tiled => surface
                .tile
                .clone()
                .map(CpuPaint::Tiled)
                .ok_or_else(|| RasterError::canvas("no tile registered on the surface")),
            Color::Brushed => surface
                .brush
                .clone()
                .map(CpuPaint::Brushed)
                .ok_or_else(|| RasterError::canvas("no brush registered on the surface")),
        }
    }

    fn composite_layer(&self, surface: &mut CpuSurface, layer: &Layer) -> RasterResult<()> {
        let (w, h) = surface.pixels.dimensions();
        let origin = layer.origin();
        let ld = layer.dimension();

        for ly in 0..ld.height() {
            let y = i64::from(origin.y) + i64::from(ly);
            if y < 0 || y >= i64::from(h) {
                continue;
            }
            for lx in 0..ld.width() {
                let x = i64::from(origin.x) + i64::from(lx);
                if x < 0 || x >= i64::from(w) {
                    continue;
                }
                let Some(src) = layer.pixel(lx, ly) else {
                    continue;
                };
                if src[3] == 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                let out = if surface.alpha_blending {
                    let dst = premultiply(*surface.pixels.get_pixel(x, y));
                    unpremultiply(over_premul(dst, src))
                } else {
                    unpremultiply(src)
                };
                surface.pixels.put_pixel(x, y, out);
            }
        }
        Ok(())
    }
}

fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let ws = sa * 255;
    let wd = da * (255 - sa);
    let total = ws + wd;
    if total == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = ((u32::from(src[c]) * ws + u32::from(dst[c]) * wd + total / 2) / total) as u8;
    }
    out[3] = ((total + 127) / 255) as u8;
    Rgba(out)
}

fn over_premul(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn premultiply(px: Rgba<u8>) -> [u8; 4] {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

fn unpremultiply(px: [u8; 4]) -> Rgba<u8> {
    let a = u32::from(px[3]);
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    Rgba([un(px[0]), un(px[1]), un(px[2]), px[3]])
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/engine/cpu.rs"]
mod tests;
