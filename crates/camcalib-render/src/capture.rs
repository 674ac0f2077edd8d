//! Reading render targets back to the CPU and saving them as images.

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::engine::RenderEngine;
use crate::error::{RenderError, RenderResult};
use crate::render_target::RenderTarget;

/// Calculates bytes per row with proper alignment for wgpu buffer copies.
pub fn aligned_bytes_per_row(width: u32) -> u32 {
    let unaligned = width * 4; // RGBA8
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

/// Drops the padding at the end of each row of a readback buffer.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut result = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height {
        let start = (row * bytes_per_row) as usize;
        result.extend_from_slice(&data[start..start + row_bytes]);
    }
    result
}

impl RenderEngine {
    /// Copies a render target into CPU memory as tightly packed RGBA8 rows.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_target(&self, target: &RenderTarget) -> RenderResult<Vec<u8>> {
        let (width, height) = target.size();
        let bytes_per_row = aligned_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("capture copy encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: target.texture(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|_| RenderError::Timeout)?;
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        let data = buffer_slice.get_mapped_range();
        let result = strip_row_padding(&data, width, height, bytes_per_row);
        drop(data);
        buffer.unmap();

        Ok(result)
    }
}

fn to_image(rgba: &[u8], width: u32, height: u32) -> RenderResult<ImageBuffer<Rgba<u8>, Vec<u8>>> {
    let expected = width as usize * height as usize * 4;
    // wgpu uses a top-left origin, so no vertical flip is needed
    ImageBuffer::from_raw(width, height, rgba.to_vec()).ok_or(RenderError::InvalidImageData {
        expected,
        actual: rgba.len(),
    })
}

/// Saves tightly packed RGBA8 pixels as a PNG file.
pub fn save_png(path: impl AsRef<Path>, rgba: &[u8], width: u32, height: u32) -> RenderResult<()> {
    let path = path.as_ref();
    to_image(rgba, width, height)?.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("saved {width}x{height} capture to {}", path.display());
    Ok(())
}

/// Encodes tightly packed RGBA8 pixels as PNG bytes in memory.
pub fn encode_png(rgba: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    to_image(rgba, width, height)?.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_bytes_per_row() {
        assert_eq!(aligned_bytes_per_row(64), 256);
        assert_eq!(aligned_bytes_per_row(65), 512);
        assert_eq!(aligned_bytes_per_row(1), 256);
    }

    #[test]
    fn test_strip_row_padding() {
        // Two rows of one pixel, padded to eight bytes each
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        assert_eq!(strip_row_padding(&data, 1, 2, 8), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_encode_png_signature() {
        let rgba = vec![255u8; 2 * 2 * 4];
        let png = encode_png(&rgba, 2, 2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_wrong_size_rejected() {
        let err = encode_png(&[0u8; 7], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidImageData {
                expected: 16,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("camcalib_capture_test_{}.png", std::process::id()));
        let rgba: Vec<u8> = (0..4 * 4 * 4).map(|i| i as u8).collect();
        save_png(&path, &rgba, 4, 4).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(loaded.into_raw(), rgba);
    }
}
