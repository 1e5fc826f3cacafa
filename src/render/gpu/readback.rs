//! Blocking texture readback with row de-padding.

use super::context::GpuContext;
use crate::error::PickError;

/// Every target format used here is 4 bytes per texel.
const BYTES_PER_TEXEL: u32 = 4;

/// Align a row size to WebGPU's copy row alignment (256 bytes).
fn align_bytes_per_row(value: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    value.div_ceil(align) * align
}

/// Turn a failed device poll into a readback error instead of waiting on a
/// map callback that will never run.
fn check_poll<T, E: std::fmt::Display>(result: Result<T, E>) -> Result<(), PickError> {
    result
        .map(|_| ())
        .map_err(|e| PickError::Readback(format!("device poll failed: {e}")))
}

/// Copy `texture` to a staging buffer, wait for the GPU and return tightly
/// packed rows (top row first).
///
/// # Errors
///
/// Returns [`PickError::Readback`] if the device poll or buffer mapping
/// fails.
pub(crate) fn read_texture(
    context: &GpuContext,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, PickError> {
    let tight = width * BYTES_PER_TEXEL;
    let padded = align_bytes_per_row(tight);
    let staging = context.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging Buffer"),
        size: u64::from(padded) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = context.create_encoder("Readback Encoder");
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    context.submit(encoder);

    let slice = staging.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    // The map callback only fires from a successful poll.
    check_poll(context.device.poll(wgpu::PollType::Wait))?;

    match receiver.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(PickError::Readback(e.to_string())),
        Err(e) => return Err(PickError::Readback(e.to_string())),
    }

    let data = slice.get_mapped_range();
    let mut out = Vec::with_capacity(tight as usize * height as usize);
    for row in data.chunks_exact(padded as usize) {
        out.extend_from_slice(&row[..tight as usize]);
    }
    drop(data);
    staging.unmap();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_align_to_256() {
        assert_eq!(align_bytes_per_row(4), 256);
        assert_eq!(align_bytes_per_row(256), 256);
        assert_eq!(align_bytes_per_row(640 * 4), 2560);
        assert_eq!(align_bytes_per_row(257), 512);
    }

    #[test]
    fn failed_poll_is_a_readback_error() {
        assert!(check_poll::<(), &str>(Ok(())).is_ok());
        let err = check_poll::<(), &str>(Err("device lost")).unwrap_err();
        assert!(matches!(err, PickError::Readback(msg) if msg.contains("device lost")));
    }
}
