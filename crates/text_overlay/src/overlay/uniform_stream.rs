//! Uniform parameter streaming
//!
//! Per-call draw parameters live in fixed-size blocks carved out of one
//! host-visible store. Blocks are handed out round-robin, so a block is reused
//! only after every other block has been handed out once since. The host must
//! keep fewer calls in flight than there are blocks.
//!
//! Block layout (std140, little-endian f32):
//!
//! | Offset | Size | Content                                   |
//! |--------|------|-------------------------------------------|
//! | 0      | 8160 | 510 × `vec4`, `.xy` holds a glyph offset  |
//! | 8160   | 16   | `vec4`, `.xy` holds the raster → NDC scale |
//! | 8176   | 16   | `vec4` text color                         |

use bytemuck::{Pod, Zeroable};
use crate::error::{OverlayError, OverlayResult};
use crate::foundation::math::{color_to_array, Vec2, Vec4};

/// Glyphs addressable by one parameter block
pub const MAX_GLYPHS_PER_CALL: usize = 510;

/// Bytes per glyph offset slot (std140 `vec4` array stride)
pub const OFFSET_SLOT_STRIDE: u64 = 16;

/// Size of one parameter block
pub const PARAMETER_BLOCK_SIZE: u64 = 8192;

/// Byte offset of the scale `vec4` within a block
pub const SCALE_SLOT_OFFSET: u64 = MAX_GLYPHS_PER_CALL as u64 * OFFSET_SLOT_STRIDE;

/// Byte offset of the color `vec4` within a block
pub const COLOR_SLOT_OFFSET: u64 = SCALE_SLOT_OFFSET + 16;

/// Parameter store size of the stock configuration (120 blocks)
pub const DEFAULT_PARAMETER_STORE_SIZE: u64 = 120 * PARAMETER_BLOCK_SIZE;

/// One parameter block handed out by the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingWindow {
    /// Slot index, also the index of the descriptor set bound to this block
    pub slot: u32,
    /// Byte offset of the block within the store
    pub byte_offset: u64,
    /// Size of the block in bytes
    pub byte_size: u64,
}

/// Round-robin allocator over a parameter store
#[derive(Debug, Clone)]
pub struct UniformRing {
    slot_count: u32,
    next: u32,
}

impl UniformRing {
    /// Create a ring over a store of `store_size` bytes
    ///
    /// Trailing bytes that do not form a whole block are left unused.
    pub fn new(store_size: u64) -> OverlayResult<Self> {
        let slots = store_size / PARAMETER_BLOCK_SIZE;
        if slots == 0 {
            return Err(OverlayError::InvalidConfig(format!(
                "Parameter store of {} bytes cannot hold a {}-byte block",
                store_size, PARAMETER_BLOCK_SIZE
            )));
        }
        let slot_count = u32::try_from(slots)
            .map_err(|_| OverlayError::InvalidConfig(format!("{} parameter blocks exceed the slot index range", slots)))?;

        Ok(Self { slot_count, next: 0 })
    }

    /// Number of blocks in the ring
    pub fn capacity(&self) -> u32 {
        self.slot_count
    }

    /// Hand out the next block
    pub fn acquire_window(&mut self) -> RingWindow {
        let slot = self.next;
        self.next += 1;
        if self.next == self.slot_count {
            log::debug!("[OVERLAY] Parameter ring wrapped after {} blocks", self.slot_count);
            self.next = 0;
        }

        RingWindow {
            slot,
            byte_offset: u64::from(slot) * PARAMETER_BLOCK_SIZE,
            byte_size: PARAMETER_BLOCK_SIZE,
        }
    }
}

/// Byte-addressable storage backing the parameter ring
pub trait ParameterStore {
    /// Total size in bytes
    fn capacity(&self) -> u64;

    /// Copy `bytes` into the store starting at `offset`
    fn write_bytes(&mut self, offset: u64, bytes: &[u8]) -> OverlayResult<()>;
}

/// Checks that a write of `len` bytes at `offset` stays within `capacity`
pub(crate) fn check_bounds(offset: u64, len: usize, capacity: u64) -> OverlayResult<()> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(OverlayError::StoreOutOfBounds { offset, len, capacity }),
    }
}

impl ParameterStore for Vec<u8> {
    fn capacity(&self) -> u64 {
        self.len() as u64
    }

    fn write_bytes(&mut self, offset: u64, bytes: &[u8]) -> OverlayResult<()> {
        check_bounds(offset, bytes.len(), self.len() as u64)?;
        let start = offset as usize;
        self[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct OffsetSlot {
    offset: [f32; 2],
    _padding: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct BlockTrailer {
    scale: [f32; 2],
    _padding: [f32; 2],
    color: [f32; 4],
}

/// Encode one call's parameters into `window`
///
/// Only the first `offsets.len()` slots and the trailer are written. Slots past
/// the glyph count keep whatever an earlier call left there; no draw reads
/// them.
///
/// # Panics
///
/// Panics when `offsets` holds more than [`MAX_GLYPHS_PER_CALL`] entries.
/// Callers reject such text before reaching the encoder.
pub fn write_parameters(
    store: &mut dyn ParameterStore,
    window: RingWindow,
    offsets: &[Vec2],
    scale: Vec2,
    color: &Vec4,
) -> OverlayResult<()> {
    assert!(
        offsets.len() <= MAX_GLYPHS_PER_CALL,
        "{} glyph offsets exceed a parameter block",
        offsets.len()
    );

    let slots: Vec<OffsetSlot> = offsets
        .iter()
        .map(|offset| OffsetSlot { offset: [offset.x, offset.y], _padding: [0.0; 2] })
        .collect();
    if !slots.is_empty() {
        store.write_bytes(window.byte_offset, bytemuck::cast_slice(&slots))?;
    }

    let trailer = BlockTrailer {
        scale: [scale.x, scale.y],
        _padding: [0.0; 2],
        color: color_to_array(color),
    };
    store.write_bytes(window.byte_offset + SCALE_SLOT_OFFSET, bytemuck::bytes_of(&trailer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_f32(store: &[u8], offset: u64) -> f32 {
        let start = offset as usize;
        f32::from_le_bytes([store[start], store[start + 1], store[start + 2], store[start + 3]])
    }

    #[test]
    fn test_block_layout_constants() {
        assert_eq!(SCALE_SLOT_OFFSET, 8160);
        assert_eq!(COLOR_SLOT_OFFSET, 8176);
        assert_eq!(COLOR_SLOT_OFFSET + 16, PARAMETER_BLOCK_SIZE);
        assert_eq!(std::mem::size_of::<OffsetSlot>() as u64, OFFSET_SLOT_STRIDE);
        assert_eq!(std::mem::size_of::<BlockTrailer>(), 32);
    }

    #[test]
    fn test_ring_rejects_undersized_store() {
        assert!(UniformRing::new(PARAMETER_BLOCK_SIZE - 1).is_err());
        assert_eq!(UniformRing::new(PARAMETER_BLOCK_SIZE * 2 + 100).unwrap().capacity(), 2);
    }

    #[test]
    fn test_ring_wraps_after_capacity() {
        let mut ring = UniformRing::new(DEFAULT_PARAMETER_STORE_SIZE).unwrap();
        assert_eq!(ring.capacity(), 120);

        let windows: Vec<RingWindow> = (0..121).map(|_| ring.acquire_window()).collect();
        for (i, window) in windows.iter().take(120).enumerate() {
            assert_eq!(window.slot, i as u32);
            assert_eq!(window.byte_offset, i as u64 * PARAMETER_BLOCK_SIZE);
            assert_eq!(window.byte_size, PARAMETER_BLOCK_SIZE);
        }
        assert_eq!(windows[120], windows[0]);
    }

    #[test]
    fn test_single_slot_ring_reuses_block() {
        let mut ring = UniformRing::new(PARAMETER_BLOCK_SIZE).unwrap();
        let first = ring.acquire_window();
        let second = ring.acquire_window();
        assert_eq!(first, second);
        assert_eq!(first.byte_offset, 0);
    }

    #[test]
    fn test_encoder_byte_layout() {
        let mut store = vec![0u8; (PARAMETER_BLOCK_SIZE * 2) as usize];
        let mut ring = UniformRing::new(ParameterStore::capacity(&store)).unwrap();
        ring.acquire_window();
        let window = ring.acquire_window();

        let offsets = [Vec2::new(-0.5, 0.25), Vec2::new(0.75, -1.0)];
        let color = Vec4::new(0.1, 0.2, 0.3, 0.4);
        write_parameters(&mut store, window, &offsets, Vec2::new(0.0025, -0.005), &color).unwrap();

        let base = window.byte_offset;
        assert_eq!(read_f32(&store, base), -0.5);
        assert_eq!(read_f32(&store, base + 4), 0.25);
        assert_eq!(read_f32(&store, base + 16), 0.75);
        assert_eq!(read_f32(&store, base + 20), -1.0);
        assert_eq!(read_f32(&store, base + SCALE_SLOT_OFFSET), 0.0025);
        assert_eq!(read_f32(&store, base + SCALE_SLOT_OFFSET + 4), -0.005);
        assert_eq!(read_f32(&store, base + COLOR_SLOT_OFFSET), 0.1);
        assert_eq!(read_f32(&store, base + COLOR_SLOT_OFFSET + 12), 0.4);

        // The first block was acquired but never written
        assert!(store[..PARAMETER_BLOCK_SIZE as usize].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unused_slots_keep_stale_data() {
        let mut store = vec![0xAAu8; PARAMETER_BLOCK_SIZE as usize];
        let mut ring = UniformRing::new(ParameterStore::capacity(&store)).unwrap();
        let window = ring.acquire_window();

        write_parameters(&mut store, window, &[Vec2::new(1.0, 2.0)], Vec2::new(1.0, 1.0), &Vec4::new(1.0, 1.0, 1.0, 1.0))
            .unwrap();

        assert_eq!(read_f32(&store, 0), 1.0);
        assert!(store[16..SCALE_SLOT_OFFSET as usize].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_empty_offsets_write_trailer_only() {
        let mut store = vec![0u8; PARAMETER_BLOCK_SIZE as usize];
        let window = UniformRing::new(ParameterStore::capacity(&store)).unwrap().acquire_window();

        write_parameters(&mut store, window, &[], Vec2::new(2.0, 3.0), &Vec4::new(0.0, 0.0, 0.0, 1.0)).unwrap();

        assert!(store[..SCALE_SLOT_OFFSET as usize].iter().all(|&b| b == 0));
        assert_eq!(read_f32(&store, SCALE_SLOT_OFFSET + 4), 3.0);
    }

    #[test]
    fn test_vec_store_bounds() {
        let mut store = vec![0u8; 8];
        assert!(store.write_bytes(4, &[1, 2, 3, 4]).is_ok());
        assert!(matches!(
            store.write_bytes(6, &[1, 2, 3]),
            Err(OverlayError::StoreOutOfBounds { offset: 6, len: 3, capacity: 8 })
        ));
        assert!(store.write_bytes(u64::MAX, &[1]).is_err());
    }

    #[test]
    fn test_full_block_fits() {
        let mut store = vec![0u8; PARAMETER_BLOCK_SIZE as usize];
        let window = UniformRing::new(ParameterStore::capacity(&store)).unwrap().acquire_window();
        let offsets = vec![Vec2::new(0.5, 0.5); MAX_GLYPHS_PER_CALL];

        write_parameters(&mut store, window, &offsets, Vec2::new(1.0, 1.0), &Vec4::new(1.0, 1.0, 1.0, 1.0)).unwrap();
        assert_eq!(read_f32(&store, (MAX_GLYPHS_PER_CALL as u64 - 1) * OFFSET_SLOT_STRIDE), 0.5);
    }

    #[test]
    #[should_panic(expected = "exceed a parameter block")]
    fn test_encoder_panics_past_block_capacity() {
        let mut store = vec![0u8; PARAMETER_BLOCK_SIZE as usize];
        let window = UniformRing::new(ParameterStore::capacity(&store)).unwrap().acquire_window();
        let offsets = vec![Vec2::new(0.0, 0.0); MAX_GLYPHS_PER_CALL + 1];

        let _ = write_parameters(&mut store, window, &offsets, Vec2::new(1.0, 1.0), &Vec4::new(1.0, 1.0, 1.0, 1.0));
    }
}
