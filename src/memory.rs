//! Kernel heap and boot memory map report.
//!
//! The heap is a [`LockedHeap`] block allocator over a static buffer.
use bootloader_api::info::MemoryRegionKind;
use bootloader_api::BootInfo;
use core::ptr;
use gfx::allocators::LockedHeap;

/// Enough for a 1024x768x32 canvas plus the scene.
const HEAP_SIZE: usize = 16 * 1024 * 1024;

#[repr(align(4096))]
struct HeapBuffer([u8; HEAP_SIZE]);

static mut HEAP_BUFFER: HeapBuffer = HeapBuffer([0; HEAP_SIZE]);

#[global_allocator]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

pub fn init_heap() -> Result<(), &'static str> {
    // SAFETY: the buffer is only ever handed to the allocator, once.
    let heap_start = unsafe { ptr::addr_of_mut!(HEAP_BUFFER) } as usize;
    log::info!(
        "heap: {:#x} - {:#x} ({} KiB)",
        heap_start,
        heap_start + HEAP_SIZE,
        HEAP_SIZE / 1024
    );
    // SAFETY: see above; no allocation has happened yet.
    unsafe { ALLOCATOR.init(heap_start, HEAP_SIZE) }
}

pub fn heap_used() -> usize {
    ALLOCATOR.claimed()
}

pub fn memory_stats(boot_info: &BootInfo) {
    let mut usable = 0u64;
    let mut reserved = 0u64;

    for region in boot_info.memory_regions.iter() {
        let size = region.end - region.start;
        let kind = match region.kind {
            MemoryRegionKind::Usable => {
                usable += size;
                "Usable"
            }
            MemoryRegionKind::Bootloader => "Bootloader",
            MemoryRegionKind::UnknownBios(_) => "BIOS",
            MemoryRegionKind::UnknownUefi(_) => "UEFI",
            _ => "Reserved",
        };
        if region.kind != MemoryRegionKind::Usable {
            reserved += size;
        }
        log::debug!(
            "  {:#018x} - {:#018x} ({:>8} KiB) [{}]",
            region.start,
            region.end,
            size / 1024,
            kind
        );
    }

    log::info!(
        "memory: {} MiB usable, {} MiB reserved",
        usable / (1024 * 1024),
        reserved / (1024 * 1024)
    );
}
