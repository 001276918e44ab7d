//! Fixed-size block heap.
//!
//! Requests up to 2 KiB are rounded up to a power-of-two block and served
//! from a per-size free list. Larger requests take whole pages from a
//! first-fit list of freed runs. Both draw fresh memory from a bump region.
//! Freed memory always goes back to a list, so a steady allocate/free cycle
//! stops claiming new memory after its first round.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr;

use spin::Mutex;

const BLOCK_SIZES: &[usize] = &[16, 32, 64, 128, 256, 512, 1024, 2048];

/// Granularity of allocations above the largest block size.
pub const PAGE_SIZE: usize = 4096;

/// Header written into a freed page run.
struct FreeRun {
    size: usize,
    next: usize,
}

/// Free lists hold addresses; `0` ends a list.
pub struct BlockHeap {
    heads: [usize; BLOCK_SIZES.len()],
    runs: usize,
    start: usize,
    next: usize,
    end: usize,
}

fn align_up(addr: usize, align: usize) -> Option<usize> {
    Some(addr.checked_add(align - 1)? & !(align - 1))
}

impl BlockHeap {
    pub const fn empty() -> Self {
        Self {
            heads: [0; BLOCK_SIZES.len()],
            runs: 0,
            start: 0,
            next: 0,
            end: 0,
        }
    }

    /// Bytes handed out of the bump region so far, free-listed or not.
    pub fn claimed(&self) -> usize {
        self.next - self.start
    }

    fn list_index(layout: &Layout) -> Option<usize> {
        let required = layout.size().max(layout.align());
        BLOCK_SIZES.iter().position(|&size| size >= required)
    }

    fn run_layout(layout: &Layout) -> Option<(usize, usize)> {
        Some((
            align_up(layout.size(), PAGE_SIZE)?,
            layout.align().max(PAGE_SIZE),
        ))
    }

    fn bump(&mut self, size: usize, align: usize) -> *mut u8 {
        let Some(start) = align_up(self.next, align) else {
            return ptr::null_mut();
        };
        match start.checked_add(size) {
            Some(end) if end <= self.end => {
                self.next = end;
                start as *mut u8
            }
            _ => ptr::null_mut(),
        }
    }

    /// # Safety
    ///
    /// `init` must have been given a valid region.
    unsafe fn allocate(&mut self, layout: Layout) -> *mut u8 {
        if let Some(index) = Self::list_index(&layout) {
            let block = self.heads[index];
            if block == 0 {
                return self.bump(BLOCK_SIZES[index], BLOCK_SIZES[index]);
            }
            self.heads[index] = *(block as *const usize);
            return block as *mut u8;
        }

        let Some((size, align)) = Self::run_layout(&layout) else {
            return ptr::null_mut();
        };
        let mut link: *mut usize = &mut self.runs;
        while *link != 0 {
            let run = *link;
            let node = run as *mut FreeRun;
            if run % align == 0 && (*node).size >= size {
                let rest = (*node).size - size;
                if rest == 0 {
                    *link = (*node).next;
                } else {
                    let tail = run + size;
                    (tail as *mut FreeRun).write(FreeRun {
                        size: rest,
                        next: (*node).next,
                    });
                    *link = tail;
                }
                return run as *mut u8;
            }
            link = &mut (*node).next;
        }
        self.bump(size, align)
    }

    /// # Safety
    ///
    /// `block` must come from `allocate` on this heap with the same layout.
    unsafe fn deallocate(&mut self, block: *mut u8, layout: Layout) {
        let addr = block as usize;
        if let Some(index) = Self::list_index(&layout) {
            *(addr as *mut usize) = self.heads[index];
            self.heads[index] = addr;
            return;
        }

        let Some((size, _)) = Self::run_layout(&layout) else {
            return;
        };
        if addr + size == self.next {
            self.next = addr;
        } else {
            (addr as *mut FreeRun).write(FreeRun {
                size,
                next: self.runs,
            });
            self.runs = addr;
        }
    }
}

/// [`BlockHeap`] behind a spin lock, usable as the `#[global_allocator]`.
pub struct LockedHeap {
    inner: Mutex<BlockHeap>,
}

impl LockedHeap {
    pub const fn empty() -> Self {
        Self {
            inner: Mutex::new(BlockHeap::empty()),
        }
    }

    /// # Safety
    ///
    /// The range must be unused memory that stays valid for as long as the
    /// heap is used, and this must run before the first allocation.
    pub unsafe fn init(&self, heap_start: usize, heap_size: usize) -> Result<(), &'static str> {
        let end = heap_start
            .checked_add(heap_size)
            .ok_or("heap range overflows the address space")?;
        let mut heap = self.inner.lock();
        if heap.claimed() != 0 {
            return Err("heap already in use");
        }
        *heap = BlockHeap {
            start: heap_start,
            next: heap_start,
            end,
            ..BlockHeap::empty()
        };
        Ok(())
    }

    pub fn claimed(&self) -> usize {
        self.inner.lock().claimed()
    }
}

unsafe impl GlobalAlloc for LockedHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.inner.lock().allocate(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.lock().deallocate(ptr, layout)
    }
}
