use {
    std::{
        alloc::{alloc, dealloc, handle_alloc_error, Layout},
        marker::PhantomData,
        mem,
        ptr::{self, copy, copy_nonoverlapping, read, write, NonNull},
        slice,
    },
};

/// A fixed number of uninitialised slots for `T` on the heap.
///
/// The block doesn't know which of its slots hold a value, the owner keeps track of
/// that. Dropping an `Array<T>` releases the memory without dropping any element.
pub struct Array<T> {
    ptr: NonNull<T>,
    size: usize,
    _owns: PhantomData<T>,
}

impl<T> Array<T> {
    // Public methods

    /// Allocates a block with room for `size` values
    pub fn new(size: usize) -> Self {
        let layout = Self::layout_for_size(size);
        let ptr = if layout.size() == 0 {
            // zero sized types and empty blocks never touch the allocator
            NonNull::dangling()
        } else {
            // SAFETY: layout has a non-zero size
            let raw = unsafe { alloc(layout) } as *mut T;
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => handle_alloc_error(layout),
            }
        };
        Array {
            ptr,
            size,
            _owns: PhantomData,
        }
    }

    /// Number of slots in the block
    pub fn size(&self) -> usize {
        self.size
    }

    /// Moves the value out of slot `index`, leaving the slot uninitialised.
    ///
    /// # Safety
    /// `index < size` and the slot must hold a value.
    pub unsafe fn read(&self, index: usize) -> T {
        read(self.as_raw_ptr().add(index))
    }

    /// Writes `value` to slot `index` without dropping whatever was there.
    ///
    /// # Safety
    /// `index < size`. A value already in the slot is leaked.
    pub unsafe fn write(&mut self, index: usize, value: T) {
        write(self.as_mut_raw_ptr().add(index), value);
    }

    /// # Safety
    /// The first `len` slots must hold values.
    pub unsafe fn slice(&self, len: usize) -> &[T] {
        slice::from_raw_parts(self.as_raw_ptr(), len)
    }

    /// # Safety
    /// The first `len` slots must hold values.
    pub unsafe fn slice_mut(&mut self, len: usize) -> &mut [T] {
        slice::from_raw_parts_mut(self.as_mut_raw_ptr(), len)
    }

    /// Moves `count` values starting at `index` by `amt` slots (negative moves left).
    /// The source and destination ranges may overlap.
    ///
    /// # Safety
    /// Both `index..index + count` and the shifted range must lie inside the block.
    pub unsafe fn shift_from(&mut self, index: usize, count: usize, amt: isize) {
        let src = self.as_mut_raw_ptr().add(index);
        copy(src, src.offset(amt), count);
    }

    /// Drops the `count` values starting at `index` in place.
    ///
    /// # Safety
    /// Every slot in the range must hold a value; they're uninitialised afterwards.
    pub unsafe fn drop_range(&mut self, index: usize, count: usize) {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
            self.as_mut_raw_ptr().add(index),
            count,
        ));
    }

    /// Moves the first `live` values into a fresh block of `new_size` slots and
    /// releases the current one.
    ///
    /// # Safety
    /// The first `live` slots must hold values and `live <= new_size`.
    pub unsafe fn resize(&mut self, new_size: usize, live: usize) {
        debug_assert!(live <= new_size && live <= self.size);
        let mut fresh = Array::new(new_size);
        copy_nonoverlapping(self.as_raw_ptr(), fresh.as_mut_raw_ptr(), live);
        // the old block only holds bitwise copies now, dropping it just frees memory
        let retired = mem::replace(self, fresh);
        drop(retired);
    }
}

// Private methods
impl<T> Array<T> {
    /// Layout for a block of `size` values of `T`
    fn layout_for_size(size: usize) -> Layout {
        match Layout::array::<T>(size) {
            Ok(layout) => layout,
            Err(_) => panic!("Array capacity overflow: {} slots", size),
        }
    }

    fn as_mut_raw_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn as_raw_ptr(&self) -> *const T {
        self.ptr.as_ptr() as *const T
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        let layout = Self::layout_for_size(self.size);
        if layout.size() != 0 {
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) }
        }
    }
}
