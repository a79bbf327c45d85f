/// An unsafe cell slice.
///
/// It can be used to acquire multiple mutable references to a slice enabling writing from multiple threads.
/// This is inherently unsafe and it is the responsibility of the caller to ensure safety.
#[derive(Copy, Clone)]
pub struct UnsafeCellSlice<'a, T>(&'a [std::cell::UnsafeCell<T>]);

unsafe impl<T: Send + Sync> Send for UnsafeCellSlice<'_, T> {}
unsafe impl<T: Send + Sync> Sync for UnsafeCellSlice<'_, T> {}

impl<'a, T: Copy> UnsafeCellSlice<'a, T> {
    /// Create a new [`UnsafeCellSlice`].
    #[must_use]
    pub fn new(slice: &'a mut [T]) -> Self {
        let ptr = slice as *mut [T] as *const [std::cell::UnsafeCell<T>];
        Self(unsafe { &*ptr })
    }

    /// Get a mutable reference to the underlying slice.
    ///
    /// # Safety
    /// This returns a mutable reference to the underlying slice despite `self` being a non-mutable reference.
    /// This is unsafe because it can be called multiple times, thus creating multiple mutable references to the same data.
    /// It is the responsibility of the caller not to write to the same slice element from more than one thread.
    #[must_use]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get(&self) -> &mut [T] {
        std::slice::from_raw_parts_mut(self.0.as_ptr().cast::<T>().cast_mut(), self.0.len())
    }
}
