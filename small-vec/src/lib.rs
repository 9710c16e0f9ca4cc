use std::fmt;
use std::ops::{Deref, DerefMut};

/// A vector that stores up to N `Copy` elements inline.
///
/// Unlike a growable vector it never spills to the heap: pushing past the capacity is reported
/// as a [`CapacityError`]. This makes it a plain value type which can be copied around freely,
/// which is what index tuples (extents, coordinates, axis permutations) need.
#[derive(Clone, Copy)]
pub struct SmallVec<T: Copy + Default, const N: usize> {
    data: [T; N],
    len: usize,
}

/// Returned when an operation would grow a [`SmallVec`] beyond its inline capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityError {
    pub capacity: usize,
    pub requested: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity exceeded: requested {} elements, capacity is {}",
            self.requested, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}

impl<T: Copy + Default, const N: usize> SmallVec<T, N> {
    /// Creates a new empty SmallVec
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            len: 0,
        }
    }

    /// Creates a SmallVec with `len` copies of `value`.
    pub fn filled(value: T, len: usize) -> Result<Self, CapacityError> {
        if len > N {
            return Err(CapacityError {
                capacity: N,
                requested: len,
            });
        }

        let mut sv = Self::new();
        sv.data[..len].fill(value);
        sv.len = len;
        Ok(sv)
    }

    /// Copies the content of a slice, failing when it does not fit.
    pub fn try_from_slice(items: &[T]) -> Result<Self, CapacityError> {
        if items.len() > N {
            return Err(CapacityError {
                capacity: N,
                requested: items.len(),
            });
        }

        let mut sv = Self::new();
        sv.data[..items.len()].copy_from_slice(items);
        sv.len = items.len();
        Ok(sv)
    }

    /// Returns the number of elements in the SmallVec
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the SmallVec is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the SmallVec
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Adds an element to the end of the SmallVec
    pub fn push(&mut self, value: T) -> Result<(), CapacityError> {
        if self.len == N {
            return Err(CapacityError {
                capacity: N,
                requested: N + 1,
            });
        }

        self.data[self.len] = value;
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the last element, or None if empty
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        Some(self.data[self.len])
    }

    /// Returns a reference to the element at the given index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a mutable reference to the element at the given index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Clears the SmallVec, removing all elements
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Inserts an element at the given index, shifting the tail to the right.
    pub fn insert(&mut self, index: usize, element: T) -> Result<bool, CapacityError> {
        if index > self.len {
            return Ok(false);
        }

        if self.len == N {
            return Err(CapacityError {
                capacity: N,
                requested: N + 1,
            });
        }

        self.data.copy_within(index..self.len, index + 1);
        self.data[index] = element;
        self.len += 1;

        Ok(true)
    }

    /// Removes and returns the element at the given index
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let element = self.data[index];
        self.data.copy_within(index + 1..self.len, index);
        self.len -= 1;

        Some(element)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.len || b >= self.len {
            return false;
        }

        self.data.swap(a, b);
        true
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.len]
    }
}

impl<T: Copy + Default, const N: usize> Default for SmallVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> PartialEq for SmallVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Default + Eq, const N: usize> Eq for SmallVec<T, N> {}

impl<T: Copy + Default + std::hash::Hash, const N: usize> std::hash::Hash for SmallVec<T, N> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: Copy + Default + fmt::Debug, const N: usize> fmt::Debug for SmallVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy + Default, const N: usize> Deref for SmallVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Copy + Default, const N: usize> DerefMut for SmallVec<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Copy + Default, const N: usize> TryFrom<&[T]> for SmallVec<T, N> {
    type Error = CapacityError;

    fn try_from(items: &[T]) -> Result<Self, Self::Error> {
        Self::try_from_slice(items)
    }
}

impl<'a, T: Copy + Default, const N: usize> IntoIterator for &'a SmallVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

#[macro_export]
macro_rules! small_vec {
    ($($elem:expr),* $(,)?) => {
        $crate::SmallVec::try_from_slice(&[$($elem),*]).expect("small_vec! literal exceeds capacity")
    };
    ($elem:expr; $n:expr) => {
        $crate::SmallVec::filled($elem, $n).expect("small_vec! literal exceeds capacity")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_vec_basic() {
        let mut sv: SmallVec<i32, 4> = SmallVec::new();
        assert_eq!(sv.len(), 0);
        assert!(sv.is_empty());

        sv.push(1).unwrap();
        sv.push(2).unwrap();
        sv.push(3).unwrap();
        assert_eq!(sv.len(), 3);
        assert_eq!(sv[0], 1);
        assert_eq!(sv[1], 2);
        assert_eq!(sv[2], 3);
    }

    #[test]
    fn test_push_past_capacity() {
        let mut sv: SmallVec<i32, 2> = SmallVec::new();
        sv.push(1).unwrap();
        sv.push(2).unwrap();

        let err = sv.push(3).unwrap_err();
        assert_eq!(err.capacity, 2);
        assert_eq!(sv.len(), 2);
        assert_eq!(sv.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_pop() {
        let mut sv: SmallVec<i32, 4> = small_vec![1, 2];

        assert_eq!(sv.pop(), Some(2));
        assert_eq!(sv.pop(), Some(1));
        assert_eq!(sv.pop(), None);
        assert!(sv.is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let mut sv: SmallVec<i32, 4> = small_vec![1, 3];

        assert_eq!(sv.insert(1, 2), Ok(true));
        assert_eq!(sv.as_slice(), &[1, 2, 3]);
        assert_eq!(sv.insert(7, 0), Ok(false));

        assert_eq!(sv.remove(1), Some(2));
        assert_eq!(sv.as_slice(), &[1, 3]);
        assert_eq!(sv.remove(5), None);
    }

    #[test]
    fn test_try_from_slice() {
        let sv = SmallVec::<usize, 3>::try_from(&[4, 5, 6][..]).unwrap();
        assert_eq!(&*sv, &[4, 5, 6]);

        assert!(SmallVec::<usize, 3>::try_from_slice(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_copy_semantics() {
        let sv1: SmallVec<i32, 4> = small_vec![1, 2];
        let mut sv2 = sv1;
        sv2[0] = 10;

        assert_eq!(sv1.as_slice(), &[1, 2]);
        assert_eq!(sv2.as_slice(), &[10, 2]);
        assert_ne!(sv1, sv2);
    }

    #[test]
    fn test_macro_repeat() {
        let sv: SmallVec<usize, 8> = small_vec![0; 5];
        assert_eq!(sv.len(), 5);
        assert!(sv.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_swap() {
        let mut sv: SmallVec<i32, 4> = small_vec![1, 2, 3];
        assert!(sv.swap(0, 1));
        assert_eq!(sv.as_slice(), &[2, 1, 3]);
        assert!(!sv.swap(1, 4));
    }

    #[test]
    fn test_equality_ignores_unused_slots() {
        let mut sv1: SmallVec<i32, 4> = small_vec![1, 2, 3];
        sv1.pop();
        let sv2: SmallVec<i32, 4> = small_vec![1, 2];
        assert_eq!(sv1, sv2);
    }
}
