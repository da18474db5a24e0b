//! Derived completion percentage of a checklist.

/// A checklist entry with a completion flag.
pub trait Checkable {
    fn is_completed(&self) -> bool;
}

impl Checkable for bool {
    fn is_completed(&self) -> bool {
        *self
    }
}

impl<T: Checkable + ?Sized> Checkable for &T {
    fn is_completed(&self) -> bool {
        (**self).is_completed()
    }
}

/// `round(100 * completed / total)`, or 0 for an empty list.
///
/// Halves round up, so 1 of 8 (12.5%) yields 13.
pub fn completion_percent<T: Checkable>(items: &[T]) -> u8 {
    let total = items.len();
    if total == 0 {
        return 0;
    }
    let completed = items.iter().filter(|i| i.is_completed()).count();
    // (200c + t) / 2t == floor(100c/t + 1/2)
    ((200 * completed + total) / (2 * total)) as u8
}
