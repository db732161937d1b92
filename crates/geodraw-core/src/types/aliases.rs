//! Type aliases for shared single-threaded state.
//!
//! The editing engine is single-threaded: a shape is owned by the shape
//! collection and borrowed by whichever editor is attached to it. These
//! aliases give that ownership pattern a name.

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// # Example
/// ```rust,ignore
/// let model: Shared<ShapeModel> = shared(ShapeModel::new(id, geometry));
/// model.borrow_mut().mark_edited();
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
