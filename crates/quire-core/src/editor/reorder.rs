//! Drag-and-drop reordering.

use crate::error::EditorError;

/// Capability interface for a drag gesture over an ordered list.
pub trait DragDrop {
    /// A drag started on the row at `source`.
    fn begin_drag(&mut self, source: usize) -> Result<(), EditorError>;

    /// The pointer is over `target`, or over no valid target.
    fn drag_over(&mut self, target: Option<usize>);

    /// The row was released. Returns whether the order changed.
    fn drop(&mut self, source: usize, target: Option<usize>) -> Result<bool, EditorError>;
}

/// Transient drag state held by an editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub source: Option<usize>,
    pub over: Option<usize>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    pub fn clear(&mut self) {
        *self = DragState::default();
    }
}

/// Move the element at `from` to `to` by remove-then-insert.
///
/// A `None` target leaves the order untouched. Returns whether anything moved.
pub fn move_item<T>(
    items: &mut Vec<T>,
    from: usize,
    to: Option<usize>,
) -> Result<bool, EditorError> {
    let len = items.len();
    if from >= len {
        return Err(EditorError::IndexOutOfRange { index: from, len });
    }

    let Some(to) = to else {
        return Ok(false);
    };

    if to >= len {
        return Err(EditorError::IndexOutOfRange { index: to, len });
    }
    if from == to {
        return Ok(false);
    }

    let item = items.remove(from);
    items.insert(to, item);
    Ok(true)
}
