use super::node::Point;
use super::port::PortRef;

/// State of the interactive "drag to connect" gesture.
///
/// `Idle -> Dragging -> Idle`; finishing either finalizes a connection or
/// cancels, both return to `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// The port the gesture started on. May be an input; ends are
        /// swapped when the connection is finalized.
        origin: PortRef,
        cursor: Point,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn origin(&self) -> Option<&PortRef> {
        match self {
            DragState::Dragging { origin, .. } => Some(origin),
            DragState::Idle => None,
        }
    }

    pub fn cursor(&self) -> Option<Point> {
        match self {
            DragState::Dragging { cursor, .. } => Some(*cursor),
            DragState::Idle => None,
        }
    }
}
