/// Contract violations reported by canvas stack operations.
///
/// These are programming errors (unbalanced push/pop), not transient
/// conditions: callers should propagate them, never retry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// `pop_modelview` would remove the identity baseline.
    #[error("popped modelview too many times")]
    ModelviewUnderflow,

    /// `pop_cliprect` was called on an empty clip stack.
    #[error("popped cliprect too many times")]
    ClipUnderflow,
}
