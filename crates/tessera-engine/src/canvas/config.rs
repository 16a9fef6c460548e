use super::MapMode;

/// Construction-time canvas settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Projection policy applied right after construction.
    pub map_mode: MapMode,

    /// Vertices per draw call shared by all batchers (see `batch::BatchBuffer`).
    pub batch_capacity: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            map_mode: MapMode::UpperLeft2d,
            batch_capacity: 4096,
        }
    }
}
