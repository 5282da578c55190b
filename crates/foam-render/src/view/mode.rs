use anyhow::{bail, Result};

/// How the mesh is drawn.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Representation {
    /// Triangle outlines only.
    Wireframe = 0,
    /// Filled triangles.
    #[default]
    Surface = 1,
    /// Filled triangles with a translucent outline overlay.
    SurfaceWithEdges = 2,
}

impl Representation {
    pub fn draws_surface(self) -> bool {
        matches!(self, Self::Surface | Self::SurfaceWithEdges)
    }

    pub fn draws_edges(self) -> bool {
        matches!(self, Self::Wireframe | Self::SurfaceWithEdges)
    }
}

impl TryFrom<i32> for Representation {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Self::Wireframe,
            1 => Self::Surface,
            2 => Self::SurfaceWithEdges,
            other => bail!("unknown representation {other}"),
        })
    }
}

/// Whether scalar data is colored per cell or per vertex.
///
/// Only per-vertex coloring is wired into drawing; the value is stored for
/// callers that switch between the two.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DataMode {
    Cell = 0,
    #[default]
    Point = 1,
}

impl TryFrom<i32> for DataMode {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Self::Cell,
            1 => Self::Point,
            other => bail!("unknown data mode {other}"),
        })
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DisplayMode {
    pub representation: Representation,
    pub data_mode: DataMode,
}

impl DisplayMode {
    pub fn new(representation: Representation, data_mode: DataMode) -> Self {
        Self {
            representation,
            data_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_values() {
        assert_eq!(Representation::try_from(0).unwrap(), Representation::Wireframe);
        assert_eq!(Representation::try_from(2).unwrap(), Representation::SurfaceWithEdges);
        assert_eq!(DataMode::try_from(0).unwrap(), DataMode::Cell);
        assert_eq!(DataMode::try_from(1).unwrap(), DataMode::Point);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Representation::try_from(3).is_err());
        assert!(Representation::try_from(-1).is_err());
        assert!(DataMode::try_from(2).is_err());
    }

    #[test]
    fn pass_selection() {
        assert!(!Representation::Wireframe.draws_surface());
        assert!(Representation::Wireframe.draws_edges());
        assert!(Representation::Surface.draws_surface());
        assert!(!Representation::Surface.draws_edges());
        assert!(Representation::SurfaceWithEdges.draws_surface());
        assert!(Representation::SurfaceWithEdges.draws_edges());
    }

    #[test]
    fn defaults_match_startup_mode() {
        let m = DisplayMode::default();
        assert_eq!(m.representation, Representation::Surface);
        assert_eq!(m.data_mode, DataMode::Point);
    }
}
