use crate::geometry::Vec3;

/// Which of the two parallel note planes a cell position is resolved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOrigin {
    /// The spawn plane
    Source,
    /// The hit plane in front of the player
    Target,
}

/// The stage grid collaborator.
///
/// Owned and laid out by the stage setup outside this crate; the scheduler
/// only resolves cell coordinates to positions and reads the travel
/// distance between the planes. The layout constants are consumed by
/// upstream cell-index derivation, not by the scheduler itself.
pub trait GridLayout {
    fn cell_position(&self, origin: GridOrigin, x: i32, y: i32) -> Vec3;
    /// Distance a note travels from spawn plane to hit plane.
    fn grid_distance(&self) -> f32;
    fn total_horizontal_cells(&self) -> i32;
    fn hand_grid_size(&self) -> i32;
    fn vertical_cells(&self) -> i32;
}

/// Reference grid: two parallel planes of uniformly spaced cells, the
/// target plane `distance` further along +Z. Used by the driver binary and
/// tests.
#[derive(Debug, Clone)]
pub struct PlaneGrid {
    pub origin: Vec3,
    pub cell_size: f32,
    pub distance: f32,
    pub horizontal_cells: i32,
    pub hand_grid_size: i32,
    pub vertical_cells: i32,
}

impl Default for PlaneGrid {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            cell_size: 0.5,
            distance: 10.0,
            horizontal_cells: 8,
            hand_grid_size: 4,
            vertical_cells: 4,
        }
    }
}

impl GridLayout for PlaneGrid {
    fn cell_position(&self, origin: GridOrigin, x: i32, y: i32) -> Vec3 {
        let z = match origin {
            GridOrigin::Source => self.origin.z,
            GridOrigin::Target => self.origin.z + self.distance,
        };
        Vec3::new(
            self.origin.x + x as f32 * self.cell_size,
            self.origin.y + y as f32 * self.cell_size,
            z,
        )
    }

    fn grid_distance(&self) -> f32 {
        self.distance
    }

    fn total_horizontal_cells(&self) -> i32 {
        self.horizontal_cells
    }

    fn hand_grid_size(&self) -> i32 {
        self.hand_grid_size
    }

    fn vertical_cells(&self) -> i32 {
        self.vertical_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_are_distance_apart() {
        let grid = PlaneGrid::default();
        let source = grid.cell_position(GridOrigin::Source, 2, 1);
        let target = grid.cell_position(GridOrigin::Target, 2, 1);
        assert_eq!(source.x, target.x);
        assert_eq!(source.y, target.y);
        assert!((source.distance(target) - grid.grid_distance()).abs() < 1e-5);
    }

    #[test]
    fn cells_are_uniformly_spaced() {
        let grid = PlaneGrid::default();
        let a = grid.cell_position(GridOrigin::Source, 0, 0);
        let b = grid.cell_position(GridOrigin::Source, 1, 0);
        let c = grid.cell_position(GridOrigin::Source, 0, 3);
        assert!((b.x - a.x - grid.cell_size).abs() < 1e-5);
        assert!((c.y - a.y - 3.0 * grid.cell_size).abs() < 1e-5);
    }
}
