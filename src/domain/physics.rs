/// Collision layer: the single source of truth for "does this box hit
/// something".
///
/// ## Architecture
///
/// Two distinct queries:
///   1. TERRAIN: which tile a candidate box runs into (`Terrain::collide_with`)
///   2. OVERLAP: whether two actor boxes intersect (`Bounds::overlaps`)
///
/// Terrain is owned by the level and never changes after construction, so
/// actor updates borrow it immutably while the level mutates its actors.
///
/// ## Boundary policy
///
///   - Left, right or top edge outside the grid → Wall (hard boundary)
///   - Bottom edge below the grid              → Lava (falling out is fatal)
///   - Otherwise: first non-Space tile the box covers, in row-major order
use super::tile::Tile;
use super::vector::Vector;
use crate::error::LevelError;

// ══════════════════════════════════════════════════════════════
// Layer 1: Terrain
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Terrain {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Terrain {
    /// Build terrain from `height` rows of `width` tiles.
    pub fn new(tiles: Vec<Vec<Tile>>) -> Result<Self, LevelError> {
        let width = match tiles.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(LevelError::EmptyPlan),
        };
        if let Some((row, found)) = tiles
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(LevelError::RaggedRow { row, expected: width, found });
        }
        Ok(Terrain { width, height: tiles.len(), tiles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    /// Tile at column `x`, row `y`; `None` outside the grid.
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> Option<Tile> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Which terrain does the box at `position` (top-left) with extents
    /// `size` run into? `None` means open space only. A negative extent
    /// spans backwards from `position`.
    pub fn collide_with(&self, position: Vector, size: Vector) -> Option<Tile> {
        let (left, right) = span(position.x, size.x);
        let (top, bottom) = span(position.y, size.y);

        // Written as "inside" tests so a NaN coordinate fails them too.
        let inside_sides = left >= 0.0 && right <= self.width as f64 && top >= 0.0;
        if !inside_sides {
            return Some(Tile::Wall);
        }
        let above_floor = bottom <= self.height as f64;
        if !above_floor {
            return Some(Tile::Lava);
        }

        // In range: 0 <= left, right <= width, 0 <= top, bottom <= height.
        let (x_start, x_end) = (left.floor() as usize, right.ceil() as usize);
        let (y_start, y_end) = (top.floor() as usize, bottom.ceil() as usize);

        for row in &self.tiles[y_start..y_end] {
            for &tile in &row[x_start..x_end] {
                if tile.is_blocking() {
                    return Some(tile);
                }
            }
        }
        None
    }
}

/// `(low, high)` edges of an extent. NaN passes through unordered so the
/// boundary tests still reject it.
fn span(start: f64, extent: f64) -> (f64, f64) {
    if extent < 0.0 {
        (start + extent, start)
    } else {
        (start, start + extent)
    }
}

// ══════════════════════════════════════════════════════════════
// Layer 2: Overlap (actor vs actor)
// ══════════════════════════════════════════════════════════════

/// Axis-aligned bounding box: top-left corner + extents.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub position: Vector,
    pub size: Vector,
}

impl Bounds {
    pub fn new(position: Vector, size: Vector) -> Self {
        Bounds { position, size }
    }

    pub fn left(&self) -> f64 {
        self.position.x
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f64 {
        self.position.y
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.y
    }

    /// Open-interval intersection on both axes: boxes that only share an
    /// edge do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain_from(rows: &[&str]) -> Terrain {
        let tiles = rows
            .iter()
            .map(|row| row.chars().map(|c| Tile::from_symbol(c).unwrap_or(Tile::Space)).collect())
            .collect();
        Terrain::new(tiles).unwrap()
    }

    fn unit() -> Vector {
        Vector::new(1.0, 1.0)
    }

    // ── construction ──

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(Terrain::new(vec![]), Err(LevelError::EmptyPlan)));
        assert!(matches!(Terrain::new(vec![vec![]]), Err(LevelError::EmptyPlan)));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let tiles = vec![vec![Tile::Space; 3], vec![Tile::Space; 2]];
        match Terrain::new(tiles) {
            Err(LevelError::RaggedRow { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 3, 2));
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    // ── collide_with: boundary policy ──

    #[test]
    fn left_of_grid_is_wall() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(-0.1, 0.0), unit()), Some(Tile::Wall));
    }

    #[test]
    fn right_of_grid_is_wall() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(2.1, 0.0), unit()), Some(Tile::Wall));
    }

    #[test]
    fn above_grid_is_wall() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(1.0, -0.5), unit()), Some(Tile::Wall));
    }

    #[test]
    fn below_grid_is_lava() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(1.0, 1.5), unit()), Some(Tile::Lava));
    }

    #[test]
    fn side_wall_wins_over_bottom_lava() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(-1.0, 1.5), unit()), Some(Tile::Wall));
    }

    #[test]
    fn flush_with_edges_is_inside() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(2.0, 1.0), unit()), None);
        assert_eq!(t.collide_with(Vector::ZERO, Vector::new(3.0, 2.0)), None);
    }

    #[test]
    fn nan_position_hits_the_boundary() {
        let t = terrain_from(&["   ", "   "]);
        assert_eq!(t.collide_with(Vector::new(f64::NAN, 0.0), unit()), Some(Tile::Wall));
        assert_eq!(t.collide_with(Vector::new(0.0, f64::NAN), unit()), Some(Tile::Wall));
    }

    #[test]
    fn negative_extent_spans_backwards() {
        let t = terrain_from(&["x  ", "   "]);
        // 2.5 back to 0.5 covers columns 0..3 and finds the wall at column 0.
        assert_eq!(t.collide_with(Vector::new(2.5, 0.0), Vector::new(-2.0, 1.0)), Some(Tile::Wall));
        assert_eq!(t.collide_with(Vector::new(2.5, 2.0), Vector::new(-1.0, -1.0)), None);
        assert_eq!(t.collide_with(Vector::new(0.5, 0.0), Vector::new(-1.0, 1.0)), Some(Tile::Wall));
    }

    // ── collide_with: tile scan ──

    #[test]
    fn open_space_is_none() {
        let t = terrain_from(&["x x", "x x", "xxx"]);
        assert_eq!(t.collide_with(Vector::new(1.0, 0.0), Vector::new(1.0, 2.0)), None);
    }

    #[test]
    fn box_straddling_cells_sees_neighbour_wall() {
        let t = terrain_from(&["x x", "x x", "xxx"]);
        // 1.0..2.0 wide is fine, 1.0..2.2 reaches column 2.
        assert_eq!(t.collide_with(Vector::new(1.0, 0.0), Vector::new(1.0, 1.0)), None);
        assert_eq!(t.collide_with(Vector::new(1.2, 0.0), Vector::new(1.0, 1.0)), Some(Tile::Wall));
    }

    #[test]
    fn fractional_box_sinking_into_floor() {
        let t = terrain_from(&["x x", "x x", "xxx"]);
        assert_eq!(t.collide_with(Vector::new(1.0, 0.9), Vector::new(0.7, 1.2)), Some(Tile::Wall));
    }

    #[test]
    fn lava_tile_reported() {
        let t = terrain_from(&["   ", " ! "]);
        assert_eq!(t.collide_with(Vector::new(0.5, 0.5), unit()), Some(Tile::Lava));
    }

    #[test]
    fn first_blocking_tile_in_row_major_order() {
        // Row 0 holds lava at column 1, row 1 holds wall at column 0.
        let t = terrain_from(&[" ! ", "x  "]);
        assert_eq!(t.collide_with(Vector::new(0.0, 0.0), Vector::new(2.0, 2.0)), Some(Tile::Lava));
    }

    #[test]
    fn inside_solid_block_is_wall() {
        let t = terrain_from(&["xxx", "xxx", "xxx"]);
        assert_eq!(t.collide_with(Vector::new(0.5, 0.5), Vector::new(2.0, 2.0)), Some(Tile::Wall));
    }

    // ── overlap ──

    #[test]
    fn overlapping_boxes() {
        let a = Bounds::new(Vector::new(0.0, 0.0), unit());
        let b = Bounds::new(Vector::new(0.5, 0.5), unit());
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Bounds::new(Vector::new(0.0, 0.0), unit());
        let right = Bounds::new(Vector::new(1.0, 0.0), unit());
        let below = Bounds::new(Vector::new(0.0, 1.0), unit());
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn separated_on_one_axis_is_enough() {
        let a = Bounds::new(Vector::new(0.0, 0.0), unit());
        let b = Bounds::new(Vector::new(0.5, 3.0), unit());
        assert!(!a.overlaps(&b));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn bounds() -> impl Strategy<Value = Bounds> {
            (-5.0f64..10.0, -5.0f64..10.0, 0.1f64..3.0, 0.1f64..3.0)
                .prop_map(|(x, y, w, h)| Bounds::new(Vector::new(x, y), Vector::new(w, h)))
        }

        proptest! {
            #[test]
            fn overlap_is_symmetric(a in bounds(), b in bounds()) {
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn box_past_a_side_is_wall(
                x in -3.0f64..-0.001,
                y in -3.0f64..5.0,
                w in 0.1f64..2.0,
                h in 0.1f64..2.0,
            ) {
                let t = terrain_from(&["    ", "    ", "    "]);
                prop_assert_eq!(t.collide_with(Vector::new(x, y), Vector::new(w, h)), Some(Tile::Wall));
                // Mirror on the right edge.
                let rx = 4.0 - w - x;
                prop_assert_eq!(t.collide_with(Vector::new(rx, y), Vector::new(w, h)), Some(Tile::Wall));
            }

            #[test]
            fn box_above_top_is_wall(x in 0.0f64..2.0, y in -3.0f64..-0.001) {
                let t = terrain_from(&["    ", "    ", "    "]);
                prop_assert_eq!(t.collide_with(Vector::new(x, y), Vector::new(1.0, 1.0)), Some(Tile::Wall));
            }

            #[test]
            fn box_past_bottom_is_lava(x in 0.0f64..3.0, y in 2.001f64..6.0) {
                let t = terrain_from(&["xxxx", "xxxx", "xxxx"]);
                prop_assert_eq!(t.collide_with(Vector::new(x, y), Vector::new(1.0, 1.0)), Some(Tile::Lava));
            }

            #[test]
            fn box_inside_walls_is_never_none(x in 0.0f64..2.0, y in 0.0f64..1.0) {
                let t = terrain_from(&["xxxx", "xxxx", "xxxx"]);
                prop_assert_eq!(t.collide_with(Vector::new(x, y), Vector::new(1.5, 1.5)), Some(Tile::Wall));
            }
        }
    }
}
