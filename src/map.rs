//! Terrain grid.
//!
//! A fixed-size chunk of map cells with bounds-checked lookup. This is the
//! canonical consumer of the dispatch core: key handlers mutate a position
//! on the grid, the application tick loop draws it through [`Screen`].
//! The grid itself has no concurrency and no events.

use crossterm::style::Color;

use crate::screen::{Cell, Screen};

pub const MAP_WIDTH: i32 = 256;
pub const MAP_HEIGHT: i32 = 256;

/// Land feature classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainKind {
    Empty,
    /// Cannot pass or see through
    Wall,
    /// Passable and visible
    Floor,
}

/// One map location.
#[derive(Clone, Copy, Debug)]
pub struct Terrain {
    pub glyph: Cell,
    pub kind: TerrainKind,
    pub edge: bool,
    pub seen: bool,
    pub lit: bool,
}

impl Terrain {
    pub fn empty() -> Self {
        Self {
            glyph: Cell::new(' '),
            kind: TerrainKind::Empty,
            edge: false,
            seen: false,
            lit: true,
        }
    }

    pub fn wall() -> Self {
        Self {
            glyph: Cell::new('#'),
            kind: TerrainKind::Wall,
            edge: false,
            seen: false,
            lit: true,
        }
    }

    pub fn floor() -> Self {
        Self {
            glyph: Cell::with_fg('.', Color::White),
            kind: TerrainKind::Floor,
            edge: false,
            seen: false,
            lit: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == TerrainKind::Empty
    }

    pub fn is_wall(&self) -> bool {
        self.kind == TerrainKind::Wall
    }

    pub fn is_floor(&self) -> bool {
        self.kind == TerrainKind::Floor
    }
}

/// Terrain for a map glyph, if the glyph is known.
pub fn terrain_for_glyph(glyph: char) -> Option<Terrain> {
    match glyph {
        ' ' => Some(Terrain::empty()),
        '#' => Some(Terrain::wall()),
        '.' => Some(Terrain::floor()),
        _ => None,
    }
}

/// A fixed-size block of terrain.
pub struct MapChunk {
    locations: Vec<Vec<Terrain>>,
}

impl Default for MapChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl MapChunk {
    /// A chunk filled with floor.
    pub fn new() -> Self {
        let column = vec![Terrain::floor(); MAP_HEIGHT as usize];
        Self {
            locations: vec![column; MAP_WIDTH as usize],
        }
    }

    /// Whether (x, y) lies inside the chunk.
    pub fn has_cell(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < MAP_WIDTH && y < MAP_HEIGHT
    }

    /// Terrain at (x, y); `None` when out of range.
    pub fn terrain_at(&self, x: i32, y: i32) -> Option<&Terrain> {
        if !self.has_cell(x, y) {
            return None;
        }
        Some(&self.locations[x as usize][y as usize])
    }

    /// Replace the terrain at (x, y). Returns false when out of range.
    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: Terrain) -> bool {
        if !self.has_cell(x, y) {
            return false;
        }
        self.locations[x as usize][y as usize] = terrain;
        true
    }

    /// Whether a unit can stand on (x, y).
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.terrain_at(x, y).is_some_and(|t| !t.is_wall())
    }

    /// Draw the top-left corner of the chunk, clipped to (cols, rows).
    pub fn draw(&self, screen: &mut Screen, cols: u16, rows: u16) {
        for x in 0..cols.min(MAP_WIDTH as u16) {
            for y in 0..rows.min(MAP_HEIGHT as u16) {
                if let Some(terrain) = self.terrain_at(x as i32, y as i32) {
                    screen.set_cell(x, y, terrain.glyph);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table() {
        assert_eq!(terrain_for_glyph('#').map(|t| t.kind), Some(TerrainKind::Wall));
        assert_eq!(terrain_for_glyph('.').map(|t| t.kind), Some(TerrainKind::Floor));
        assert_eq!(terrain_for_glyph(' ').map(|t| t.kind), Some(TerrainKind::Empty));
        assert!(terrain_for_glyph('@').is_none());
    }

    #[test]
    fn test_new_chunk_is_floor() {
        let chunk = MapChunk::new();
        assert!(chunk.terrain_at(0, 0).is_some_and(Terrain::is_floor));
        assert!(chunk
            .terrain_at(MAP_WIDTH - 1, MAP_HEIGHT - 1)
            .is_some_and(Terrain::is_floor));
    }

    #[test]
    fn test_bounds_checked_lookup() {
        let chunk = MapChunk::new();
        assert!(!chunk.has_cell(-1, 0));
        assert!(!chunk.has_cell(0, -1));
        assert!(!chunk.has_cell(MAP_WIDTH, 0));
        assert!(chunk.terrain_at(0, MAP_HEIGHT).is_none());
    }

    #[test]
    fn test_walls_block_passage() {
        let mut chunk = MapChunk::new();
        assert!(chunk.is_passable(3, 3));
        assert!(chunk.set_terrain(3, 3, Terrain::wall()));
        assert!(!chunk.is_passable(3, 3));
        // Out of range is never passable, and never a panic.
        assert!(!chunk.is_passable(-5, 5));
        assert!(!chunk.set_terrain(MAP_WIDTH, 0, Terrain::wall()));
    }
}
