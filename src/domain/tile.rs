/// Terrain tiles and their properties.
/// Terrain is fixed once a level is built; actors (player, hazards, coins)
/// live on top of it and are not tiles.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Space,
    Wall, // Blocks movement
    Lava, // Kills the player on contact
}

impl Tile {
    /// Terrain symbol in a level plan. Actor symbols are not terrain and
    /// return `None`.
    pub fn from_symbol(ch: char) -> Option<Tile> {
        match ch {
            'x' => Some(Tile::Wall),
            '!' => Some(Tile::Lava),
            ' ' => Some(Tile::Space),
            _ => None,
        }
    }

    /// Character used when printing the terrain grid.
    pub fn glyph(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Lava => '!',
            Tile::Space => ' ',
        }
    }

    /// Does this tile stop a moving box?
    pub fn is_blocking(self) -> bool {
        !matches!(self, Tile::Space)
    }
}
