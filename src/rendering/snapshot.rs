//! # Grid Snapshot
//!
//! Everything needed to draw one frame: the glyph of every cell, the visible
//! entities in draw order and the status bar.

use crate::game::{GameState, Glyph, Position, RenderOrder, Rgb, TileType, SHROUD};
use crate::rendering::StatusBar;
use serde::{Deserialize, Serialize};

/// What the player knows about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub tile: TileType,
    pub visible: bool,
    pub explored: bool,
}

impl CellView {
    /// Light glyph in view, dark glyph when remembered, shroud otherwise.
    pub fn glyph(&self) -> Glyph {
        if self.visible {
            self.tile.light()
        } else if self.explored {
            self.tile.dark()
        } else {
            SHROUD
        }
    }

    /// Plain character used by [`GridSnapshot::to_ascii`].
    pub fn ascii(&self) -> char {
        if !self.visible && !self.explored {
            return ' ';
        }
        match self.tile {
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::DownStairs => '>',
        }
    }
}

/// An entity as seen by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub position: Position,
    pub glyph: char,
    pub color: Rgb,
    pub name: String,
    pub render_order: RenderOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: u32,
    pub height: u32,
    /// Indexed `[y][x]`
    pub cells: Vec<Vec<CellView>>,
    /// Entities in visible cells, lowest render order first
    pub entities: Vec<EntityView>,
    pub status: StatusBar,
}

impl GridSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let level = &state.level;
        let cells = level
            .tiles
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, tile)| CellView {
                        tile: *tile,
                        visible: level.visible[y][x],
                        explored: level.explored[y][x],
                    })
                    .collect()
            })
            .collect();

        let mut entities: Vec<EntityView> = state
            .level_entities()
            .filter(|entity| level.is_visible(entity.position))
            .map(|entity| EntityView {
                position: entity.position,
                glyph: entity.glyph,
                color: entity.color,
                name: entity.name.clone(),
                render_order: entity.render_order,
            })
            .collect();
        // Stable, so deck order breaks ties
        entities.sort_by_key(|entity| entity.render_order);

        Self {
            width: level.width,
            height: level.height,
            cells,
            entities,
            status: state.status(),
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&CellView> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.cells.get(pos.y as usize)?.get(pos.x as usize)
    }

    /// The deck as text, one line per row, followed by the status line.
    pub fn to_ascii(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(CellView::ascii).collect())
            .collect();

        // Later entities are drawn on top
        for entity in &self.entities {
            if let Some(cell) = rows
                .get_mut(entity.position.y as usize)
                .and_then(|row| row.get_mut(entity.position.x as usize))
            {
                *cell = entity.glyph;
            }
        }

        let mut out: String = rows
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        out.push('\n');
        out.push_str(&format!(
            "{}  {}",
            self.status.health_bar(20),
            self.status.floor_label()
        ));
        out
    }
}
