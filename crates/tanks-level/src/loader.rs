//! Level loading: decode a Tiled map and validate it into a `Level`.
//!
//! Nothing here touches a `GameState`. A level is either fully valid or
//! rejected, so a failed load can never leave a half-applied world behind.

use std::path::{Path, PathBuf};

use tanks_core::components::Unit;
use tanks_core::constants::LEVEL_LAYER_COUNT;
use tanks_core::grid::TileGrid;
use tanks_core::level::{LayerImages, Level};
use tanks_core::types::{DVec2, TileRef, UVec2, UnitId};
use tracing::{debug, info};

use crate::error::{LevelDefect, LevelError};
use crate::tiled::{TiledLayer, TiledMap, Tileset, TilesetEntry, ORTHOGONAL, TILE_LAYER};

const GROUND: usize = 0;
const WALLS: usize = 1;
const TANKS: usize = 2;
const TOWERS: usize = 3;
const EXPLOSIONS: usize = 4;

/// A tileset with its external parts resolved and its image checked.
#[derive(Debug)]
struct ResolvedTileset {
    /// Position in the map's tileset list; identifies the tileset.
    index: usize,
    firstgid: u32,
    tileset: Tileset,
    /// Sprite sheet path, relative to the map's directory.
    image: PathBuf,
}

impl ResolvedTileset {
    fn contains(&self, gid: u32) -> bool {
        gid >= self.firstgid && gid - self.firstgid < self.tileset.tilecount
    }

    fn cell_size(&self) -> UVec2 {
        UVec2::new(self.tileset.tilewidth, self.tileset.tileheight)
    }

    /// Sprite for `gid`, or `None` if the gid falls outside this tileset.
    fn tile(&self, gid: u32) -> Option<TileRef> {
        let local_id = gid.checked_sub(self.firstgid)?;
        if local_id >= self.tileset.tilecount {
            return None;
        }
        Some(TileRef::from_local_id(local_id, self.tileset.columns))
    }
}

/// Load and validate the level stored at `path`.
pub fn load_level(path: &Path) -> Result<Level, LevelError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| LevelError::new(path, LevelDefect::Io(e)))?;
    parse_level(&json, path)
}

/// Validate a level from its JSON text. `path` names the file in errors and
/// anchors relative tileset and image paths.
pub fn parse_level(json: &str, path: &Path) -> Result<Level, LevelError> {
    let map: TiledMap =
        serde_json::from_str(json).map_err(|e| LevelError::new(path, LevelDefect::Json(e)))?;
    decode_map(&map, path)
}

/// Validate an already parsed map.
pub fn decode_map(map: &TiledMap, path: &Path) -> Result<Level, LevelError> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let level = build_level(map, base_dir).map_err(|defect| LevelError::new(path, defect))?;
    info!(
        path = %path.display(),
        width = level.world_size.x,
        height = level.world_size.y,
        units = level.units.len(),
        "level loaded"
    );
    Ok(level)
}

fn build_level(map: &TiledMap, base_dir: &Path) -> Result<Level, LevelDefect> {
    if map.orientation != ORTHOGONAL {
        return Err(LevelDefect::InvalidOrientation(map.orientation.clone()));
    }
    if map.layers.len() != LEVEL_LAYER_COUNT {
        return Err(LevelDefect::LayerCount {
            expected: LEVEL_LAYER_COUNT,
            found: map.layers.len(),
        });
    }

    let tilesets = resolve_tilesets(&map.tilesets, base_dir)?;
    let layers = &map.layers;

    // Ground fixes the cell size every other layer must match.
    let ground_tileset = layer_tileset(map, &tilesets, &layers[GROUND])?;
    let cell_size = ground_tileset.cell_size();
    let ground = decode_grid(map, &layers[GROUND], ground_tileset)?;

    let walls_tileset = layer_tileset(map, &tilesets, &layers[WALLS])?;
    check_cell_size(walls_tileset, cell_size, &layers[WALLS])?;
    let walls = decode_grid(map, &layers[WALLS], walls_tileset)?;

    let tanks_tileset = layer_tileset(map, &tilesets, &layers[TANKS])?;
    let towers_tileset = layer_tileset(map, &tilesets, &layers[TOWERS])?;
    if tanks_tileset.index != towers_tileset.index {
        return Err(LevelDefect::UnitTilesetMismatch);
    }
    check_cell_size(tanks_tileset, cell_size, &layers[TANKS])?;
    let tanks = decode_units(map, &layers[TANKS], tanks_tileset)?;
    let towers = decode_units(map, &layers[TOWERS], towers_tileset)?;
    if tanks.is_empty() {
        return Err(LevelDefect::NoPlayerTank);
    }

    let explosions_tileset = layer_tileset(map, &tilesets, &layers[EXPLOSIONS])?;
    check_cell_size(explosions_tileset, cell_size, &layers[EXPLOSIONS])?;
    // Explosion cells are never drawn from the map, but must still resolve.
    decode_cells(&layers[EXPLOSIONS], explosions_tileset)?;

    debug!(
        tanks = tanks.len(),
        towers = towers.len(),
        cell_width = cell_size.x,
        cell_height = cell_size.y,
        "level layers decoded"
    );

    let mut units = tanks;
    units.extend(towers);

    Ok(Level {
        world_size: UVec2::new(map.width, map.height),
        cell_size,
        ground,
        walls,
        units,
        player: UnitId(0),
        images: LayerImages {
            ground: ground_tileset.image.clone(),
            walls: walls_tileset.image.clone(),
            units: tanks_tileset.image.clone(),
            explosions: explosions_tileset.image.clone(),
        },
    })
}

fn resolve_tilesets(
    entries: &[TilesetEntry],
    base_dir: &Path,
) -> Result<Vec<ResolvedTileset>, LevelDefect> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (tileset, tileset_dir) = match entry {
                TilesetEntry::Inline { tileset, .. } => (tileset.clone(), base_dir.to_path_buf()),
                TilesetEntry::External { source, .. } => {
                    let file = base_dir.join(source);
                    let tileset = read_external_tileset(&file).map_err(|reason| {
                        LevelDefect::UnresolvableTileset {
                            file: source.clone(),
                            reason,
                        }
                    })?;
                    // Image paths in a tileset file are relative to that file.
                    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
                    (tileset, dir)
                }
            };
            let image = match tileset.image.as_deref() {
                None | Some("") => {
                    return Err(LevelDefect::MissingImage {
                        tileset: tileset.name.clone(),
                    })
                }
                Some(image) if image.starts_with("data:") => {
                    return Err(LevelDefect::EmbeddedImage {
                        tileset: tileset.name.clone(),
                    })
                }
                Some(image) => tileset_dir.join(image),
            };
            Ok(ResolvedTileset {
                index,
                firstgid: entry.firstgid(),
                tileset,
                image,
            })
        })
        .collect()
}

fn read_external_tileset(file: &Path) -> Result<Tileset, String> {
    let json = std::fs::read_to_string(file).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

/// Find the tileset a layer draws from and check the layer's shape.
///
/// The tileset is guessed from the first non-empty cell; an empty layer uses
/// the map's first tileset.
fn layer_tileset<'a>(
    map: &TiledMap,
    tilesets: &'a [ResolvedTileset],
    layer: &TiledLayer,
) -> Result<&'a ResolvedTileset, LevelDefect> {
    if layer.kind != TILE_LAYER {
        return Err(LevelDefect::InvalidLayerType {
            layer: layer.name.clone(),
        });
    }
    let expected = map.width as usize * map.height as usize;
    if layer.data.len() != expected {
        return Err(LevelDefect::TileCount {
            layer: layer.name.clone(),
            expected,
            found: layer.data.len(),
        });
    }

    let resolved = match layer.data.iter().copied().find(|&gid| gid != 0) {
        None => tilesets.first().ok_or(LevelDefect::NoTilesets)?,
        Some(gid) => tilesets
            .iter()
            .find(|t| t.contains(gid))
            .ok_or_else(|| LevelDefect::NoMatchingTileset {
                layer: layer.name.clone(),
                gid,
            })?,
    };

    if resolved.tileset.columns == 0 {
        return Err(LevelDefect::InvalidColumns {
            tileset: resolved.tileset.name.clone(),
        });
    }
    Ok(resolved)
}

fn check_cell_size(
    tileset: &ResolvedTileset,
    cell_size: UVec2,
    layer: &TiledLayer,
) -> Result<(), LevelDefect> {
    if tileset.cell_size() != cell_size {
        return Err(LevelDefect::TileSizeMismatch {
            layer: layer.name.clone(),
        });
    }
    Ok(())
}

/// Decode every cell of a layer, row-major. Empty cells are `None`.
fn decode_cells(
    layer: &TiledLayer,
    tileset: &ResolvedTileset,
) -> Result<Vec<Option<TileRef>>, LevelDefect> {
    layer
        .data
        .iter()
        .map(|&gid| {
            if gid == 0 {
                return Ok(None);
            }
            tileset
                .tile(gid)
                .map(Some)
                .ok_or_else(|| LevelDefect::InvalidTileId {
                    layer: layer.name.clone(),
                    gid,
                })
        })
        .collect()
}

fn decode_grid(
    map: &TiledMap,
    layer: &TiledLayer,
    tileset: &ResolvedTileset,
) -> Result<TileGrid, LevelDefect> {
    let cells = decode_cells(layer, tileset)?;
    // Cell count was checked against the map size in `layer_tileset`.
    TileGrid::from_cells(map.width, map.height, cells).ok_or_else(|| LevelDefect::TileCount {
        layer: layer.name.clone(),
        expected: map.width as usize * map.height as usize,
        found: layer.data.len(),
    })
}

/// One unit per non-empty cell, in row-major scan order.
fn decode_units(
    map: &TiledMap,
    layer: &TiledLayer,
    tileset: &ResolvedTileset,
) -> Result<Vec<Unit>, LevelDefect> {
    let grid = decode_grid(map, layer, tileset)?;
    Ok(grid
        .occupied()
        .map(|(x, y, tile)| Unit::new(DVec2::new(x as f64, y as f64), tile))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiled::serialize_map;

    /// 4×3 map: wall in the corner, tank at (1,1), tower at (3,2).
    fn make_test_map() -> TiledMap {
        let tileset = |name: &str, image: &str, firstgid: u32| TilesetEntry::Inline {
            firstgid,
            tileset: Tileset::sheet(name, image, 32, 8, 8),
        };
        let (ground, walls, units, fx) = (1, 65, 129, 193);
        TiledMap {
            kind: "map".into(),
            orientation: ORTHOGONAL.into(),
            width: 4,
            height: 3,
            tilewidth: 32,
            tileheight: 32,
            infinite: false,
            layers: vec![
                TiledLayer::tiles("ground", 4, 3, vec![ground + 13; 12]),
                TiledLayer::tiles("walls", 4, 3, {
                    let mut data = vec![0; 12];
                    data[0] = walls + 9;
                    data
                }),
                TiledLayer::tiles("tanks", 4, 3, {
                    let mut data = vec![0; 12];
                    data[5] = units + 1;
                    data
                }),
                TiledLayer::tiles("towers", 4, 3, {
                    let mut data = vec![0; 12];
                    data[11] = units + 8;
                    data
                }),
                TiledLayer::tiles("explosions", 4, 3, vec![0; 12]),
            ],
            tilesets: vec![
                tileset("ground", "ground.png", ground),
                tileset("walls", "walls.png", walls),
                tileset("units", "units.png", units),
                tileset("explosions", "explosions.png", fx),
            ],
        }
    }

    fn defect_of(map: &TiledMap) -> LevelDefect {
        decode_map(map, Path::new("levels/test.json"))
            .expect_err("map should be rejected")
            .defect
    }

    #[test]
    fn test_decode_valid_map() {
        let level = decode_map(&make_test_map(), Path::new("levels/test.json")).unwrap();

        assert_eq!(level.world_size, UVec2::new(4, 3));
        assert_eq!(level.cell_size, UVec2::new(32, 32));
        assert_eq!(level.ground.get(2, 1), Some(TileRef::new(5, 1)));
        assert_eq!(level.walls.get(0, 0), Some(TileRef::new(1, 1)));
        assert_eq!(level.walls.get(1, 0), None);

        assert_eq!(level.units.len(), 2);
        assert_eq!(level.player, UnitId(0));
        assert_eq!(level.units[0].position(), DVec2::new(1.0, 1.0));
        assert_eq!(level.units[0].item.tile, TileRef::new(1, 0));
        assert_eq!(level.units[1].position(), DVec2::new(3.0, 2.0));
        assert_eq!(level.units[1].item.tile, TileRef::new(0, 1));

        assert_eq!(level.images.ground, Path::new("levels/ground.png"));
        assert_eq!(level.images.units, Path::new("levels/units.png"));
    }

    #[test]
    fn test_json_roundtrip_decodes_the_same() {
        let map = make_test_map();
        let json = serialize_map(&map).unwrap();
        let from_json = parse_level(&json, Path::new("test.json")).unwrap();
        let direct = decode_map(&map, Path::new("test.json")).unwrap();
        assert_eq!(from_json, direct);
    }

    #[test]
    fn test_error_names_file() {
        let mut map = make_test_map();
        map.layers.pop();
        let err = decode_map(&map, Path::new("levels/broken.json")).unwrap_err();
        assert_eq!(err.path, Path::new("levels/broken.json"));
        let message = err.to_string();
        assert!(message.contains("broken.json"), "{message}");
        assert!(message.contains("5 layers are expected"), "{message}");
    }

    #[test]
    fn test_reject_layer_count() {
        let mut map = make_test_map();
        map.layers.push(TiledLayer::tiles("extra", 4, 3, vec![0; 12]));
        assert!(matches!(
            defect_of(&map),
            LevelDefect::LayerCount { expected: 5, found: 6 }
        ));
    }

    #[test]
    fn test_reject_orientation() {
        let mut map = make_test_map();
        map.orientation = "isometric".into();
        assert!(matches!(defect_of(&map), LevelDefect::InvalidOrientation(_)));
    }

    #[test]
    fn test_reject_non_tile_layer() {
        let mut map = make_test_map();
        map.layers[1].kind = "objectgroup".into();
        assert!(matches!(
            defect_of(&map),
            LevelDefect::InvalidLayerType { layer } if layer == "walls"
        ));
    }

    #[test]
    fn test_reject_tile_count() {
        let mut map = make_test_map();
        map.layers[0].data.pop();
        assert!(matches!(
            defect_of(&map),
            LevelDefect::TileCount { expected: 12, found: 11, .. }
        ));
    }

    #[test]
    fn test_reject_gid_outside_every_tileset() {
        let mut map = make_test_map();
        map.layers[1].data[0] = 999;
        assert!(matches!(
            defect_of(&map),
            LevelDefect::NoMatchingTileset { gid: 999, .. }
        ));
    }

    #[test]
    fn test_reject_gid_from_another_tileset() {
        let mut map = make_test_map();
        // First tile picks the walls tileset, a later one belongs to ground.
        map.layers[1].data[4] = 2;
        assert!(matches!(
            defect_of(&map),
            LevelDefect::InvalidTileId { gid: 2, .. }
        ));
    }

    #[test]
    fn test_reject_missing_tilesets() {
        let mut map = make_test_map();
        map.layers = (0..5)
            .map(|i| TiledLayer::tiles(&format!("layer{i}"), 4, 3, vec![0; 12]))
            .collect();
        map.tilesets.clear();
        assert!(matches!(defect_of(&map), LevelDefect::NoTilesets));
    }

    #[test]
    fn test_reject_zero_columns() {
        let mut map = make_test_map();
        if let TilesetEntry::Inline { tileset, .. } = &mut map.tilesets[0] {
            tileset.columns = 0;
        }
        assert!(matches!(defect_of(&map), LevelDefect::InvalidColumns { .. }));
    }

    #[test]
    fn test_reject_embedded_image() {
        let mut map = make_test_map();
        if let TilesetEntry::Inline { tileset, .. } = &mut map.tilesets[1] {
            tileset.image = Some("data:image/png;base64,iVBORw0KGgo=".into());
        }
        assert!(matches!(
            defect_of(&map),
            LevelDefect::EmbeddedImage { tileset } if tileset == "walls"
        ));
    }

    #[test]
    fn test_reject_missing_image() {
        let mut map = make_test_map();
        if let TilesetEntry::Inline { tileset, .. } = &mut map.tilesets[3] {
            tileset.image = None;
        }
        assert!(matches!(defect_of(&map), LevelDefect::MissingImage { .. }));
    }

    #[test]
    fn test_reject_missing_image_on_unused_tileset() {
        let mut map = make_test_map();
        map.tilesets.push(TilesetEntry::Inline {
            firstgid: 257,
            tileset: Tileset {
                image: None,
                ..Tileset::sheet("spare", "spare.png", 32, 8, 8)
            },
        });
        assert!(matches!(
            defect_of(&map),
            LevelDefect::MissingImage { tileset } if tileset == "spare"
        ));
    }

    #[test]
    fn test_reject_invalid_explosion_tile_id() {
        let mut map = make_test_map();
        // First tile picks the explosions tileset, a later one belongs to ground.
        map.layers[4].data[0] = 193;
        map.layers[4].data[5] = 2;
        assert!(matches!(
            defect_of(&map),
            LevelDefect::InvalidTileId { layer, gid: 2 } if layer == "explosions"
        ));
    }

    #[test]
    fn test_reject_inconsistent_tile_size() {
        let mut map = make_test_map();
        if let TilesetEntry::Inline { tileset, .. } = &mut map.tilesets[1] {
            tileset.tilewidth = 16;
        }
        assert!(matches!(
            defect_of(&map),
            LevelDefect::TileSizeMismatch { layer } if layer == "walls"
        ));
    }

    #[test]
    fn test_reject_tanks_and_towers_on_different_tilesets() {
        let mut map = make_test_map();
        // Tower drawn from the explosions tileset.
        map.layers[3].data[11] = 193;
        assert!(matches!(defect_of(&map), LevelDefect::UnitTilesetMismatch));
    }

    #[test]
    fn test_reject_level_without_player() {
        let mut map = make_test_map();
        map.layers[2].data = vec![0; 12];
        // Both empty layers fall back to the first tileset, so the shared
        // tileset check passes and the missing tank is what gets reported.
        map.layers[3].data = vec![0; 12];
        assert!(matches!(defect_of(&map), LevelDefect::NoPlayerTank));
    }

    #[test]
    fn test_reject_unresolvable_external_tileset() {
        let mut map = make_test_map();
        map.tilesets[0] = TilesetEntry::External {
            firstgid: 1,
            source: "missing/ground.tsj".into(),
        };
        assert!(matches!(
            defect_of(&map),
            LevelDefect::UnresolvableTileset { file, .. } if file == "missing/ground.tsj"
        ));
    }

    #[test]
    fn test_reject_malformed_json() {
        let err = parse_level("{ \"width\": 4 ", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err.defect, LevelDefect::Json(_)));
    }
}
