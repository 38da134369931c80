// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::board::building_site::BuildingSite;
use crate::domain::board::hex::{self, Corner};
use crate::domain::board::port::{Port, PortKind, Transform};
use crate::domain::board::road::Road;
use crate::domain::board::tile::Tile;
use crate::domain::models::resource::TileType;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// 可用的产出点数（不含 7）
pub const PRODUCTION_NUMBERS: [u32; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

const MAX_PORTS: usize = 15;

/// 生成的棋盘布局
#[derive(Debug, Clone)]
pub struct BoardLayout {
    pub tiles: Vec<Tile>,
    pub sites: Vec<BuildingSite>,
    pub roads: Vec<Road>,
    pub ports: Vec<Port>,
    /// 强盗初始所在地块（沙漠）
    pub robber_tile: usize,
}

/// 生成 `rings` 环的棋盘
///
/// id 均从 1 开始：地块按环序编号，建筑位置与道路按首次出现的顺序编号。
pub fn generate(rings: usize, size_of_hex: f64) -> BoardLayout {
    let hexes = hex::spiral(rings);
    let mut tiles = Vec::with_capacity(hexes.len());
    let mut sites: Vec<BuildingSite> = Vec::new();
    let mut roads: Vec<Road> = Vec::new();
    let mut corner_ids: HashMap<Corner, usize> = HashMap::new();
    let mut edge_ids: HashMap<(usize, usize), usize> = HashMap::new();
    let mut edge_tile_counts: HashMap<usize, u32> = HashMap::new();

    for (index, axial) in hexes.iter().enumerate() {
        let tile_id = index + 1;
        let mut site_ids = Vec::with_capacity(6);
        for corner in axial.corners() {
            let site_id = *corner_ids.entry(corner).or_insert_with(|| {
                let (x, y) = corner.to_pixel(size_of_hex);
                sites.push(BuildingSite {
                    id: sites.len() + 1,
                    building: None,
                    coordinates: [x, y],
                    tile_ids: Vec::new(),
                    road_ids: Vec::new(),
                    port_id: None,
                });
                sites.len()
            });
            sites[site_id - 1].tile_ids.push(tile_id);
            site_ids.push(site_id);
        }

        for i in 0..site_ids.len() {
            let a = site_ids[i];
            let b = site_ids[(i + 1) % site_ids.len()];
            let key = (a.min(b), a.max(b));
            let road_id = *edge_ids.entry(key).or_insert_with(|| {
                let [xa, ya] = sites[a - 1].coordinates;
                let [xb, yb] = sites[b - 1].coordinates;
                let id = roads.len() + 1;
                roads.push(Road {
                    id,
                    owner: None,
                    color: None,
                    coordinates: [(xa + xb) / 2.0, (ya + yb) / 2.0],
                    rotation_angle: (yb - ya).atan2(xb - xa),
                    site_ids: [a, b],
                });
                sites[a - 1].road_ids.push(id);
                sites[b - 1].road_ids.push(id);
                id
            });
            *edge_tile_counts.entry(road_id).or_insert(0) += 1;
        }

        let (x, y) = axial.to_pixel(size_of_hex);
        tiles.push(Tile {
            id: tile_id,
            tile_type: TileType::Waste,
            value: 0,
            coordinates: [x, y],
            is_robbed: false,
            axial: *axial,
            site_ids,
        });
    }

    let robber_tile = assign_tile_types(&mut tiles);

    let coastal: Vec<usize> = roads
        .iter()
        .filter(|road| edge_tile_counts.get(&road.id) == Some(&1))
        .map(|road| road.id)
        .collect();
    let ports = place_ports(rings, &coastal, &roads, &mut sites, size_of_hex);

    BoardLayout {
        tiles,
        sites,
        roads,
        ports,
        robber_tile,
    }
}

/// 分配地块类型与点数，返回沙漠地块 id（强盗起始位置）
fn assign_tile_types(tiles: &mut [Tile]) -> usize {
    let mut rng = rand::rng();
    let mut types = vec![TileType::Waste];
    types.extend(
        TileType::resources()
            .into_iter()
            .cycle()
            .take(tiles.len().saturating_sub(1)),
    );
    types.shuffle(&mut rng);

    let mut values = production_values(tiles.len().saturating_sub(1)).into_iter();
    let mut robber_tile = 0;
    for (tile, tile_type) in tiles.iter_mut().zip(types) {
        tile.tile_type = tile_type;
        if tile_type == TileType::Waste {
            tile.is_robbed = true;
            robber_tile = tile.id;
        } else {
            tile.value = values.next().unwrap_or(0);
        }
    }
    robber_tile
}

/// 生成 `count` 个产出点数
///
/// 先放入 `count / 10` 组完整点数，余数从打乱的一组点数中补足，最后整体打乱。
pub fn production_values(count: usize) -> Vec<u32> {
    let mut rng = rand::rng();
    let mut values = Vec::with_capacity(count);
    for _ in 0..count / PRODUCTION_NUMBERS.len() {
        values.extend(PRODUCTION_NUMBERS);
    }
    let mut overhead = PRODUCTION_NUMBERS.to_vec();
    overhead.shuffle(&mut rng);
    values.extend(overhead.into_iter().take(count % PRODUCTION_NUMBERS.len()));
    values.shuffle(&mut rng);
    values
}

pub fn port_count(rings: usize) -> usize {
    (2 * rings + 3).min(MAX_PORTS)
}

/// 港口类型列表：专用港口依次覆盖五种资源，其余为通用港口
pub fn port_kinds(rings: usize) -> Vec<PortKind> {
    let total = port_count(rings);
    let specific = if total <= 11 { 5 } else { total - total / 2 };
    let mut kinds: Vec<PortKind> = TileType::resources()
        .into_iter()
        .cycle()
        .take(specific)
        .map(PortKind::Specific)
        .collect();
    kinds.extend(std::iter::repeat(PortKind::General).take(total - specific));
    kinds
}

fn place_ports(
    rings: usize,
    coastal_road_ids: &[usize],
    roads: &[Road],
    sites: &mut [BuildingSite],
    size_of_hex: f64,
) -> Vec<Port> {
    if coastal_road_ids.is_empty() {
        return Vec::new();
    }
    let mut coast: Vec<&Road> = coastal_road_ids.iter().map(|id| &roads[id - 1]).collect();
    coast.sort_by(|a, b| {
        let angle = |road: &Road| road.coordinates[1].atan2(road.coordinates[0]);
        angle(a).total_cmp(&angle(b))
    });

    let mut kinds = port_kinds(rings);
    kinds.shuffle(&mut rand::rng());
    let count = kinds.len().min(coast.len());

    let mut ports = Vec::with_capacity(count);
    for (i, kind) in kinds.into_iter().take(count).enumerate() {
        let road = coast[i * coast.len() / count];
        let [x, y] = road.coordinates;
        let length = x.hypot(y).max(f64::EPSILON);
        let (ux, uy) = (x / length, y / length);
        let port = Port {
            id: i + 1,
            kind,
            transform: Transform {
                x: x + ux * size_of_hex * 0.5,
                y: y + uy * size_of_hex * 0.5,
                rotation: uy.atan2(ux),
            },
            site_ids: road.site_ids,
        };
        for site_id in road.site_ids {
            sites[site_id - 1].port_id = Some(port.id);
        }
        ports.push(port);
    }
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_board_topology() {
        let layout = generate(3, 10.0);
        assert_eq!(layout.tiles.len(), 19);
        assert_eq!(layout.sites.len(), 54);
        assert_eq!(layout.roads.len(), 72);
        assert!(layout.sites.iter().all(|s| s.tile_ids.len() <= 3));
        assert!(layout.sites.iter().all(|s| (2..=3).contains(&s.road_ids.len())));
        assert!(layout.tiles.iter().all(|t| t.site_ids.len() == 6));
    }

    #[test]
    fn test_ids_are_one_based_and_sequential() {
        let layout = generate(4, 10.0);
        for (i, tile) in layout.tiles.iter().enumerate() {
            assert_eq!(tile.id, i + 1);
        }
        for (i, road) in layout.roads.iter().enumerate() {
            assert_eq!(road.id, i + 1);
        }
        assert_eq!(layout.tiles.len(), 37);
        assert_eq!(layout.sites.len(), 96);
        assert_eq!(layout.roads.len(), 132);
    }

    #[test]
    fn test_single_desert_holds_robber() {
        let layout = generate(3, 10.0);
        let deserts: Vec<&Tile> = layout
            .tiles
            .iter()
            .filter(|t| t.tile_type == TileType::Waste)
            .collect();
        assert_eq!(deserts.len(), 1);
        assert_eq!(deserts[0].id, layout.robber_tile);
        assert_eq!(deserts[0].value, 0);
        assert!(deserts[0].is_robbed);
        assert_eq!(layout.tiles.iter().filter(|t| t.is_robbed).count(), 1);
    }

    #[test]
    fn test_resource_distribution() {
        let layout = generate(3, 10.0);
        let count = |ty: TileType| layout.tiles.iter().filter(|t| t.tile_type == ty).count();
        assert_eq!(count(TileType::Wheat), 4);
        assert_eq!(count(TileType::Sheep), 4);
        assert_eq!(count(TileType::Wood), 4);
        assert_eq!(count(TileType::Clay), 3);
        assert_eq!(count(TileType::Ore), 3);
    }

    #[test]
    fn test_production_values() {
        let values = production_values(18);
        assert_eq!(values.len(), 18);
        assert!(!values.contains(&7));
        let distinct: HashSet<u32> = values.iter().copied().collect();
        assert_eq!(distinct.len(), 10);

        let values = production_values(4);
        let distinct: HashSet<u32> = values.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        assert!(production_values(0).is_empty());
    }

    #[test]
    fn test_port_counts() {
        let general = |kinds: &[PortKind]| kinds.iter().filter(|k| **k == PortKind::General).count();
        let kinds = port_kinds(3);
        assert_eq!(kinds.len(), 9);
        assert_eq!(general(&kinds), 4);
        let kinds = port_kinds(4);
        assert_eq!(kinds.len(), 11);
        assert_eq!(general(&kinds), 6);
        let kinds = port_kinds(7);
        assert_eq!(kinds.len(), 15);
        assert_eq!(general(&kinds), 7);
    }

    #[test]
    fn test_ports_sit_on_coast_without_sharing_sites() {
        let layout = generate(3, 10.0);
        assert_eq!(layout.ports.len(), 9);
        let mut used = HashSet::new();
        for port in &layout.ports {
            for site_id in port.site_ids {
                assert!(used.insert(site_id), "site {} shared by two ports", site_id);
                let site = &layout.sites[site_id - 1];
                assert_eq!(site.port_id, Some(port.id));
                assert!(site.tile_ids.len() <= 2);
            }
        }
    }
}
