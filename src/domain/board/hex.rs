// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 轴向坐标下的尖顶六边形几何
//!
//! 每个角由拥有它的六边形及其上下极点唯一确定，
//! 因此相邻地块共享的角天然去重。

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// 六个相邻方向，按顺时针从右侧开始
pub const DIRECTIONS: [Axial; 6] = [
    Axial::new(1, 0),
    Axial::new(1, -1),
    Axial::new(0, -1),
    Axial::new(-1, 0),
    Axial::new(-1, 1),
    Axial::new(0, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn add(&self, other: Axial) -> Axial {
        Axial::new(self.q + other.q, self.r + other.r)
    }

    pub fn scale(&self, factor: i32) -> Axial {
        Axial::new(self.q * factor, self.r * factor)
    }

    /// 到中心的环距离，中心为 0
    pub fn distance_from_center(&self) -> i32 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let x = size * SQRT_3 * (self.q as f64 + self.r as f64 / 2.0);
        let y = size * 1.5 * self.r as f64;
        (x, y)
    }

    /// 顺时针列出六个角，从正上方开始
    pub fn corners(&self) -> [Corner; 6] {
        let Axial { q, r } = *self;
        [
            Corner::north(q, r),
            Corner::south(q + 1, r - 1),
            Corner::north(q, r + 1),
            Corner::south(q, r),
            Corner::north(q - 1, r + 1),
            Corner::south(q, r - 1),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pole {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    pub hex: Axial,
    pub pole: Pole,
}

impl Corner {
    pub const fn north(q: i32, r: i32) -> Self {
        Self {
            hex: Axial::new(q, r),
            pole: Pole::North,
        }
    }

    pub const fn south(q: i32, r: i32) -> Self {
        Self {
            hex: Axial::new(q, r),
            pole: Pole::South,
        }
    }

    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let (x, y) = self.hex.to_pixel(size);
        match self.pole {
            Pole::North => (x, y - size),
            Pole::South => (x, y + size),
        }
    }
}

/// 由内向外逐环列出 `rings` 环内的全部六边形
pub fn spiral(rings: usize) -> Vec<Axial> {
    let mut hexes = Vec::new();
    if rings == 0 {
        return hexes;
    }
    hexes.push(Axial::new(0, 0));
    for radius in 1..rings as i32 {
        let mut hex = DIRECTIONS[4].scale(radius);
        for direction in DIRECTIONS {
            for _ in 0..radius {
                hexes.push(hex);
                hex = hex.add(direction);
            }
        }
    }
    hexes
}

pub fn tile_count(rings: usize) -> usize {
    if rings == 0 {
        0
    } else {
        3 * rings * (rings - 1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_spiral_counts() {
        assert_eq!(spiral(1).len(), 1);
        assert_eq!(spiral(3).len(), 19);
        assert_eq!(spiral(4).len(), 37);
        assert_eq!(spiral(5).len(), tile_count(5));
    }

    #[test]
    fn test_spiral_is_unique_and_ordered_by_ring() {
        let hexes = spiral(4);
        let unique: HashSet<_> = hexes.iter().collect();
        assert_eq!(unique.len(), hexes.len());
        let distances: Vec<i32> = hexes.iter().map(|h| h.distance_from_center()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*distances.last().unwrap(), 3);
    }

    #[test]
    fn test_neighbours_share_two_corners() {
        let center = Axial::new(0, 0);
        let center_corners: HashSet<Corner> = center.corners().into_iter().collect();
        for direction in DIRECTIONS {
            let shared = direction
                .corners()
                .into_iter()
                .filter(|c| center_corners.contains(c))
                .count();
            assert_eq!(shared, 2, "neighbour {:?}", direction);
        }
    }

    #[test]
    fn test_corner_pixels_are_at_hex_radius() {
        let hex = Axial::new(1, -1);
        let (cx, cy) = hex.to_pixel(10.0);
        for corner in hex.corners() {
            let (x, y) = corner.to_pixel(10.0);
            let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            assert!((distance - 10.0).abs() < 1e-9);
        }
    }
}
