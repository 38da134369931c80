// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::board::building_site::BuildingSite;
use crate::domain::board::road::Road;

pub const LONGEST_ROAD_MIN_LENGTH: usize = 5;
pub const LONGEST_ROAD_POINTS: u32 = 2;

/// 计算玩家最长连续道路的长度
///
/// 深度优先遍历玩家的道路，每条道路只走一次；
/// 路径不能穿过其他玩家的建筑，但可以在其处结束。
pub fn longest_road_length(player_id: &str, sites: &[BuildingSite], roads: &[Road]) -> usize {
    let mut visited = vec![false; roads.len()];
    roads
        .iter()
        .filter(|road| road.is_owned_by(player_id))
        .flat_map(|road| road.site_ids)
        .map(|start| walk(player_id, start, sites, roads, &mut visited))
        .max()
        .unwrap_or(0)
}

fn walk(
    player_id: &str,
    site_id: usize,
    sites: &[BuildingSite],
    roads: &[Road],
    visited: &mut [bool],
) -> usize {
    let mut best = 0;
    for &road_id in &sites[site_id - 1].road_ids {
        let road = &roads[road_id - 1];
        if visited[road_id - 1] || !road.is_owned_by(player_id) {
            continue;
        }
        visited[road_id - 1] = true;
        let next = road.other_end(site_id);
        let length = if sites[next - 1].is_blocked_for(player_id) {
            1
        } else {
            1 + walk(player_id, next, sites, roads, visited)
        };
        visited[road_id - 1] = false;
        best = best.max(length);
    }
    best
}

/// 根据各玩家道路长度决定最长道路称号归属
///
/// 需至少 5 段；持有者在平局时保留称号，无人持有时只有唯一最长者获得。
pub fn resolve_holder(current: Option<&str>, lengths: &[(String, usize)]) -> Option<String> {
    let max = lengths.iter().map(|(_, len)| *len).max().unwrap_or(0);
    if max < LONGEST_ROAD_MIN_LENGTH {
        return None;
    }
    if let Some(holder) = current {
        let holder_length = lengths
            .iter()
            .find(|(player, _)| player == holder)
            .map(|(_, len)| *len)
            .unwrap_or(0);
        if holder_length == max {
            return Some(holder.to_string());
        }
    }
    let mut leaders = lengths.iter().filter(|(_, len)| *len == max);
    match (leaders.next(), leaders.next()) {
        (Some((player, _)), None) => Some(player.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(entries: &[(&str, usize)]) -> Vec<(String, usize)> {
        entries.iter().map(|(p, l)| (p.to_string(), *l)).collect()
    }

    #[test]
    fn test_resolve_requires_minimum_length() {
        assert_eq!(resolve_holder(None, &lengths(&[("a", 4), ("b", 3)])), None);
        assert_eq!(
            resolve_holder(None, &lengths(&[("a", 5), ("b", 3)])),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_resolve_tie_keeps_holder() {
        assert_eq!(
            resolve_holder(Some("a"), &lengths(&[("a", 6), ("b", 6)])),
            Some("a".to_string())
        );
        assert_eq!(resolve_holder(None, &lengths(&[("a", 6), ("b", 6)])), None);
        assert_eq!(
            resolve_holder(Some("a"), &lengths(&[("a", 5), ("b", 7)])),
            Some("b".to_string())
        );
    }

    #[test]
    fn test_resolve_holder_loses_title_when_broken() {
        assert_eq!(
            resolve_holder(Some("a"), &lengths(&[("a", 3), ("b", 4)])),
            None
        );
    }
}
