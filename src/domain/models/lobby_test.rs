use super::*;

fn lobby_with(players: &[&str]) -> Lobby {
    let mut lobby = Lobby::new("abc123", players[0]);
    for player in &players[1..] {
        lobby.add_player(*player);
    }
    lobby
}

fn ordered(players: &[&str]) -> Lobby {
    let mut lobby = lobby_with(players);
    lobby.set_player_order(players.iter().map(|p| p.to_string()).collect());
    lobby
}

fn advance(lobby: &mut Lobby) -> (String, u32) {
    lobby.next_player_turn().unwrap();
    (
        lobby.active_player().unwrap().to_string(),
        lobby.rounds_played(),
    )
}

#[test]
fn test_new_lobby_contains_host() {
    let lobby = Lobby::new("abc123", "host");
    assert_eq!(lobby.players(), &["host".to_string()]);
    assert!(lobby.is_host("host"));
    assert!(!lobby.is_game_started());
    assert_eq!(lobby.available_colors().len(), 6);
}

#[test]
fn test_add_player_ignores_duplicates() {
    let mut lobby = Lobby::new("abc123", "host");
    assert!(lobby.add_player("p2"));
    assert!(!lobby.add_player("p2"));
    assert_eq!(lobby.players().len(), 2);
}

#[test]
fn test_color_assignment_until_exhausted() {
    let mut lobby = Lobby::new("abc123", "host");
    let mut seen = HashSet::new();
    for i in 0..6 {
        let color = lobby.assign_available_color(&format!("p{}", i)).unwrap();
        assert!(seen.insert(color));
        assert_ne!(color, PlayerColor::None);
    }
    assert!(lobby.assign_available_color("p6").is_none());
    assert!(lobby.available_colors().is_empty());
}

#[test]
fn test_restore_color_only_if_absent() {
    let mut lobby = Lobby::new("abc123", "host");
    lobby.restore_color(PlayerColor::Red);
    assert_eq!(lobby.available_colors().len(), 6);

    let color = lobby.assign_available_color("host").unwrap();
    assert_eq!(lobby.available_colors().len(), 5);
    lobby.restore_color(color);
    lobby.restore_color(color);
    assert_eq!(lobby.available_colors().len(), 6);
}

#[test]
fn test_remove_player_returns_color_and_moves_host() {
    let mut lobby = lobby_with(&["host", "p2"]);
    lobby.assign_available_color("host");
    lobby.assign_available_color("p2");
    assert_eq!(lobby.available_colors().len(), 4);

    assert!(lobby.remove_player("host"));
    assert_eq!(lobby.available_colors().len(), 5);
    assert!(lobby.is_host("p2"));
    assert!(!lobby.remove_player("host"));
}

#[test]
fn test_remove_active_player_passes_turn() {
    let mut lobby = ordered(&["a", "b", "c"]);
    assert!(lobby.is_player_turn("a"));
    lobby.remove_player("a");
    assert!(lobby.is_player_turn("b"));

    lobby.remove_player("c");
    assert!(lobby.is_player_turn("b"));
    lobby.remove_player("b");
    assert!(lobby.active_player().is_none());
    assert!(lobby.is_empty());
}

#[test]
fn test_can_start_game_requires_host_two_players_and_ready() {
    let mut lobby = lobby_with(&["host", "p2"]);
    assert!(!lobby.can_start_game("host"));

    lobby.toggle_ready("host");
    lobby.toggle_ready("p2");
    assert!(lobby.can_start_game("host"));
    assert!(!lobby.can_start_game("p2"));

    assert!(!lobby.toggle_ready("p2"));
    assert!(!lobby.can_start_game("host"));

    let mut alone = Lobby::new("abc123", "host");
    alone.toggle_ready("host");
    assert!(!alone.can_start_game("host"));
}

#[test]
fn test_start_game_sets_order_and_active_player() {
    let mut lobby = lobby_with(&["host", "p2", "p3"]);
    lobby.start_game();
    assert!(lobby.is_game_started());
    assert_eq!(lobby.player_order().len(), 3);
    assert_eq!(lobby.active_player(), lobby.player_order().first().map(|s| s.as_str()));
    assert!(lobby.is_setup_round());
    assert!(!lobby.can_start_game("host"));
}

#[test]
fn test_snake_order_two_players() {
    let mut lobby = ordered(&["a", "b"]);
    assert_eq!(advance(&mut lobby), ("b".to_string(), 0));
    assert_eq!(advance(&mut lobby), ("b".to_string(), 1));
    assert_eq!(advance(&mut lobby), ("a".to_string(), 1));
    assert_eq!(advance(&mut lobby), ("b".to_string(), 2));
    assert_eq!(advance(&mut lobby), ("a".to_string(), 3));
    assert_eq!(advance(&mut lobby), ("b".to_string(), 3));
}

#[test]
fn test_snake_order_three_players() {
    let mut lobby = ordered(&["a", "b", "c"]);
    let expected = [
        ("b", 0),
        ("c", 0),
        ("c", 1),
        ("b", 1),
        ("a", 1),
        ("b", 2),
        ("c", 2),
        ("a", 3),
    ];
    for (player, round) in expected {
        assert_eq!(advance(&mut lobby), (player.to_string(), round));
    }
    assert!(!lobby.is_setup_round());
}

#[test]
fn test_next_turn_fails_without_order() {
    let mut lobby = Lobby::new("abc123", "host");
    let err = lobby.next_player_turn().unwrap_err();
    assert_eq!(err.to_string(), "Executing next turn failed");
}

#[test]
fn test_turn_state_resets_on_next_turn() {
    let mut lobby = ordered(&["a", "b"]);
    lobby.record_placement(BuildingType::Settlement);
    lobby.record_placement(BuildingType::Road);
    assert_eq!(lobby.settlements_placed_this_turn(), 1);
    assert_eq!(lobby.roads_placed_this_turn(), 1);

    lobby.next_player_turn().unwrap();
    assert_eq!(lobby.settlements_placed_this_turn(), 0);
    assert_eq!(lobby.roads_placed_this_turn(), 0);
}

#[test]
fn test_can_roll_dice_once_per_turn_after_setup() {
    let mut lobby = lobby_with(&["a", "b"]);
    lobby.start_game();
    let first = lobby.active_player().unwrap().to_string();
    assert!(!lobby.can_roll_dice(&first));

    for _ in 0..4 {
        lobby.next_player_turn().unwrap();
    }
    let active = lobby.active_player().unwrap().to_string();
    assert!(lobby.can_roll_dice(&active));
    lobby.mark_dice_rolled();
    assert!(!lobby.can_roll_dice(&active));

    lobby.next_player_turn().unwrap();
    let next = lobby.active_player().unwrap().to_string();
    assert!(lobby.can_roll_dice(&next));
    lobby.set_robber_pending(true);
    assert!(!lobby.can_roll_dice(&next));
}

#[test]
fn test_cheat_and_report_bookkeeping() {
    let mut lobby = lobby_with(&["host", "p2"]);
    assert_eq!(lobby.cheat_count("unknown"), 0);
    lobby.record_cheat("p2");
    lobby.record_cheat("p2");
    assert_eq!(lobby.cheat_count("p2"), 2);
    assert_eq!(lobby.uncaught_cheats("p2"), 2);
    lobby.mark_cheats_caught("p2");
    assert_eq!(lobby.uncaught_cheats("p2"), 0);
    lobby.record_cheat("p2");
    assert_eq!(lobby.uncaught_cheats("p2"), 1);

    lobby.record_report("host", "p2");
    lobby.record_report("host", "p2");
    lobby.record_report("p2", "host");
    assert_eq!(lobby.report_count("host"), 2);
    assert_eq!(lobby.report_count("p2"), 1);
    assert_eq!(lobby.report_counts().len(), 2);
    let records = lobby.report_records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].reporter_id, "p2");
    assert_eq!(records[2].reported_id, "host");
}

#[test]
fn test_reset_for_new_game() {
    let mut lobby = lobby_with(&["host", "p2"]);
    lobby.toggle_ready("host");
    lobby.start_game();
    lobby.record_cheat("p2");
    lobby.reset_for_new_game();

    assert!(!lobby.is_game_started());
    assert!(lobby.active_player().is_none());
    assert!(!lobby.is_ready("host"));
    assert_eq!(lobby.cheat_count("p2"), 0);
    assert_eq!(lobby.players().len(), 2);
}
