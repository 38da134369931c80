use super::*;
use chrono::Duration;

#[test]
fn test_generate_lobby_id_format() {
    for _ in 0..50 {
        let id = generate_lobby_id();
        assert_eq!(id.len(), 6);
        let letters = id.chars().filter(|c| c.is_ascii_lowercase()).count();
        let digits = id.chars().filter(|c| c.is_ascii_digit()).count();
        assert_eq!((letters, digits), (3, 3));
        let head = &id[..3];
        assert!(
            head.chars().all(|c| c.is_ascii_lowercase()) || head.chars().all(|c| c.is_ascii_digit())
        );
    }
}

#[test]
fn test_create_lobby_assigns_host_color() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    let lobby = service.get_lobby(&lobby_id).unwrap();
    assert_eq!(lobby.host_player(), "host");
    assert_eq!(lobby.players(), ["host".to_string()]);
    assert!(service.player_color(&lobby_id, "host").is_ok());
}

#[test]
fn test_get_lobby_errors() {
    let service = LobbyService::default();
    assert_eq!(
        service.get_lobby("").unwrap_err().to_string(),
        "ID of Lobby must not be empty"
    );
    assert_eq!(
        service.get_lobby("abc123").unwrap_err().to_string(),
        "Lobby with id abc123 not found"
    );
}

#[test]
fn test_join_lobby_until_full() {
    let service = LobbyService::new(2);
    let lobby_id = service.create_lobby("host").unwrap();
    let color = service.join_lobby(&lobby_id, "guest").unwrap();
    assert_ne!(Some(color), service.get_lobby(&lobby_id).unwrap().color_of("host"));

    let err = service.join_lobby(&lobby_id, "late").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to join lobby: lobby session not found or full"
    );
    assert_eq!(
        service.join_lobby("missing", "late"),
        Err(GameError::JoinLobbyFailed)
    );
}

#[test]
fn test_join_started_lobby_fails() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    service
        .with_lobby_mut(&lobby_id, |lobby| {
            lobby.start_game();
            Ok(())
        })
        .unwrap();
    assert_eq!(
        service.join_lobby(&lobby_id, "guest"),
        Err(GameError::JoinLobbyFailed)
    );
}

#[test]
fn test_player_cannot_belong_to_two_lobbies() {
    let service = LobbyService::default();
    let first = service.create_lobby("host").unwrap();
    let second = service.create_lobby("other").unwrap();
    service.join_lobby(&first, "guest").unwrap();

    assert_eq!(service.create_lobby("host"), Err(GameError::JoinLobbyFailed));
    assert_eq!(service.join_lobby(&second, "guest"), Err(GameError::JoinLobbyFailed));
    assert_eq!(service.join_lobby(&second, "host"), Err(GameError::JoinLobbyFailed));
    assert!(!service.get_lobby(&second).unwrap().contains_player("guest"));
    assert_eq!(service.lobby_of_player("guest"), Some(first.clone()));

    // 重复加入自己所在的大厅仍返回原颜色
    let color = service.get_lobby(&first).unwrap().color_of("guest");
    assert_eq!(service.join_lobby(&first, "guest").ok(), color);

    // 离开后可以加入别的大厅
    service.leave_lobby(&first, "guest").unwrap();
    assert!(service.join_lobby(&second, "guest").is_ok());
}

#[test]
fn test_max_players_bounded_by_palette() {
    let service = LobbyService::new(10);
    assert_eq!(service.max_players(), 6);
    let lobby_id = service.create_lobby("p0").unwrap();
    for i in 1..6 {
        service.join_lobby(&lobby_id, &format!("p{}", i)).unwrap();
    }
    assert!(service.join_lobby(&lobby_id, "p6").is_err());
}

#[test]
fn test_leave_lobby_restores_color_and_removes_empty() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    let color = service.join_lobby(&lobby_id, "guest").unwrap();

    assert!(service.leave_lobby(&lobby_id, "guest").unwrap());
    let lobby = service.get_lobby(&lobby_id).unwrap();
    assert!(lobby.available_colors().contains(&color));
    assert!(!lobby.contains_player("guest"));

    assert!(!service.leave_lobby(&lobby_id, "host").unwrap());
    assert!(!service.contains(&lobby_id));
}

#[test]
fn test_player_color_missing() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    let err = service.player_color(&lobby_id, "stranger").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("No color for player found: playerId=stranger, lobbyId={}", lobby_id)
    );
}

#[test]
fn test_check_player_turn() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    service.join_lobby(&lobby_id, "guest").unwrap();
    service
        .with_lobby_mut(&lobby_id, |lobby| {
            lobby.set_player_order(vec!["host".into(), "guest".into()]);
            Ok(())
        })
        .unwrap();
    assert!(service.check_player_turn(&lobby_id, "host").is_ok());
    assert_eq!(
        service.check_player_turn(&lobby_id, "guest"),
        Err(GameError::NotYourTurn)
    );
}

#[test]
fn test_open_lobbies_newest_first_and_excludes_started() {
    let service = LobbyService::default();
    let old = service.create_lobby("a").unwrap();
    let new = service.create_lobby("b").unwrap();
    let started = service.create_lobby("c").unwrap();
    service
        .with_lobby_mut(&old, |lobby| {
            lobby.set_created_at(Utc::now() - Duration::minutes(5));
            Ok(())
        })
        .unwrap();
    service
        .with_lobby_mut(&started, |lobby| {
            lobby.start_game();
            Ok(())
        })
        .unwrap();

    let open = service.open_lobbies();
    let ids: Vec<&str> = open.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![new.as_str(), old.as_str()]);
    assert_eq!(open[0].host_player, "b");
    assert_eq!(open[0].player_count, 1);
}

#[test]
fn test_lobby_of_player_and_age_queries() {
    let service = LobbyService::default();
    let lobby_id = service.create_lobby("host").unwrap();
    assert_eq!(service.lobby_of_player("host"), Some(lobby_id.clone()));
    assert_eq!(service.lobby_of_player("nobody"), None);

    assert!(service.lobbies_older_than(Utc::now() - Duration::hours(1)).is_empty());
    service
        .with_lobby_mut(&lobby_id, |lobby| {
            lobby.set_created_at(Utc::now() - Duration::days(3));
            Ok(())
        })
        .unwrap();
    assert_eq!(
        service.lobbies_older_than(Utc::now() - Duration::days(2)),
        vec![lobby_id.clone()]
    );
    assert!(service.remove_lobby(&lobby_id).is_some());
    assert_eq!(service.count(), 0);
}
