#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crate::commands::Command;
    use crate::components::{retain_alive, Bullet, Unit};
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::grid::TileGrid;
    use crate::level::{LayerImages, Level};
    use crate::state::{GameState, Tuning};
    use crate::types::*;

    fn tank_at(x: f64, y: f64) -> Unit {
        Unit::new(DVec2::new(x, y), TileRef::new(1, 0))
    }

    // ---- Bounds ----

    #[test]
    fn test_is_inside_half_open_range() {
        let state = GameState::default();
        let (w, h) = (state.world_width() as f64, state.world_height() as f64);

        for y in 0..state.world_height() {
            for x in 0..state.world_width() {
                let p = DVec2::new(x as f64 + 0.99, y as f64);
                assert!(state.is_inside(p), "{p} should be inside");
            }
        }
        assert!(state.is_inside(DVec2::new(0.0, 0.0)));
        assert!(!state.is_inside(DVec2::new(w, 0.0)));
        assert!(!state.is_inside(DVec2::new(0.0, h)));
        assert!(!state.is_inside(DVec2::new(-0.01, 3.0)));
        assert!(!state.is_inside(DVec2::new(3.0, -0.01)));
        assert!(!state.is_inside(DVec2::new(f64::NAN, 3.0)));
    }

    // ---- Unit lookup ----

    #[test]
    fn test_find_unit_truncates_positions() {
        let mut state = GameState::default();
        state.units = vec![tank_at(3.0, 4.0), tank_at(5.0, 5.0)];

        assert_eq!(state.find_unit(DVec2::new(3.9, 4.99)), Some(UnitId(0)));
        assert_eq!(state.find_unit(DVec2::new(5.0, 5.5)), Some(UnitId(1)));
        assert_eq!(state.find_unit(DVec2::new(4.0, 4.0)), None);
        // Truncation, not flooring: -0.5 lands in cell 0.
        state.units[0].item.position = DVec2::new(0.0, 0.0);
        assert_eq!(state.find_unit(DVec2::new(-0.5, -0.5)), Some(UnitId(0)));
    }

    #[test]
    fn test_find_unit_returns_first_in_list_order() {
        let mut state = GameState::default();
        state.units = vec![tank_at(2.0, 2.0), tank_at(2.5, 2.5)];
        assert_eq!(state.find_unit(DVec2::new(2.1, 2.1)), Some(UnitId(0)));
    }

    #[test]
    fn test_find_live_unit_skips_destroyed() {
        let mut state = GameState::default();
        state.units = vec![tank_at(2.0, 2.0), tank_at(6.0, 2.0)];
        state.units[0].item.status = Status::Destroyed;

        assert_eq!(state.find_unit(DVec2::new(2.0, 2.0)), Some(UnitId(0)));
        assert_eq!(state.find_live_unit(DVec2::new(2.0, 2.0)), None);
        assert_eq!(state.find_live_unit(DVec2::new(6.2, 2.7)), Some(UnitId(1)));
        assert_eq!(state.live_units().count(), 1);
    }

    // ---- Walls ----

    #[test]
    fn test_is_wall() {
        let mut state = GameState::default();
        state.walls.set(4, 2, Some(TileRef::new(0, 0)));
        assert!(state.is_wall(DVec2::new(4.5, 2.5)));
        assert!(!state.is_wall(DVec2::new(5.0, 2.0)));
        assert!(!state.is_wall(DVec2::new(-1.0, 2.0)));
    }

    // ---- Bullets ----

    #[test]
    fn test_spawn_bullet_captures_aim() {
        let mut state = GameState::default();
        state.units = vec![tank_at(2.0, 2.0)];
        state.units[0].weapon_target = DVec2::new(6.0, 2.0);

        let first = state.spawn_bullet(UnitId(0)).unwrap();
        let second = state.spawn_bullet(UnitId(0)).unwrap();
        assert!(first < second, "bullet ids must increase");
        assert!(state.spawn_bullet(UnitId(7)).is_none());

        let bullet = state.bullet(first).unwrap();
        assert_eq!(bullet.position(), DVec2::new(2.0, 2.0));
        assert_eq!(bullet.start_position, DVec2::new(2.0, 2.0));
        assert_eq!(bullet.end_position, DVec2::new(6.0, 2.0));
        assert_eq!(bullet.shooter, UnitId(0));
        assert_eq!(bullet.item.tile, TileRef::new(2, 1));
        assert_eq!(bullet.direction(), DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_bullet_aimed_at_itself_has_no_direction() {
        let shooter = tank_at(3.0, 3.0);
        let mut aimed = shooter;
        aimed.weapon_target = aimed.position();
        let bullet = Bullet::spawn(BulletId(0), UnitId(0), &aimed);
        assert_eq!(bullet.direction(), DVec2::ZERO);
    }

    #[test]
    fn test_retain_alive_preserves_order() {
        let mut state = GameState::default();
        for _ in 0..5 {
            state.spawn_bullet(UnitId(0));
        }
        state.bullets[1].item.status = Status::Destroyed;
        state.bullets[3].item.status = Status::Destroyed;

        retain_alive(&mut state.bullets);

        let ids: Vec<u64> = state.bullets.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![0, 2, 4]);
        assert!(state.bullet(BulletId(2)).is_some());
        assert!(state.bullet(BulletId(3)).is_none());
    }

    // ---- Observers ----

    #[test]
    fn test_observers_notified_in_registration_order() {
        let mut state = GameState::default();
        state.units = vec![tank_at(1.0, 1.0), tank_at(3.0, 1.0)];
        state.epoch = 12;

        let (tx, rx) = mpsc::channel::<GameEvent>();
        let (tx_second, rx_second) = mpsc::channel::<GameEvent>();
        state.add_observer(Box::new(tx));
        state.add_observer(Box::new(tx_second));
        assert_eq!(state.observer_count(), 2);

        state.notify_unit_destroyed(UnitId(1));
        state.notify_unit_destroyed(UnitId(9));

        let events: Vec<GameEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        let GameEvent::UnitDestroyed(event) = &events[0];
        assert_eq!(event.unit, UnitId(1));
        assert_eq!(event.position, DVec2::new(3.0, 1.0));
        assert_eq!(event.epoch, 12);
        assert_eq!(rx_second.try_iter().count(), 1);
    }

    // ---- Level application ----

    #[test]
    fn test_apply_level_replaces_world_but_keeps_epoch_and_observers() {
        let mut state = GameState::default();
        let (tx, _rx) = mpsc::channel::<GameEvent>();
        state.add_observer(Box::new(tx));
        state.epoch = 40;
        state.spawn_bullet(UnitId(0));

        let level = Level {
            world_size: UVec2::new(4, 3),
            cell_size: UVec2::new(32, 32),
            ground: TileGrid::filled(4, 3, Some(TileRef::new(5, 1))),
            walls: TileGrid::empty(4, 3),
            units: vec![tank_at(0.0, 0.0), tank_at(3.0, 2.0)],
            player: UnitId(0),
            images: LayerImages::default(),
        };
        state.apply_level(level);

        assert_eq!(state.world_size, UVec2::new(4, 3));
        assert_eq!(state.units.len(), 2);
        assert!(state.bullets.is_empty());
        assert_eq!(state.epoch, 40);
        assert_eq!(state.observer_count(), 1);
        assert!(!state.is_inside(DVec2::new(4.0, 0.0)));
    }

    // ---- Geometry helpers ----

    #[test]
    fn test_weapon_angle_convention() {
        let mut unit = tank_at(5.0, 5.0);
        unit.weapon_target = DVec2::new(5.0, 0.0);
        assert!(unit.weapon_angle().abs() < 1e-9, "up should be 0°");
        unit.weapon_target = DVec2::new(0.0, 5.0);
        assert!((unit.weapon_angle() - 90.0).abs() < 1e-9, "left should be 90°");
        unit.weapon_target = DVec2::new(9.0, 5.0);
        assert!((unit.weapon_angle() + 90.0).abs() < 1e-9, "right should be -90°");
    }

    #[test]
    fn test_tile_from_local_id() {
        assert_eq!(TileRef::from_local_id(0, 8), TileRef::new(0, 0));
        assert_eq!(TileRef::from_local_id(13, 8), TileRef::new(5, 1));
    }

    #[test]
    fn test_tile_grid_rejects_wrong_cell_count() {
        assert!(TileGrid::from_cells(3, 2, vec![None; 5]).is_none());
        let grid = TileGrid::from_cells(2, 1, vec![None, Some(TileRef::new(1, 1))]).unwrap();
        let occupied: Vec<_> = grid.occupied().collect();
        assert_eq!(occupied, vec![(1, 0, TileRef::new(1, 1))]);
    }

    // ---- Serde ----

    #[test]
    fn test_command_serde() {
        let commands = vec![
            Command::Move {
                unit: UnitId(0),
                vector: IVec2::new(-1, 0),
            },
            Command::Target {
                unit: UnitId(1),
                target: DVec2::new(2.5, -1.0),
            },
            Command::Shoot { unit: UnitId(1) },
            Command::MoveBullet {
                bullet: BulletId(3),
            },
            Command::DeleteDestroyed,
        ];
        for command in commands {
            let json = serde_json::to_string(&command).unwrap();
            let back: Command = serde_json::from_str(&json).unwrap();
            assert_eq!(command, back);
        }
    }

    #[test]
    fn test_game_phase_serde() {
        for phase in [
            GamePhase::NoGame,
            GamePhase::Active,
            GamePhase::Over(Outcome::Victory),
            GamePhase::Over(Outcome::Defeat),
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            let back: GamePhase = serde_json::from_str(&json).unwrap();
            assert_eq!(phase, back);
        }
        assert!(GamePhase::Over(Outcome::Defeat).is_over());
        assert!(!GamePhase::Active.is_over());
    }

    #[test]
    fn test_tuning_defaults_and_partial_json() {
        let tuning: Tuning = serde_json::from_str(r#"{ "bullet_delay": 9 }"#).unwrap();
        assert_eq!(tuning.bullet_delay, 9);
        assert!((tuning.bullet_speed - 0.1).abs() < 1e-12);
        assert!((tuning.bullet_range - 4.0).abs() < 1e-12);
    }
}
