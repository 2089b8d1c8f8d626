//! Integration tests for melee, consumables and death.

mod common;

use common::{arena, log_texts, new_state, set_player_position, spawn};
use derelict::{
    first_aid_kit, space_bomb, space_gun, tiada, untung, ConcreteAction, DerelictError, Direction,
    GameCompletionState, GameConfig, GameState, MessageColor, Position, RenderOrder, TileType,
    TurnOutcome,
};

fn rejected(reason: &str) -> TurnOutcome {
    TurnOutcome::Rejected {
        reason: reason.to_string(),
    }
}

#[test]
fn test_three_power_against_ten_hp() {
    let mut state = new_state(5);
    let start = arena(&mut state);
    state
        .entities
        .get_mut(&state.player_id)
        .unwrap()
        .fighter_mut()
        .unwrap()
        .power = 3;
    let alien = spawn(&mut state, untung().at(start.step(Direction::East)));

    let mut hp_sequence = vec![10];
    for _ in 0..4 {
        state
            .handle_player_action(ConcreteAction::bump(state.player_id, Direction::East))
            .unwrap();
        hp_sequence.push(state.entity(alien).unwrap().fighter().unwrap().hp());
    }
    assert_eq!(hp_sequence, vec![10, 7, 4, 1, 0]);

    let corpse = state.entity(alien).unwrap();
    assert!(!corpse.is_alive());
    assert!(!corpse.blocks_movement);
    assert_eq!(corpse.render_order, RenderOrder::Corpse);
    assert_eq!(corpse.name, "remains of Untung");
    assert_eq!(corpse.glyph, '%');

    let deaths = log_texts(&state)
        .iter()
        .filter(|text| text.as_str() == "Untung is dead!")
        .count();
    assert_eq!(deaths, 1);
    assert_eq!(state.statistics.enemies_defeated, 1);

    // The corpse no longer blocks; bumping walks onto it
    state
        .handle_player_action(ConcreteAction::bump(state.player_id, Direction::East))
        .unwrap();
    assert_eq!(state.player().unwrap().position, start.step(Direction::East));
    assert_eq!(state.entity(alien).unwrap().name, "remains of Untung");
}

#[test]
fn test_attack_messages() {
    let mut state = new_state(5);
    let start = arena(&mut state);
    let armored = spawn(&mut state, tiada().at(start.step(Direction::South)));
    state
        .entities
        .get_mut(&armored)
        .unwrap()
        .fighter_mut()
        .unwrap()
        .defense = 9;

    state
        .handle_player_action(ConcreteAction::bump(state.player_id, Direction::South))
        .unwrap();

    let texts = log_texts(&state);
    assert!(texts.contains(&"Player attacks Tiada but does no damage.".to_string()));
    // Tiada power 4 against player defense 2
    assert!(texts.contains(&"Tiada attacks Player for 2 hit points.".to_string()));
    assert_eq!(state.status().hp, 28);
    assert_eq!(state.statistics.damage_taken, 2);
}

#[test]
fn test_pick_up_fails_at_capacity() {
    let mut config = GameConfig::for_testing();
    config.player_inventory_capacity = 1;
    let mut state = GameState::new(config, 9).unwrap();
    let start = arena(&mut state);

    spawn(&mut state, first_aid_kit().at(start));
    state
        .handle_player_action(ConcreteAction::pick_up(state.player_id))
        .unwrap();
    assert_eq!(state.inventory_items().len(), 1);

    let second = spawn(&mut state, space_gun().at(start));
    let outcome = state
        .handle_player_action(ConcreteAction::pick_up(state.player_id))
        .unwrap();
    assert_eq!(outcome, rejected("Your inventory is full."));
    assert_eq!(state.inventory_items().len(), 1);
    assert!(state.level.contains_entity(&second));
}

#[test]
fn test_pick_up_with_nothing_here() {
    let mut state = new_state(9);
    arena(&mut state);
    let turn = state.turn_number;
    let outcome = state
        .handle_player_action(ConcreteAction::pick_up(state.player_id))
        .unwrap();
    assert_eq!(outcome, rejected("There is nothing here to pick up."));
    assert_eq!(state.turn_number, turn);
}

/// Picks up an item placed under the player and returns its id.
fn give(state: &mut GameState, item: derelict::Entity) -> derelict::EntityId {
    let pos = state.player().unwrap().position;
    let id = spawn(state, item.at(pos));
    state
        .handle_player_action(ConcreteAction::pick_up(state.player_id))
        .unwrap();
    id
}

#[test]
fn test_gun_targeting_rules() {
    let mut state = new_state(13);
    let start = arena(&mut state);
    let gun = give(&mut state, space_gun());
    let player = state.player_id;

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, None))
        .unwrap();
    assert_eq!(outcome, rejected("You must select an enemy to target."));

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, Some(start)))
        .unwrap();
    assert_eq!(outcome, rejected("You cannot shoot yourself!"));

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, Some(Position::new(8, 8))))
        .unwrap();
    assert_eq!(outcome, rejected("You must select an enemy to target."));

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, Some(Position::new(17, 17))))
        .unwrap();
    assert_eq!(outcome, rejected("You cannot target an area that you cannot see."));

    let far = spawn(&mut state, untung().at(Position::new(12, 5)));
    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, Some(Position::new(12, 5))))
        .unwrap();
    assert_eq!(outcome, rejected("The target is too far away."));
    assert_eq!(state.inventory_items().len(), 1);

    let near = spawn(&mut state, tiada().at(Position::new(8, 5)));
    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, gun, Some(Position::new(8, 5))))
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Advanced);
    // Gun damage ignores defense
    assert!(!state.entity(near).unwrap().is_alive());
    assert!(state.entity(far).unwrap().is_alive());
    assert!(state.inventory_items().is_empty());
    assert!(state.entity(gun).is_err());
}

#[test]
fn test_bomb_hits_everyone_in_radius() {
    let mut state = new_state(21);
    arena(&mut state);
    let bomb = give(&mut state, space_bomb());
    let player = state.player_id;

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, bomb, Some(Position::new(5, 12))))
        .unwrap();
    assert_eq!(outcome, rejected("There are no targets in the radius."));

    let a = spawn(&mut state, untung().at(Position::new(9, 5)));
    let b = spawn(&mut state, tiada().at(Position::new(10, 6)));
    let outside = spawn(&mut state, untung().at(Position::new(14, 5)));

    let outcome = state
        .handle_player_action(ConcreteAction::use_item(player, bomb, Some(Position::new(10, 5))))
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Advanced);

    assert!(!state.entity(a).unwrap().is_alive());
    // Tiada has 16 hp
    assert_eq!(state.entity(b).unwrap().fighter().unwrap().hp(), 4);
    assert_eq!(state.entity(outside).unwrap().fighter().unwrap().hp(), 10);
    // The player stands 5 cells away and is spared
    assert_eq!(state.status().hp, 30);

    let texts = log_texts(&state);
    assert!(texts.contains(&"The Untung is caught in the blast, taking 12 damage!".to_string()));
    assert!(texts.contains(&"The Tiada is caught in the blast, taking 12 damage!".to_string()));
}

#[test]
fn test_bomb_can_hurt_the_player() {
    let mut state = new_state(22);
    let start = arena(&mut state);
    let bomb = give(&mut state, space_bomb());

    state
        .handle_player_action(ConcreteAction::use_item(state.player_id, bomb, Some(start)))
        .unwrap();
    assert_eq!(state.status().hp, 18);
}

#[test]
fn test_player_death_ends_the_game() {
    let mut state = new_state(30);
    let start = arena(&mut state);
    state
        .entities
        .get_mut(&state.player_id)
        .unwrap()
        .fighter_mut()
        .unwrap()
        .set_hp(1);
    spawn(&mut state, tiada().at(start.step(Direction::North)));
    spawn(&mut state, tiada().at(start.step(Direction::South)));

    let outcome = state
        .handle_player_action(ConcreteAction::wait(state.player_id))
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Advanced);
    assert_eq!(state.completion_state, GameCompletionState::PlayerDied);
    assert_eq!(state.statistics.deaths, 1);

    let player = state.player().unwrap();
    assert_eq!(player.name, "remains of Player");
    assert_eq!(state.status().hp, 0);

    // The second alien never got to act
    let enemy_attacks = state
        .message_log()
        .messages()
        .iter()
        .filter(|m| m.color == MessageColor::EnemyAttack)
        .count();
    assert_eq!(enemy_attacks, 1);
    assert_eq!(
        state.message_log().last().unwrap().plain_text,
        "You died!"
    );

    let result = state.handle_player_action(ConcreteAction::wait(state.player_id));
    assert!(matches!(result, Err(DerelictError::GameEnded)));
}

#[test]
fn test_aliens_ignore_player_out_of_sight() {
    let mut state = new_state(31);
    arena(&mut state);
    let far = Position::new(17, 17);
    let alien = spawn(&mut state, untung().at(far));
    assert!(!state.level.is_visible(far));

    state
        .handle_player_action(ConcreteAction::wait(state.player_id))
        .unwrap();
    assert_eq!(state.entity(alien).unwrap().position, far);
}

#[test]
fn test_aliens_chase_visible_player() {
    let mut state = new_state(32);
    arena(&mut state);
    let alien = spawn(&mut state, untung().at(Position::new(10, 5)));

    state
        .handle_player_action(ConcreteAction::wait(state.player_id))
        .unwrap();
    assert_eq!(state.entity(alien).unwrap().position, Position::new(9, 5));
}

#[test]
fn test_blocked_alien_loses_its_turn_quietly() {
    let mut state = new_state(33);
    arena(&mut state);
    // Turn the top row into a one-cell-wide corridor
    for x in 1..19 {
        state.level.set_tile(Position::new(x, 2), TileType::Wall).unwrap();
    }
    set_player_position(&mut state, Position::new(1, 1));
    state.update_fov().unwrap();

    let front = spawn(&mut state, untung().at(Position::new(2, 1)));
    let back = spawn(&mut state, untung().at(Position::new(3, 1)));

    let outcome = state
        .handle_player_action(ConcreteAction::wait(state.player_id))
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Advanced);
    assert_eq!(state.turn_number, 1);
    assert_eq!(state.entity(front).unwrap().position, Position::new(2, 1));
    assert_eq!(state.entity(back).unwrap().position, Position::new(3, 1));
    // Only the front alien reached the player
    assert_eq!(state.status().hp, 29);
    assert!(!log_texts(&state).contains(&"That way is blocked.".to_string()));
}
