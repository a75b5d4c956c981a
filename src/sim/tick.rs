//! Per-frame simulation tick
//!
//! Drives the round state machine:
//! GetReady → Countdown → Play ⇄ Paused → Transition → GetReady (next turn),
//! or Finished after the last turn.

use super::craft::CraftContext;
use super::input::TickInput;
use super::state::{GameEvent, GameState, RoundPhase, Sound};
use super::view::ScreenProjector;

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, view: &dyn ScreenProjector, dt: f32) {
    if state.match_over {
        return;
    }

    let start = input.start_pressed();
    match state.phase {
        RoundPhase::GetReady => {
            if start {
                state.events.push(GameEvent::SoundCue(Sound::ButtonClick));
                state.phase_time = state.tuning.countdown_secs;
                state.enter_phase(RoundPhase::Countdown);
                state.events.push(GameEvent::MusicStart);
            }
            return;
        }
        RoundPhase::Paused => {
            if start {
                state.events.push(GameEvent::SoundCue(Sound::ButtonClick));
                state.enter_phase(RoundPhase::Play);
            }
            return;
        }
        RoundPhase::Play if start => {
            state.events.push(GameEvent::SoundCue(Sound::ButtonClick));
            state.enter_phase(RoundPhase::Paused);
            return;
        }
        RoundPhase::Countdown | RoundPhase::Play => {
            let weapons_live = state.phase == RoundPhase::Play;
            update_world(state, input, view, dt, weapons_live);
        }
        RoundPhase::Transition | RoundPhase::Finished => {}
    }

    state.phase_time -= dt;
    let expired = state.phase_time <= 0.0;
    match state.phase {
        RoundPhase::Countdown if expired => {
            state.phase_time = state.tuning.play_secs;
            state.enter_phase(RoundPhase::Play);
        }
        RoundPhase::Play => {
            if expired {
                end_turn(state, "time up");
            } else if state.station.is_destroyed() {
                end_turn(state, "station destroyed");
            } else if !state.crafts.any_alive() {
                end_turn(state, "all crafts destroyed");
            }
        }
        RoundPhase::Transition if expired => {
            state.events.push(GameEvent::MusicStop);
            state.enter_phase(RoundPhase::GetReady);
            state.init_round(state.player_turn);
        }
        RoundPhase::Finished if expired => {
            state.events.push(GameEvent::MusicStop);
            state.events.push(GameEvent::MatchEnded {
                winner: state.winner,
            });
            state.match_over = true;
            match state.winner {
                Some(player) => log::info!("Match over, player {} wins", player + 1),
                None => log::info!("Match over, no winner"),
            }
        }
        _ => {}
    }
}

fn update_world(
    state: &mut GameState,
    input: &TickInput,
    view: &dyn ScreenProjector,
    dt: f32,
    weapons_live: bool,
) {
    state.clock += dt;
    state.bonuses.update(dt, &mut state.rng);

    let mut ctx = CraftContext {
        now: state.clock,
        weapons_live,
        difficulty: state.settings.difficulty,
        station: &mut state.station,
        bonuses: &mut state.bonuses,
        effects: &mut state.effects,
        scores: &mut state.scores,
        events: &mut state.events,
        rng: &mut state.rng,
    };
    state.crafts.update(dt, input, view, &mut ctx);

    state.effects.update(dt);
}

/// Close the current round and move to the next turn or the results
fn end_turn(state: &mut GameState, reason: &str) {
    log::info!(
        "Turn {} over ({}), scores {:?}",
        state.player_turn + 1,
        reason,
        state.scores
    );
    state.player_turn += 1;
    state.close_round();

    if state.player_turn < state.settings.player_count {
        state.phase_time = state.tuning.transition_secs;
        state.enter_phase(RoundPhase::Transition);
    } else {
        state.winner = state.compute_winner();
        state.phase_time = state.tuning.finished_secs;
        state.enter_phase(RoundPhase::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::{AiDifficulty, Settings};
    use crate::sim::view::PinholeView;
    use crate::tuning::SimTuning;

    fn new_state(players: usize, seed: u64) -> GameState {
        let mut settings = Settings::new(players, AiDifficulty::Hard);
        settings.seed = Some(seed);
        GameState::new(settings, SimTuning::default())
    }

    fn view() -> PinholeView {
        PinholeView::new(320.0, 240.0, 75.0)
    }

    fn in_play(players: usize, time_left: f32) -> GameState {
        let mut state = new_state(players, 12345);
        state.phase = RoundPhase::Play;
        state.phase_time = time_left;
        state
    }

    #[test]
    fn test_start_enters_countdown() {
        let mut state = new_state(1, 12345);
        tick(&mut state, &TickInput::default(), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::GetReady);

        tick(&mut state, &TickInput::with_start(0), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::Countdown);
        assert_eq!(state.phase_time, 5.0);
        assert!(state.events.contains(&GameEvent::MusicStart));
    }

    #[test]
    fn test_countdown_exact_duration() {
        let mut state = new_state(1, 12345);
        tick(&mut state, &TickInput::with_start(0), &view(), 0.5);
        for _ in 0..9 {
            tick(&mut state, &TickInput::default(), &view(), 0.5);
            assert_eq!(state.phase, RoundPhase::Countdown);
        }
        tick(&mut state, &TickInput::default(), &view(), 0.5);
        assert_eq!(state.phase, RoundPhase::Play);
        assert_eq!(state.phase_time, 180.0);
    }

    #[test]
    fn test_countdown_moves_crafts_but_never_fires() {
        let mut state = new_state(1, 7);
        tick(&mut state, &TickInput::with_start(0), &view(), FRAME_DT);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), &view(), FRAME_DT);
        }
        assert_eq!(state.phase, RoundPhase::Countdown);
        for craft in &state.crafts.crafts {
            assert_eq!(craft.asteroids.slots.active_count(), 0);
        }
    }

    #[test]
    fn test_play_expiry_with_turns_left() {
        let mut state = in_play(2, 0.01);
        tick(&mut state, &TickInput::default(), &view(), 0.02);
        assert_eq!(state.phase, RoundPhase::Transition);
        assert_eq!(state.player_turn, 1);
        assert_eq!(state.phase_time, 10.0);
        assert!(!state.crafts.any_alive());
    }

    #[test]
    fn test_play_expiry_last_turn() {
        let mut state = in_play(1, 0.01);
        state.scores = [0, 500, 0, 0];
        tick(&mut state, &TickInput::default(), &view(), 0.02);
        assert_eq!(state.phase, RoundPhase::Finished);
        assert_eq!(state.winner, Some(1));

        tick(&mut state, &TickInput::default(), &view(), 10.0);
        assert!(state.match_over);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::MusicStop));
        assert!(events.contains(&GameEvent::MatchEnded { winner: Some(1) }));

        // Nothing happens after the match ends
        tick(&mut state, &TickInput::with_start(0), &view(), 1.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_tied_scores_have_no_winner() {
        let mut state = in_play(1, 0.01);
        state.scores = [2600, 2600, 0, 0];
        tick(&mut state, &TickInput::default(), &view(), 0.02);
        assert_eq!(state.phase, RoundPhase::Finished);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_station_destroyed_ends_turn() {
        let mut state = in_play(2, 100.0);
        state.station.apply_damage(500.0);
        tick(&mut state, &TickInput::default(), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::Transition);
    }

    #[test]
    fn test_all_crafts_destroyed_ends_turn() {
        let mut state = in_play(2, 100.0);
        for craft in &mut state.crafts.crafts {
            craft.apply_damage(1000.0);
        }
        tick(&mut state, &TickInput::default(), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::Transition);
        let destroyed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CraftDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 3);
    }

    #[test]
    fn test_transition_sets_up_next_turn() {
        let mut state = in_play(3, 0.01);
        tick(&mut state, &TickInput::default(), &view(), 0.02);
        tick(&mut state, &TickInput::default(), &view(), 10.0);
        assert_eq!(state.phase, RoundPhase::GetReady);
        assert_eq!(state.station.player, 1);
        assert_eq!(state.crafts.alive_count(), 3);
        assert!(state.crafts.crafts.iter().all(|c| c.player != 1));
        assert!(state.events.contains(&GameEvent::MusicStop));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = in_play(1, 100.0);
        let clock = state.clock;

        tick(&mut state, &TickInput::with_start(0), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::Paused);
        assert!(state.is_paused());

        // Frozen while paused
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &view(), FRAME_DT);
        }
        assert_eq!(state.phase_time, 100.0);
        assert_eq!(state.clock, clock);

        tick(&mut state, &TickInput::with_start(0), &view(), FRAME_DT);
        assert_eq!(state.phase, RoundPhase::Play);
        assert_eq!(state.phase_time, 100.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(1, 99999);
        let mut state2 = new_state(1, 99999);
        let view = view();

        for frame in 0..1200 {
            let input = if frame == 0 {
                TickInput::with_start(0)
            } else {
                TickInput::default()
            };
            tick(&mut state1, &input, &view, FRAME_DT);
            tick(&mut state2, &input, &view, FRAME_DT);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.scores, state2.scores);
        assert_eq!(state1.station.hp, state2.station.hp);
        assert_eq!(
            serde_json::to_string(&state1.crafts).ok(),
            serde_json::to_string(&state2.crafts).ok()
        );
        assert_eq!(
            serde_json::to_string(&state1.bonuses).ok(),
            serde_json::to_string(&state2.bonuses).ok()
        );
    }

    #[test]
    fn test_full_match_terminates() {
        let mut state = new_state(2, 31337);
        let view = view();
        let mut frames = 0;
        while !state.match_over && frames < 5000 {
            let input = if state.phase == RoundPhase::GetReady {
                TickInput::with_start(state.player_turn)
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, &view, 0.5);
            frames += 1;
        }
        assert!(state.match_over);
        assert_eq!(state.player_turn, 2);
    }
}
