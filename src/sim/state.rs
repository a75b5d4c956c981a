//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: every pool, the station,
//! the round clock and the seeded RNG. Nothing lives in globals, so any
//! number of independent matches can run side by side.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::BonusPool;
use super::craft::CraftPool;
use super::effects::TimedEffectPool;
use super::station::Station;
use crate::consts::MAX_PLAYERS;
use crate::settings::Settings;
use crate::tuning::SimTuning;
use crate::PlayerId;

/// Score per player seat
pub type ScoreTable = [u64; MAX_PLAYERS];

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a start press
    GetReady,
    /// Crafts can move, weapons are locked
    Countdown,
    /// Active gameplay
    Play,
    /// Play frozen by a start press
    Paused,
    /// Between turns, pools torn down
    Transition,
    /// Last turn played, showing the winner
    Finished,
}

/// Sound cues for the host's audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Explosion,
    AsteroidLaunch,
    RocketLaunch,
    ShieldUse,
    PowerupUse,
    PickupPoints,
    /// Shield or upgrade picked up
    PickupCharge,
    PickupAmmo,
    ButtonClick,
}

/// Events emitted by the simulation, drained by the host every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SoundCue(Sound),
    MusicStart,
    MusicStop,
    PhaseChanged { from: RoundPhase, to: RoundPhase },
    /// Craft slot that was just destroyed
    CraftDestroyed { craft: usize },
    StationHit { damage: f32, attacker: PlayerId },
    MatchEnded { winner: Option<PlayerId> },
}

/// Complete simulation context (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub tuning: SimTuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (seconds since creation)
    pub clock: f32,
    pub phase: RoundPhase,
    /// Seconds left in the current timed phase
    pub phase_time: f32,
    pub scores: ScoreTable,
    pub winner: Option<PlayerId>,
    /// Defending player this round (0-based turn index)
    pub player_turn: usize,
    /// Set once the Finished phase has run out
    pub match_over: bool,
    pub station: Station,
    pub crafts: CraftPool,
    pub bonuses: BonusPool,
    pub effects: TimedEffectPool,
    /// Pending events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a match in GetReady for player turn 0
    pub fn new(settings: Settings, tuning: SimTuning) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "New match: {} player(s), {} bots, seed {}",
            settings.player_count,
            settings.difficulty.as_str(),
            seed
        );
        let mut state = Self {
            station: Station::new(0, &tuning),
            crafts: CraftPool::new(&tuning),
            bonuses: BonusPool::new(&tuning),
            effects: TimedEffectPool::new(&tuning),
            settings,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: 0.0,
            phase: RoundPhase::GetReady,
            phase_time: 0.0,
            scores: [0; MAX_PLAYERS],
            winner: None,
            player_turn: 0,
            match_over: false,
            events: Vec::new(),
        };
        state.init_round(0);
        state
    }

    /// Reinitialize every pool for `turn` and wait for a start press
    pub fn init_round(&mut self, turn: usize) {
        self.player_turn = turn;
        self.station = Station::new(turn, &self.tuning);
        self.crafts
            .init(turn, &self.settings, self.clock, &mut self.rng);
        self.bonuses.init();
        self.effects.init();
        self.phase = RoundPhase::GetReady;
        self.phase_time = 0.0;
        log::info!("Round ready: player {} defends", turn + 1);
    }

    /// Tear down every pool
    pub fn close_round(&mut self) {
        self.crafts.close();
        self.bonuses.close();
        self.effects.close();
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RoundPhase::Paused
    }

    /// Switch phase, recording the change
    pub(crate) fn enter_phase(&mut self, to: RoundPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Strict highest scorer; a tie for first place has no winner
    pub fn compute_winner(&self) -> Option<PlayerId> {
        let best = self.scores.iter().copied().max()?;
        let mut leaders = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == best);
        let (player, _) = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(player)
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AiDifficulty;

    fn state(players: usize) -> GameState {
        let mut settings = Settings::new(players, AiDifficulty::Medium);
        settings.seed = Some(42);
        GameState::new(settings, SimTuning::default())
    }

    #[test]
    fn test_new_state() {
        let state = state(2);
        assert_eq!(state.phase, RoundPhase::GetReady);
        assert_eq!(state.player_turn, 0);
        assert_eq!(state.station.player, 0);
        assert_eq!(state.station.hp, 100.0);
        assert_eq!(state.crafts.alive_count(), 3);
        assert_eq!(state.bonuses.slots.active_count(), 0);
        assert!(state.winner.is_none());
    }

    #[test]
    fn test_winner_strict_max() {
        let mut state = state(4);
        assert_eq!(state.compute_winner(), None);

        state.scores = [100, 2600, 1500, 0];
        assert_eq!(state.compute_winner(), Some(1));

        state.scores = [2600, 2600, 1500, 0];
        assert_eq!(state.compute_winner(), None);

        // A tie below first place doesn't matter
        state.scores = [3000, 1500, 1500, 0];
        assert_eq!(state.compute_winner(), Some(0));
    }

    #[test]
    fn test_enter_phase_records_event() {
        let mut state = state(1);
        state.enter_phase(RoundPhase::Countdown);
        state.enter_phase(RoundPhase::Countdown);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::PhaseChanged {
                from: RoundPhase::GetReady,
                to: RoundPhase::Countdown
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_zero_spread_tuning_runs() {
        let tuning = SimTuning::from_json(
            r#"{"initial_angle_jitter": 0.0, "bonus_drift": 0.0, "bonus_pitch_range_deg": 0.0}"#,
        );
        let Ok(tuning) = tuning else {
            panic!("zero spreads should validate");
        };
        let mut settings = Settings::new(1, AiDifficulty::Easy);
        settings.seed = Some(3);
        let mut state = GameState::new(settings, tuning);
        assert!(state.crafts.crafts.iter().all(|c| c.yaw == 0.0 && c.pitch == 0.0));

        state.bonuses.update(10.0, &mut state.rng);
        let spawned: Vec<_> = state.bonuses.slots.iter().map(|(_, b)| *b).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].polar.pitch, 0.0);
        assert_eq!(spawned[0].pitch_speed, 0.0);
    }

    #[test]
    fn test_init_round_rotates_station() {
        let mut state = state(3);
        state.station.apply_damage(40.0);
        state.init_round(2);
        assert_eq!(state.station.player, 2);
        assert_eq!(state.station.hp, 100.0);
        assert!(state.crafts.crafts.iter().all(|c| c.player != 2));
    }
}
