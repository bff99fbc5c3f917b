use std::time::Duration;

use rand::Rng;

use crate::config::Config;
use crate::input::Command;
use crate::persistence::Storage;
use crate::sim::{self, StepOutcome};
use crate::state::GameState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Control {
    Continue,
    Quit,
}

/// Owns the live game and everything that mutates it.
pub struct Game<S, R> {
    config: Config,
    state: GameState,
    high_score: u32,
    store: S,
    rng: R,
    since_last_step: Duration,
}

impl<S: Storage, R: Rng> Game<S, R> {
    pub fn new(config: Config, store: S, mut rng: R) -> Self {
        let high_score = store.load_high_score();
        let state = GameState::new(&config, &mut rng);
        log::info!("Starting with high score {}", high_score);
        Game {
            config,
            state,
            high_score,
            store,
            rng,
            since_last_step: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn apply(&mut self, command: Command) -> Control {
        match command {
            Command::Move(direction) => {
                if !self.state.turn(direction, &self.config) {
                    log::debug!("Ignoring {:?} while heading {:?}", direction, self.state.direction);
                }
            }
            Command::TogglePause => {
                self.state.toggle_pause();
            }
            Command::Save => self.store.save_game(&self.state.snapshot()),
            Command::Load => self.load(),
            Command::Restart => {
                self.state.reset(&self.config, &mut self.rng);
                self.since_last_step = Duration::ZERO;
            }
            Command::Quit => return Control::Quit,
        }
        Control::Continue
    }

    fn load(&mut self) {
        let Some(saved) = self.store.load_game() else {
            return;
        };
        if let Some(saved_at) = saved.saved_at {
            log::info!("Resuming game saved {}", saved_at.format("%Y-%m-%d %H:%M:%S"));
        }
        if let Err(e) = self.state.restore(saved, &self.config) {
            log::warn!("Discarding saved game: {}", e);
        }
    }

    /// Runs one simulation step, recording a new high score when the game ends.
    pub fn tick(&mut self) -> StepOutcome {
        let outcome = sim::step(&mut self.state, &self.config, &mut self.rng);
        if outcome == StepOutcome::Crashed && self.state.score > self.high_score {
            self.high_score = self.state.score;
            self.store.save_high_score(self.high_score);
            log::info!("New high score: {}", self.high_score);
        }
        outcome
    }

    /// Feeds elapsed frame time; steps once when the current tick interval has passed.
    ///
    /// Time past the interval carries into the next step, at most one interval's worth.
    pub fn advance(&mut self, dt: Duration) -> StepOutcome {
        if self.state.paused || self.state.game_over {
            self.since_last_step = Duration::ZERO;
            return StepOutcome::Idle;
        }
        self.since_last_step += dt;
        let interval = self.config.tick_interval(self.state.speed, self.state.score);
        if self.since_last_step < interval {
            return StepOutcome::Idle;
        }
        self.since_last_step = (self.since_last_step - interval).min(interval);
        self.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Direction, Position, SavedGame};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct MemoryStore {
        high_score: u32,
        high_score_writes: usize,
        saved: Option<SavedGame>,
    }

    impl Storage for MemoryStore {
        fn load_high_score(&self) -> u32 {
            self.high_score
        }

        fn save_high_score(&mut self, value: u32) {
            self.high_score = value;
            self.high_score_writes += 1;
        }

        fn save_game(&mut self, game: &SavedGame) {
            self.saved = Some(game.clone());
        }

        fn load_game(&self) -> Option<SavedGame> {
            self.saved.clone()
        }
    }

    fn game_with(store: MemoryStore) -> Game<MemoryStore, StdRng> {
        Game::new(Config::default(), store, StdRng::seed_from_u64(11))
    }

    fn game() -> Game<MemoryStore, StdRng> {
        game_with(MemoryStore::default())
    }

    /// Lays out a coil whose next step down runs into its own body.
    fn doom(game: &mut Game<MemoryStore, StdRng>, score: u32) {
        game.state.snake = vec![
            Position::new(40, 20),
            Position::new(60, 20),
            Position::new(60, 40),
            Position::new(40, 40),
            Position::new(20, 40),
        ];
        game.state.direction = Direction::Down;
        game.state.food = Position::new(400, 400);
        game.state.score = score;
    }

    #[test]
    fn loads_high_score_at_start() {
        let game = game_with(MemoryStore { high_score: 9, ..Default::default() });
        assert_eq!(game.high_score(), 9);
    }

    #[test]
    fn different_key_in_between_breaks_the_boost_chain() {
        let mut game = game();
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 10);
        game.apply(Command::Move(Direction::Left));
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 10);

        // Up again is rejected on the same axis: no direction change, no boost.
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 10);
        assert_eq!(game.state().last_direction_key, Some(Direction::Up));
    }

    #[test]
    fn same_key_twice_boosts_speed_up_to_max() {
        let mut game = game();
        game.apply(Command::Move(Direction::Up));
        game.apply(Command::Move(Direction::Right));
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 10);

        // Same key twice, with the direction freed up between presses.
        game.state.direction = Direction::Right;
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 12);

        for _ in 0..10 {
            game.state.direction = Direction::Left;
            game.apply(Command::Move(Direction::Up));
        }
        assert_eq!(game.state().speed, 25);
    }

    #[test]
    fn double_tap_carries_across_a_load() {
        let saved = SavedGame {
            snake: vec![Position::new(100, 100)],
            direction: Direction::Left,
            food: Position::new(200, 200),
            score: 0,
            speed: 10,
            saved_at: None,
        };
        let mut game = game_with(MemoryStore { saved: Some(saved), ..Default::default() });
        game.apply(Command::Move(Direction::Up));
        game.apply(Command::Load);
        assert_eq!(game.state().direction, Direction::Left);
        game.apply(Command::Move(Direction::Up));
        assert_eq!(game.state().speed, 12);
    }

    #[test]
    fn reversal_is_ignored() {
        let mut game = game();
        game.apply(Command::Move(Direction::Left));
        assert_eq!(game.state().direction, Direction::Right);
        assert_eq!(game.state().last_direction_key, None);
        game.apply(Command::Move(Direction::Down));
        assert_eq!(game.state().direction, Direction::Down);
    }

    #[test]
    fn pause_stops_ticks_but_not_after_game_over() {
        let mut game = game();
        game.apply(Command::TogglePause);
        assert!(game.state().paused);
        let before = game.state().clone();
        assert_eq!(game.tick(), StepOutcome::Idle);
        assert_eq!(game.state(), &before);
        game.apply(Command::TogglePause);
        assert!(!game.state().paused);

        game.state.game_over = true;
        game.apply(Command::TogglePause);
        assert!(!game.state().paused);
    }

    #[test]
    fn crash_records_new_high_score_once() {
        let mut game = game_with(MemoryStore { high_score: 3, ..Default::default() });
        doom(&mut game, 5);
        assert_eq!(game.tick(), StepOutcome::Crashed);
        assert!(game.state().game_over);
        assert_eq!(game.high_score(), 5);
        assert_eq!(game.tick(), StepOutcome::Idle);
        assert_eq!(game.store.high_score, 5);
        assert_eq!(game.store.high_score_writes, 1);
    }

    #[test]
    fn crash_below_high_score_writes_nothing() {
        let mut game = game_with(MemoryStore { high_score: 8, ..Default::default() });
        doom(&mut game, 8);
        assert_eq!(game.tick(), StepOutcome::Crashed);
        assert_eq!(game.high_score(), 8);
        assert_eq!(game.store.high_score_writes, 0);
    }

    #[test]
    fn save_then_load_restores_the_game() {
        let mut game = game();
        game.state.snake = vec![Position::new(80, 80), Position::new(60, 80)];
        game.state.food = Position::new(300, 200);
        game.state.score = 4;
        game.state.speed = 14;
        game.apply(Command::Save);
        let saved = game.state().clone();

        game.apply(Command::Restart);
        for _ in 0..3 {
            game.tick();
        }
        game.state.paused = true;

        game.apply(Command::Load);
        let state = game.state();
        assert_eq!(state.snake, saved.snake);
        assert_eq!(state.direction, saved.direction);
        assert_eq!(state.food, saved.food);
        assert_eq!(state.score, 4);
        assert_eq!(state.speed, 14);
        assert!(!state.paused);
        assert!(!state.game_over);
    }

    #[test]
    fn load_without_save_changes_nothing() {
        let mut game = game();
        game.state.paused = true;
        let before = game.state().clone();
        game.apply(Command::Load);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn load_of_unfit_snapshot_changes_nothing() {
        let saved = SavedGame {
            snake: vec![Position::new(2000, 20)],
            direction: Direction::Up,
            food: Position::new(40, 40),
            score: 30,
            speed: 20,
            saved_at: None,
        };
        let mut game = game_with(MemoryStore { saved: Some(saved), ..Default::default() });
        game.state.game_over = true;
        let before = game.state().clone();
        game.apply(Command::Load);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn restart_resets_from_any_state() {
        let mut game = game();
        doom(&mut game, 6);
        game.state.speed = 20;
        game.tick();
        assert!(game.state().game_over);

        game.apply(Command::Restart);
        let state = game.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 10);
        assert_eq!(state.snake, vec![Position::new(320, 240)]);
        assert_eq!(state.direction, Direction::Right);
        assert!(!state.game_over);
        assert!(!state.paused);
        assert_eq!(state.last_direction_key, None);

        game.state.paused = true;
        game.apply(Command::Restart);
        assert!(!game.state().paused);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut game = game();
        assert_eq!(game.apply(Command::Save), Control::Continue);
        assert_eq!(game.apply(Command::Quit), Control::Quit);
    }

    #[test]
    fn advance_steps_once_per_interval() {
        let mut game = game();
        game.state.food = Position::new(0, 0);
        assert_eq!(game.advance(Duration::from_millis(60)), StepOutcome::Idle);
        assert_eq!(game.state().head(), Position::new(320, 240));
        assert_eq!(game.advance(Duration::from_millis(60)), StepOutcome::Moved);
        assert_eq!(game.state().head(), Position::new(340, 240));
        assert_eq!(game.advance(Duration::from_millis(500)), StepOutcome::Moved);
        assert_eq!(game.state().head(), Position::new(360, 240));
    }

    #[test]
    fn step_rate_follows_speed_at_sixty_fps() {
        for speed in [10, 13, 22, 25] {
            let mut game = game();
            game.state.food = Position::new(0, 0);
            game.state.speed = speed;
            let steps = (0..600)
                .filter(|_| game.advance(Duration::from_micros(16_667)) == StepOutcome::Moved)
                .count() as i64;
            let expected = speed as i64 * 10;
            assert!((steps - expected).abs() <= 1, "speed {speed}: {steps} steps in 10s");
        }
    }

    #[test]
    fn slow_frame_does_not_burst() {
        let mut game = game();
        game.state.food = Position::new(0, 0);
        assert_eq!(game.advance(Duration::from_secs(2)), StepOutcome::Moved);
        assert_eq!(game.advance(Duration::ZERO), StepOutcome::Moved);
        assert_eq!(game.advance(Duration::ZERO), StepOutcome::Idle);
    }

    #[test]
    fn pause_does_not_bank_time() {
        let mut game = game();
        game.state.food = Position::new(0, 0);
        game.apply(Command::TogglePause);
        for _ in 0..30 {
            assert_eq!(game.advance(Duration::from_millis(50)), StepOutcome::Idle);
        }
        game.apply(Command::TogglePause);
        assert_eq!(game.advance(Duration::from_millis(16)), StepOutcome::Idle);
        assert_eq!(game.state().head(), Position::new(320, 240));
    }
}
