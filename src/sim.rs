use rand::Rng;

use crate::config::Config;
use crate::state::GameState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StepOutcome {
    /// Paused or already over; nothing moved.
    Idle,
    Moved,
    Ate,
    Crashed,
}

/// Advances the snake by one cell.
pub fn step<R: Rng>(state: &mut GameState, config: &Config, rng: &mut R) -> StepOutcome {
    if state.paused || state.game_over {
        return StepOutcome::Idle;
    }

    let new_head = state.head().step(state.direction, config);
    state.snake.insert(0, new_head);

    let mut outcome = StepOutcome::Moved;
    if new_head == state.food {
        state.score += 1;
        state.spawn_food(config, rng);
        outcome = StepOutcome::Ate;
    } else {
        state.snake.pop();
    }

    if state.snake[1..].contains(&new_head) {
        state.game_over = true;
        outcome = StepOutcome::Crashed;
    }
    outcome
}
