use super::types::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LockState {
    Unlocked,
    Locked,
}

/// Turns requested between two ticks. Only the first acceptable request of a tick is
/// taken; the lock is released when the tick resolves.
#[derive(Clone, Debug)]
pub struct DirectionController {
    heading: Direction,
    state: LockState,
}

impl DirectionController {
    pub fn new(heading: Direction) -> Self {
        Self {
            heading,
            state: LockState::Unlocked,
        }
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Returns whether the request was taken. Reversals, repeats of the current
    /// heading and requests made while locked are dropped without further effect.
    pub fn request_direction(&mut self, heading: Direction) -> bool {
        if self.state == LockState::Locked
            || heading == self.heading
            || heading.is_opposite(&self.heading)
        {
            return false;
        }
        self.heading = heading;
        self.state = LockState::Locked;
        true
    }

    pub fn advance(&mut self) {
        self.state = LockState::Unlocked;
    }
}
