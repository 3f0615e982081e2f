#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Routes raw pointer input to the handler registered for the active game state.

use std::collections::BTreeMap;

use broadside_core::GameState;
use glam::Vec2;

/// Handler invoked with the routing target and the unmodified input argument.
pub type Handler<T, A> = fn(&mut T, A);

/// Resolution of a state lookup.
pub enum Route<T, A> {
    /// No handler is registered for the state; the input is dropped.
    Ignore,
    /// Forward the input to the handler.
    Dispatch(Handler<T, A>),
}

impl<T, A> Clone for Route<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A> Copy for Route<T, A> {}

impl<T, A> Route<T, A> {
    /// Invokes the handler, if any, with the provided argument.
    pub fn invoke(self, target: &mut T, argument: A) {
        if let Self::Dispatch(handler) = self {
            handler(target, argument);
        }
    }

    /// Reports whether the route drops its input.
    #[must_use]
    pub const fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore)
    }
}

/// Per-state routing tables for click, move and wheel input.
pub struct InputRouter<T> {
    clicks: BTreeMap<GameState, Handler<T, Vec2>>,
    moves: BTreeMap<GameState, Handler<T, Vec2>>,
    wheels: BTreeMap<GameState, Handler<T, f32>>,
}

impl<T> Default for InputRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InputRouter<T> {
    /// Creates a router that ignores every input in every state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clicks: BTreeMap::new(),
            moves: BTreeMap::new(),
            wheels: BTreeMap::new(),
        }
    }

    /// Registers the click handler for `state`, replacing any previous one.
    #[must_use]
    pub fn with_click(mut self, state: GameState, handler: Handler<T, Vec2>) -> Self {
        let _ = self.clicks.insert(state, handler);
        self
    }

    /// Registers the pointer-move handler for `state`, replacing any previous one.
    #[must_use]
    pub fn with_move(mut self, state: GameState, handler: Handler<T, Vec2>) -> Self {
        let _ = self.moves.insert(state, handler);
        self
    }

    /// Registers the wheel handler for `state`, replacing any previous one.
    #[must_use]
    pub fn with_wheel(mut self, state: GameState, handler: Handler<T, f32>) -> Self {
        let _ = self.wheels.insert(state, handler);
        self
    }

    /// Click route for `state`.
    #[must_use]
    pub fn click_route(&self, state: GameState) -> Route<T, Vec2> {
        resolve(&self.clicks, state)
    }

    /// Pointer-move route for `state`.
    #[must_use]
    pub fn move_route(&self, state: GameState) -> Route<T, Vec2> {
        resolve(&self.moves, state)
    }

    /// Wheel route for `state`.
    #[must_use]
    pub fn wheel_route(&self, state: GameState) -> Route<T, f32> {
        resolve(&self.wheels, state)
    }

    /// Forwards a click at `screen` to the handler registered for `state`.
    pub fn click(&self, target: &mut T, state: GameState, screen: Vec2) {
        self.click_route(state).invoke(target, screen);
    }

    /// Forwards a pointer move to `screen` to the handler registered for `state`.
    pub fn pointer_moved(&self, target: &mut T, state: GameState, screen: Vec2) {
        self.move_route(state).invoke(target, screen);
    }

    /// Forwards a wheel `delta` to the handler registered for `state`.
    pub fn wheel(&self, target: &mut T, state: GameState, delta: f32) {
        self.wheel_route(state).invoke(target, delta);
    }
}

fn resolve<T, A>(table: &BTreeMap<GameState, Handler<T, A>>, state: GameState) -> Route<T, A> {
    table
        .get(&state)
        .copied()
        .map_or(Route::Ignore, Route::Dispatch)
}
