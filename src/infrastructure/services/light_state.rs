use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::domain::entity::DeviceState;
use crate::effect::FrameGuard;

struct Inner {
    state: DeviceState,
    /// Bumped whenever the rendered effect must restart
    generation: u32,
}

/// Single source of truth for the light state.
///
/// Every access runs inside one critical section, so readers never see a
/// half-applied command.
pub struct SharedLightState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl SharedLightState {
    pub const fn new(state: DeviceState) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state,
                generation: 0,
            })),
        }
    }

    /// Copy of the current state
    pub fn get(&self) -> DeviceState {
        self.inner.lock(|cell| cell.borrow().state.clone())
    }

    /// Copy of the current state with its generation
    pub fn snapshot(&self) -> (DeviceState, u32) {
        self.inner.lock(|cell| {
            let inner = cell.borrow();
            (inner.state.clone(), inner.generation)
        })
    }

    pub fn generation(&self) -> u32 {
        self.inner.lock(|cell| cell.borrow().generation)
    }

    /// Mutate the state atomically.
    ///
    /// The generation moves on when the mode changes or the light turns on
    /// or off, which cancels the frame being rendered.
    pub fn update<R>(&self, f: impl FnOnce(&mut DeviceState) -> R) -> R {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let mode = inner.state.mode.clone();
            let was_on = inner.state.is_on();

            let result = f(&mut inner.state);

            if inner.state.mode != mode || inner.state.is_on() != was_on {
                inner.generation = inner.generation.wrapping_add(1);
            }
            result
        })
    }

    /// Token that stays current until the next restarting change
    pub fn token(&self, generation: u32) -> CancelToken<'_> {
        CancelToken {
            state: self,
            generation,
        }
    }
}

impl Default for SharedLightState {
    fn default() -> Self {
        Self::new(DeviceState::new())
    }
}

/// Frame guard bound to one generation of the light state
pub struct CancelToken<'a> {
    state: &'a SharedLightState,
    generation: u32,
}

impl FrameGuard for CancelToken<'_> {
    fn is_current(&self) -> bool {
        self.state.generation() == self.generation
    }
}
