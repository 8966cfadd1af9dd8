//! Deploy core: image resolution, app lookup, dispatch, rollout tracking and release

pub mod dispatch;
pub mod fsm;
pub mod image;
pub mod locator;
pub mod lock;
pub mod release;
pub mod spec;
