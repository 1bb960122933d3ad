#![forbid(unsafe_code)]

//! Core: key layout, key events, and per-key heat state.
//!
//! # Role in keyheat
//! `keyheat-core` is the input and state layer. It owns the key layout
//! reported by the host, the normalized press/release events, and the
//! [`KeyStateStore`] arena that the heat engine (`keyheat-fx`) mutates.
//!
//! # Primary responsibilities
//! - **Keymap**: key names and integer positions, fixed at initialization.
//! - **KeyEvent**: press/release addressed by validated key index.
//! - **KeyStateStore**: fixed-length arena of [`KeyState`] records.
//!
//! # How it fits in the system
//! The host adapter (`keyheat-anim`) builds a [`Keymap`] and turns protocol
//! lines into [`KeyEvent`] values. The engine consumes those events and
//! owns the store. The store knows nothing about time or color.

pub mod event;
pub mod key_state;
pub mod keymap;

pub use event::{KeyAction, KeyEvent};
pub use key_state::{KeyIndexOutOfRange, KeyState, KeyStateStore, clamp_heat};
pub use keymap::{KeyDescriptor, KeyPosition, Keymap};
