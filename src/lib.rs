//! USB HID joystick for the STM32F401 "black pill".
//!
//! The [`Joystick`] keeps the state of up to 14 buttons, a few axes and two hat
//! switches and packs buttons plus X/Y into a 4 byte input report which it
//! hands to a [`HidTransport`]. [`hid::HIDClass`] is that transport on top of
//! `usb-device`, [`inputs`] turns raw pins and ADC readings into joystick
//! state.
#![cfg_attr(not(test), no_std)]

pub mod descriptor;
pub mod hid;
pub mod inputs;
mod joystick;
mod transport;
mod types;

pub use crate::{
    joystick::Joystick,
    transport::HidTransport,
    types::{JoystickState, HAT_CENTERED},
};
