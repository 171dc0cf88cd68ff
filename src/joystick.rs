use crate::{
    descriptor::{REPORT_DESCRIPTOR, REPORT_ID, REPORT_SIZE},
    transport::HidTransport,
    types::JoystickState,
};

/// A HID joystick sitting on top of some [`HidTransport`]
///
/// Every setter updates the state and, with auto-send enabled, pushes exactly
/// one report to the transport. With auto-send disabled nothing is sent until
/// [`send_state`](Self::send_state) is called, which allows batching.
#[derive(Debug)]
pub struct Joystick<T: HidTransport> {
    transport: T,
    state: JoystickState,
    auto_send: bool,
}

impl<T: HidTransport> Joystick<T> {
    /// Registers the report descriptor with `transport` and starts out neutral
    pub fn new(mut transport: T) -> Self {
        transport.append_descriptor(REPORT_DESCRIPTOR);
        Joystick {
            transport,
            state: JoystickState::default(),
            auto_send: false,
        }
    }

    /// Set the auto-send mode and send the current state once
    pub fn begin(&mut self, auto_send: bool) {
        self.auto_send = auto_send;
        self.send_state();
    }

    pub fn end(&mut self) {}

    /// `0` releases the button, anything else presses it
    pub fn set_button(&mut self, index: u8, value: u8) {
        if value == 0 {
            self.release_button(index);
        } else {
            self.press_button(index);
        }
    }

    pub fn press_button(&mut self, index: u8) {
        self.state.set_button(index, true);
        self.state_changed();
    }

    pub fn release_button(&mut self, index: u8) {
        self.state.set_button(index, false);
        self.state_changed();
    }

    pub fn set_throttle(&mut self, value: u8) {
        self.state.throttle = value;
        self.state_changed();
    }

    pub fn set_rudder(&mut self, value: u8) {
        self.state.rudder = value;
        self.state_changed();
    }

    pub fn set_x_axis(&mut self, value: i8) {
        self.state.x_axis = value;
        self.state_changed();
    }

    pub fn set_y_axis(&mut self, value: i8) {
        self.state.y_axis = value;
        self.state_changed();
    }

    pub fn set_z_axis(&mut self, value: i8) {
        self.state.z_axis = value;
        self.state_changed();
    }

    pub fn set_x_axis_rotation(&mut self, value: i16) {
        self.state.x_axis_rotation = value;
        self.state_changed();
    }

    pub fn set_y_axis_rotation(&mut self, value: i16) {
        self.state.y_axis_rotation = value;
        self.state_changed();
    }

    pub fn set_z_axis_rotation(&mut self, value: i16) {
        self.state.z_axis_rotation = value;
        self.state_changed();
    }

    /// Only the parity of `index` matters, `0` and `2` address the same slot
    pub fn set_hat_switch(&mut self, index: i8, value: i16) {
        self.state.set_hat_switch(index, value);
        self.state_changed();
    }

    /// Hand the current report to the transport
    pub fn send_state(&mut self) {
        let report = self.report();
        self.transport.send_report(REPORT_ID, &report);
    }

    /// The report [`send_state`](Self::send_state) would send right now
    pub fn report(&self) -> [u8; REPORT_SIZE] {
        self.state.report()
    }

    pub fn state(&self) -> &JoystickState {
        &self.state
    }

    pub fn auto_send(&self) -> bool {
        self.auto_send
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn state_changed(&mut self) {
        if self.auto_send {
            self.send_state();
        }
    }
}
