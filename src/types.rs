use crate::descriptor::REPORT_SIZE;

/// Hat switch value meaning "centered, no direction"
pub const HAT_CENTERED: i16 = -1;

/// Everything the joystick knows about itself
///
/// Only the buttons and the X/Y axes make it into the input report, the rest
/// is kept so callers can still set it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JoystickState {
    /// Buttons, bit `n` is button `n + 1`. Only the low 16 bits are reported
    pub buttons: u32,

    /// Stick (reported)
    pub x_axis: i8,
    pub y_axis: i8,

    pub z_axis: i8,
    pub x_axis_rotation: i16,
    pub y_axis_rotation: i16,
    pub z_axis_rotation: i16,

    pub throttle: u8,
    pub rudder: u8,

    pub hat_switch: [i16; 2],
}

impl Default for JoystickState {
    fn default() -> Self {
        JoystickState {
            buttons: 0,
            x_axis: 0,
            y_axis: 0,
            z_axis: 0,
            x_axis_rotation: 0,
            y_axis_rotation: 0,
            z_axis_rotation: 0,
            throttle: 0,
            rudder: 0,
            hat_switch: [HAT_CENTERED; 2],
        }
    }
}

impl JoystickState {
    /// Set or clear one bit of the button field.
    ///
    /// Indices past the 32 bit field are ignored.
    pub fn set_button(&mut self, index: u8, pressed: bool) {
        let mask = match 1u32.checked_shl(index as u32) {
            Some(mask) => mask,
            None => return,
        };
        if pressed {
            self.buttons |= mask;
        } else {
            self.buttons &= !mask;
        }
    }

    pub fn button(&self, index: u8) -> bool {
        1u32.checked_shl(index as u32)
            .map_or(false, |mask| self.buttons & mask != 0)
    }

    /// Store a hat switch value, the slot is picked by the parity of `index`
    pub fn set_hat_switch(&mut self, index: i8, value: i16) {
        self.hat_switch[index.rem_euclid(2) as usize] = value;
    }

    /// Pack the reported fields in descriptor order
    pub fn report(&self) -> [u8; REPORT_SIZE] {
        let [b0, b1, _, _] = self.buttons.to_le_bytes();
        [b0, b1, self.x_axis as u8, self.y_axis as u8]
    }
}
