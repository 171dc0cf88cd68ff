use embedded_hal::digital::v2::InputPin;

use crate::{joystick::Joystick, transport::HidTransport};

/// Self calibrating analog axis
///
/// Starts out uncalibrated, widens its range with every reading and gets its
/// center committed through [`set_center`](Self::set_center).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearInput {
    NoCalibration,
    OngoingCalibration { start: u16, end: u16 },
    Calibrated { start: u16, mid: u16, end: u16 },
}

impl Default for LinearInput {
    fn default() -> Self {
        Self::NoCalibration
    }
}

impl LinearInput {
    /// Largest deflection in either direction, matches the descriptor's logical range
    pub const HALF_RESOLUTION: i8 = 127;

    pub fn reset_calibration(&mut self) {
        *self = Self::NoCalibration;
    }

    /// Commits the calibration with the current value as mid point
    pub fn set_center(&mut self, v: u16) {
        match *self {
            Self::OngoingCalibration { start, end } => {
                *self = Self::Calibrated { start, end, mid: v }
            }
            Self::Calibrated { ref mut mid, .. } => *mid = v,
            _ => {}
        }
    }

    /// Get a value scaled to `-127..=127`
    ///
    /// Also processes value for calibration if one is ongoing
    pub fn get(&mut self, v: u16) -> i8 {
        // consider current value for calibration if one is ongoing
        match self {
            Self::NoCalibration => {
                *self = Self::OngoingCalibration { start: v, end: v };
            }
            Self::OngoingCalibration { start, .. } if v < *start => {
                *start = v;
            }
            Self::OngoingCalibration { end, .. } if v > *end => {
                *end = v;
            }
            _ => {}
        }

        // determine start, mid and end
        let (start, mid, end) = match *self {
            Self::NoCalibration => return 0,
            Self::OngoingCalibration { start, end } => {
                (start, ((start as u32 + end as u32) / 2) as u16, end)
            }
            Self::Calibrated { start, mid, end } => (start, mid, end),
        };

        // a hand built range may come in reversed
        let (start, end) = (start.min(end), start.max(end));

        // limit v (and a center committed off range) to the calibrated range
        let v = num::clamp(v, start, end);
        let mid = num::clamp(mid, start, end);

        let half = Self::HALF_RESOLUTION as u32;
        if v < mid {
            let span = (mid - start) as u32;
            -((((mid - v) as u32 * half + span / 2) / span) as i8)
        } else if v > mid {
            let span = (end - mid) as u32;
            (((v - mid) as u32 * half + span / 2) / span) as i8
        } else {
            0
        }
    }
}

/// A fixed set of active low push buttons, pin `n` drives button `n`
pub struct ButtonBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> ButtonBank<P, N> {
    pub fn new(pins: [P; N]) -> Self {
        ButtonBank { pins }
    }

    /// Sample all pins, a pin that can't be read counts as released
    pub fn read(&self) -> [bool; N] {
        let mut pressed = [false; N];
        self.pins
            .iter()
            .zip(pressed.iter_mut())
            .for_each(|(pin, out)| *out = pin.is_low().unwrap_or(false));
        pressed
    }

    /// Sample all pins and push the buttons that changed into `joystick`
    pub fn apply<T: HidTransport>(&self, joystick: &mut Joystick<T>) -> [bool; N] {
        let pressed = self.read();
        for (index, &down) in pressed.iter().enumerate() {
            let index = index as u8;
            if joystick.state().button(index) != down {
                joystick.set_button(index, down as u8);
            }
        }
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakePin(Cell<Result<bool, ()>>);

    impl FakePin {
        fn low() -> Self {
            FakePin(Cell::new(Ok(true)))
        }

        fn high() -> Self {
            FakePin(Cell::new(Ok(false)))
        }
    }

    impl InputPin for FakePin {
        type Error = ();

        fn is_high(&self) -> Result<bool, ()> {
            self.0.get().map(|low| !low)
        }

        fn is_low(&self) -> Result<bool, ()> {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct Counter(usize);

    impl HidTransport for Counter {
        fn append_descriptor(&mut self, _: &'static [u8]) {}

        fn send_report(&mut self, _: u8, _: &[u8]) {
            self.0 += 1;
        }
    }

    #[test]
    fn uncalibrated_reads_center() {
        let mut input = LinearInput::default();
        assert_eq!(input.get(3000), 0);
        assert_eq!(
            input,
            LinearInput::OngoingCalibration {
                start: 3000,
                end: 3000
            }
        );
    }

    #[test]
    fn ongoing_calibration_widens_range() {
        let mut input = LinearInput::default();
        input.get(2000);
        assert_eq!(input.get(1000), -127);
        assert_eq!(input.get(3000), 127);
        assert_eq!(input.get(2000), 0);
        assert_eq!(
            input,
            LinearInput::OngoingCalibration {
                start: 1000,
                end: 3000
            }
        );
    }

    #[test]
    fn calibrated_range_is_asymmetric() {
        let mut input = LinearInput::Calibrated {
            start: 0,
            mid: 1000,
            end: 4000,
        };
        assert_eq!(input.get(500), -64);
        assert_eq!(input.get(2500), 64);
        assert_eq!(input.get(1000), 0);
        // no more widening once calibrated
        assert_eq!(input.get(4095), 127);
        assert_eq!(input.get(5000), 127);
    }

    #[test]
    fn set_center_commits_calibration() {
        let mut input = LinearInput::default();
        input.set_center(100);
        assert_eq!(input, LinearInput::NoCalibration);

        input.get(10);
        input.get(90);
        input.set_center(40);
        assert_eq!(
            input,
            LinearInput::Calibrated {
                start: 10,
                mid: 40,
                end: 90
            }
        );
        input.set_center(50);
        assert_eq!(input.get(50), 0);

        input.reset_calibration();
        assert_eq!(input, LinearInput::NoCalibration);
    }

    #[test]
    fn center_outside_range_is_clamped() {
        let mut input = LinearInput::Calibrated {
            start: 100,
            mid: 50,
            end: 200,
        };
        assert_eq!(input.get(100), 0);
        assert_eq!(input.get(200), 127);
    }

    #[test]
    fn reversed_range_reads_like_ordered_one() {
        let mut reversed = LinearInput::Calibrated {
            start: 4000,
            mid: 1000,
            end: 0,
        };
        let mut ordered = LinearInput::Calibrated {
            start: 0,
            mid: 1000,
            end: 4000,
        };
        for &v in &[0, 500, 1000, 2500, 4000, 5000] {
            assert_eq!(reversed.get(v), ordered.get(v));
        }
    }

    #[test]
    fn button_bank_reads_active_low() {
        let bank = ButtonBank::new([FakePin::low(), FakePin::high(), FakePin::low()]);
        assert_eq!(bank.read(), [true, false, true]);
    }

    #[test]
    fn unreadable_pin_counts_as_released() {
        let bank = ButtonBank::new([FakePin(Cell::new(Err(())))]);
        assert_eq!(bank.read(), [false]);
    }

    #[test]
    fn button_bank_only_pushes_changes() {
        let bank = ButtonBank::new([FakePin::low(), FakePin::high()]);
        let mut joystick = Joystick::new(Counter::default());
        joystick.begin(true);

        bank.apply(&mut joystick);
        assert_eq!(joystick.state().buttons, 0b01);
        assert_eq!(joystick.transport().0, 2);

        bank.apply(&mut joystick);
        assert_eq!(joystick.transport().0, 2);

        bank.pins[0].0.set(Ok(false));
        bank.pins[1].0.set(Ok(true));
        bank.apply(&mut joystick);
        assert_eq!(joystick.state().buttons, 0b10);
        assert_eq!(joystick.transport().0, 4);
    }
}
