/// Minimal capability a HID stack has to offer the [`Joystick`](crate::Joystick).
///
/// Both calls are fire and forget. Whether a report actually reaches the host
/// is up to the implementation, the joystick never learns about it.
pub trait HidTransport {
    /// Register the report descriptor the host will be handed on enumeration.
    fn append_descriptor(&mut self, descriptor: &'static [u8]);

    /// Queue one input report. `data` does not contain the report ID.
    fn send_report(&mut self, report_id: u8, data: &[u8]);
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    fn append_descriptor(&mut self, descriptor: &'static [u8]) {
        (**self).append_descriptor(descriptor)
    }

    fn send_report(&mut self, report_id: u8, data: &[u8]) {
        (**self).send_report(report_id, data)
    }
}
