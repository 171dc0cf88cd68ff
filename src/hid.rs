#[allow(unused)]
use usb_device::class_prelude::*;
use usb_device::Result;

use crate::transport::HidTransport;

const USB_CLASS_HID: u8 = 0x03;
const USB_SUBCLASS_NONE: u8 = 0x00;
const USB_PROTOCOL_NONE: u8 = 0x00;

const DESCRIPTOR_TYPE_HID: u8 = 0x21;
const DESCRIPTOR_TYPE_REPORT: u8 = 0x22;

const REQ_GET_REPORT: u8 = 0x01;
const REQ_GET_IDLE: u8 = 0x02;
const REQ_GET_PROTOCOL: u8 = 0x03;
const REQ_SET_IDLE: u8 = 0x0A;
const REQ_SET_PROTOCOL: u8 = 0x0B;

const PROTOCOL_REPORT: u8 = 0x01;

/// Max packet size of the interrupt endpoint, also the largest report we keep
pub const MAX_PACKET_SIZE: usize = 8;

/// Poll interval of the interrupt endpoint in milliseconds
pub const POLL_INTERVAL_MS: u8 = 1;

/// The 9 byte HID class descriptor for a report descriptor of `report_len` bytes
pub fn hid_descriptor(report_len: usize) -> [u8; 9] {
    let descr_len = report_len as u16;
    [
        0x09,                   // length
        DESCRIPTOR_TYPE_HID,    // descriptor type
        0x11,                   // bcdHID 1.11
        0x01,                   // bcdHID
        0x00,                   // bCountryCode
        0x01,                   // bNumDescriptors
        DESCRIPTOR_TYPE_REPORT, // bDescriptorType
        descr_len as u8,        // wDescriptorLength
        (descr_len >> 8) as u8, // wDescriptorLength
    ]
}

/// USB HID interface with a single interrupt IN endpoint
///
/// Serves whatever report descriptor was handed in through
/// [`HidTransport::append_descriptor`] and remembers the last report so the
/// host can poll it with `GET_REPORT`.
pub struct HIDClass<'a, B: UsbBus> {
    report_if: InterfaceNumber,
    report_ep: EndpointIn<'a, B>,
    report_descr: &'static [u8],
    last_report: [u8; MAX_PACKET_SIZE],
    last_report_len: usize,
    idle_rate: u8,
}

impl<B: UsbBus> HIDClass<'_, B> {
    pub fn new(alloc: &UsbBusAllocator<B>) -> HIDClass<'_, B> {
        HIDClass {
            report_if: alloc.interface(),
            report_ep: alloc.interrupt(MAX_PACKET_SIZE as u16, POLL_INTERVAL_MS),
            report_descr: &[],
            last_report: [0; MAX_PACKET_SIZE],
            last_report_len: 0,
            idle_rate: 0,
        }
    }

    /// Last report as it went out on the wire, report ID included
    fn last_report(&self) -> &[u8] {
        &self.last_report[..self.last_report_len]
    }

    fn is_for_us(&self, req: &control::Request) -> bool {
        req.request_type == control::RequestType::Class
            && req.recipient == control::Recipient::Interface
            && req.index == u8::from(self.report_if) as u16
    }
}

impl<B: UsbBus> HidTransport for HIDClass<'_, B> {
    /// Only one descriptor is served, a second call replaces the first
    fn append_descriptor(&mut self, descriptor: &'static [u8]) {
        self.report_descr = descriptor;
    }

    fn send_report(&mut self, report_id: u8, data: &[u8]) {
        let len = data.len() + 1;
        if len > MAX_PACKET_SIZE {
            return;
        }

        self.last_report[0] = report_id;
        self.last_report[1..len].copy_from_slice(data);
        self.last_report_len = len;

        // fails until the host configured us, nothing to be done about that
        self.report_ep.write(&self.last_report[..len]).ok();
    }
}

impl<B: UsbBus> UsbClass<B> for HIDClass<'_, B> {
    fn get_configuration_descriptors(&self, writer: &mut DescriptorWriter) -> Result<()> {
        writer.interface(
            self.report_if,
            USB_CLASS_HID,
            USB_SUBCLASS_NONE,
            USB_PROTOCOL_NONE,
        )?;

        // the writer prepends length and type itself
        writer.write(
            DESCRIPTOR_TYPE_HID,
            &hid_descriptor(self.report_descr.len())[2..],
        )?;

        writer.endpoint(&self.report_ep)?;

        Ok(())
    }

    fn reset(&mut self) {
        self.idle_rate = 0;
    }

    fn control_out(&mut self, xfer: ControlOut<B>) {
        let req = *xfer.request();

        // If the request is meant for this device
        if !self.is_for_us(&req) {
            return;
        }

        match req.request {
            REQ_SET_IDLE => {
                self.idle_rate = (req.value >> 8) as u8;
                xfer.accept().ok();
            }
            REQ_SET_PROTOCOL => {
                // there is no boot protocol, report protocol is all we speak
                xfer.accept().ok();
            }
            _ => {
                xfer.reject().ok();
            }
        }
    }

    fn control_in(&mut self, xfer: ControlIn<B>) {
        let req = *xfer.request();

        if req.request_type == control::RequestType::Standard {
            match (req.recipient, req.request) {
                (control::Recipient::Interface, control::Request::GET_DESCRIPTOR)
                    if req.index == u8::from(self.report_if) as u16 =>
                {
                    let (dtype, _index) = req.descriptor_type_index();
                    if dtype == DESCRIPTOR_TYPE_HID {
                        xfer.accept_with(&hid_descriptor(self.report_descr.len()))
                            .ok();
                    } else if dtype == DESCRIPTOR_TYPE_REPORT {
                        // copied into the control buffer, a static reply would
                        // linger in the pipe if the host abandons the transfer
                        xfer.accept_with(self.report_descr).ok();
                    }
                }
                _ => {}
            };
            return;
        }

        // If request is meant for the usb class
        if !self.is_for_us(&req) {
            //Ignore it because we dont take any requests
            return;
        }

        match req.request {
            REQ_GET_REPORT => {
                // USB host requests for report, answer with the last one sent
                // (empty before the first one)
                xfer.accept_with(self.last_report()).ok();
            }
            REQ_GET_IDLE => {
                xfer.accept_with(&[self.idle_rate]).ok();
            }
            REQ_GET_PROTOCOL => {
                xfer.accept_with(&[PROTOCOL_REPORT]).ok();
            }
            _ => {
                //Pass request on
                xfer.reject().ok();
            }
        }
    }
}
