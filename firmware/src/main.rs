#![no_main]
#![no_std]

#[cfg(feature = "rtt")]
mod panic_rtt {
    use core::panic::PanicInfo;
    #[inline(never)]
    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        rtt_target::rprintln!("{}", info);
        loop {} // You might need a compiler fence in here.
    }
}

#[cfg(not(feature = "rtt"))]
use panic_halt as _;

#[rtic::app(device = stm32f4xx_hal::pac, dispatchers = [SDIO], peripherals = true)]
mod app {
    use dwt_systick_monotonic::{DwtSystick, ExtU32};

    use stm32f4xx_hal::{
        adc::{
            config::{AdcConfig, Resolution, SampleTime},
            Adc,
        },
        gpio::{
            gpioa::{PA1, PA2},
            Analog, ErasedPin, Input,
        },
        otg_fs::{UsbBusType, USB},
        pac::ADC1,
        prelude::*,
    };
    use usb_device::{bus::UsbBusAllocator, prelude::*};

    #[cfg(feature = "rtt")]
    use rtt_target::{rprint, rprintln, rtt_init_print};

    use rusty_joystick::{
        descriptor::BUTTON_COUNT,
        hid::HIDClass,
        inputs::{ButtonBank, LinearInput},
        Joystick,
    };

    const MONO_HZ: u32 = 84_000_000; // 84 MHz
    const REPORT_PERIOD_MS: u32 = 10;
    const ANALOG_PINS: usize = 2;
    const DIGITAL_PINS: usize = BUTTON_COUNT as usize;
    const EP_MEMORY_WORDS: usize = 1024;

    type RcUsbDevice = UsbDevice<'static, UsbBusType>;
    type RcJoystick = Joystick<HIDClass<'static, UsbBusType>>;

    #[monotonic(binds = SysTick, default = true)]
    type MyMono = DwtSystick<MONO_HZ>;

    #[shared]
    struct Shared {
        usb_device: RcUsbDevice,
        joystick: RcJoystick,
    }

    #[local]
    struct Local {
        adc: Adc<ADC1>,
        analog_pins: (PA1<Analog>, PA2<Analog>),
        linear_inputs: [LinearInput; ANALOG_PINS],
        buttons: ButtonBank<ErasedPin<Input>, DIGITAL_PINS>,
        user_button: ErasedPin<Input>,
    }

    #[init(local = [ep_memory: [u32; EP_MEMORY_WORDS] = [0; EP_MEMORY_WORDS], usb_bus: Option<UsbBusAllocator<UsbBusType>> = None])]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        #[cfg(feature = "rtt")]
        rtt_init_print!();

        let mut dcb = cx.core.DCB;
        let dwt = cx.core.DWT;
        let systick = cx.core.SYST;

        let rcc = cx.device.RCC.constrain();
        let clocks = rcc
            .cfgr
            .use_hse(25.MHz())
            .sysclk(MONO_HZ.Hz())
            .require_pll48clk()
            .freeze();

        let gpioa = cx.device.GPIOA.split();
        let gpiob = cx.device.GPIOB.split();

        // digital inputs, active low; PB11 is not bonded out on the F401CC
        let user_button = gpioa.pa0.into_pull_up_input().erase();
        let buttons = ButtonBank::new([
            gpiob.pb0.into_pull_up_input().erase(),
            gpiob.pb1.into_pull_up_input().erase(),
            gpiob.pb2.into_pull_up_input().erase(),
            gpiob.pb3.into_pull_up_input().erase(),
            gpiob.pb4.into_pull_up_input().erase(),
            gpiob.pb5.into_pull_up_input().erase(),
            gpiob.pb6.into_pull_up_input().erase(),
            gpiob.pb7.into_pull_up_input().erase(),
            gpiob.pb8.into_pull_up_input().erase(),
            gpiob.pb9.into_pull_up_input().erase(),
            gpiob.pb12.into_pull_up_input().erase(),
            gpiob.pb13.into_pull_up_input().erase(),
            gpiob.pb14.into_pull_up_input().erase(),
            gpiob.pb15.into_pull_up_input().erase(),
        ]);

        // analog inputs
        let adc_config = AdcConfig::default()
            .resolution(Resolution::Twelve)
            .default_sample_time(SampleTime::Cycles_480);
        let adc = Adc::adc1(cx.device.ADC1, true, adc_config);
        let analog_pins = (gpioa.pa1.into_analog(), gpioa.pa2.into_analog());

        //// USB initialization
        let usb = USB::new(
            (
                cx.device.OTG_FS_GLOBAL,
                cx.device.OTG_FS_DEVICE,
                cx.device.OTG_FS_PWRCLK,
            ),
            (gpioa.pa11, gpioa.pa12),
            &clocks,
        );
        let usb_bus: &'static UsbBusAllocator<UsbBusType> = cx
            .local
            .usb_bus
            .insert(UsbBusType::new(usb, cx.local.ep_memory));

        // the class has to be allocated before the device freezes the bus
        let mut joystick = Joystick::new(HIDClass::new(usb_bus));

        // https://github.com/obdev/v-usb/blob/master/usbdrv/USB-IDs-for-free.txt
        // For USB Joystick as there is no USB Game Pad on this free ID list
        let usb_device = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x16c0, 0x27dc))
            .strings(&[StringDescriptors::new(LangID::EN)
                .manufacturer("autumnal.de")
                .product("RC USB Joystick")
                .serial_number(env!("CARGO_PKG_VERSION"))])
            .unwrap()
            .build();

        // reports are batched, `sample` sends one per period
        joystick.begin(false);

        // enqueue
        sample::spawn().unwrap();

        let mono = DwtSystick::new(&mut dcb, dwt, systick, MONO_HZ);

        #[cfg(feature = "rtt")]
        rprintln!("init done");

        (
            Shared {
                usb_device,
                joystick,
            },
            Local {
                adc,
                analog_pins,
                linear_inputs: Default::default(),
                buttons,
                user_button,
            },
            init::Monotonics(mono),
        )
    }

    // sample all inputs and send one report
    #[task(shared = [joystick], local = [adc, analog_pins, linear_inputs, buttons, user_button])]
    fn sample(cx: sample::Context) {
        let sample::Context { mut shared, local } = cx;

        // analog
        let (pa1, pa2) = local.analog_pins;
        let readings = [
            local.adc.convert(pa1, SampleTime::Cycles_480),
            local.adc.convert(pa2, SampleTime::Cycles_480),
        ];
        let commit_calibration = local.user_button.is_low();
        let mut axes = [0i8; ANALOG_PINS];
        for (reading, (linear_input, axis)) in readings
            .iter()
            .zip(local.linear_inputs.iter_mut().zip(axes.iter_mut()))
        {
            if commit_calibration {
                linear_input.set_center(*reading);
            }
            *axis = linear_input.get(*reading);
        }

        // digital, then one report with everything
        let buttons = local.buttons;
        let _pressed = shared.joystick.lock(|joystick| {
            let pressed = buttons.apply(joystick);
            joystick.set_x_axis(axes[0]);
            joystick.set_y_axis(axes[1]);
            joystick.send_state();
            pressed
        });

        // print the readings
        #[cfg(feature = "rtt")]
        {
            rprint!("axes: ");
            for axis in axes.iter() {
                rprint!("[{:4}] ", axis);
            }
            rprint!(", buttons: ");
            for button in _pressed.iter() {
                rprint!("[{}] ", if *button { 'X' } else { ' ' });
            }
            rprintln!("");
        }

        // reschedule self
        sample::spawn_after(REPORT_PERIOD_MS.millis()).unwrap();
    }

    // Global USB Interrupt (does not include Wakeup)
    #[task(binds = OTG_FS, shared = [usb_device, joystick], priority = 2)]
    fn usb_tx(cx: usb_tx::Context) {
        (cx.shared.usb_device, cx.shared.joystick)
            .lock(|usb_device, joystick| usb_device.poll(&mut [joystick.transport_mut()]));
    }

    // Interrupt for USB Wakeup
    #[task(binds = OTG_FS_WKUP, shared = [usb_device, joystick], priority = 2)]
    fn usb_rx(cx: usb_rx::Context) {
        (cx.shared.usb_device, cx.shared.joystick)
            .lock(|usb_device, joystick| usb_device.poll(&mut [joystick.transport_mut()]));
    }
}
