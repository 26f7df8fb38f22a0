//! RX line level sampling
//!
//! The break analyzer needs the current level of the RX line each time an
//! edge interrupt fires. Some UARTs expose this directly; otherwise the line
//! is sampled through a GPIO wired to the same net.

use embedded_hal::digital::InputPin;

/// Current logic level of the DMX RX line
pub trait LineLevel {
    /// True when the line is high (mark/idle)
    fn rx_level(&mut self) -> bool;
}

/// Adapter sampling the RX line through an `embedded-hal` input pin
///
/// A pin read error reads as high, the idle state of the line, so a flaky
/// GPIO never fakes a break.
pub struct PinLevel<P> {
    pin: P,
}

impl<P: InputPin> PinLevel<P> {
    /// Wrap an input pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> LineLevel for PinLevel<P> {
    fn rx_level(&mut self) -> bool {
        self.pin.is_high().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct FakePin {
        level: Result<bool, ErrorKind>,
    }

    impl ErrorType for FakePin {
        type Error = ErrorKind;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.level
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.level.map(|high| !high)
        }
    }

    #[test]
    fn test_pin_level_follows_pin() {
        let mut line = PinLevel::new(FakePin { level: Ok(false) });
        assert!(!line.rx_level());

        let mut line = PinLevel::new(FakePin { level: Ok(true) });
        assert!(line.rx_level());
    }

    #[test]
    fn test_pin_error_reads_as_idle() {
        let mut line = PinLevel::new(FakePin {
            level: Err(ErrorKind::Other),
        });
        assert!(line.rx_level());
    }
}
