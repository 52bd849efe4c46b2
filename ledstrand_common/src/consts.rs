//! Board limits and defaults for the ledstrand workspace.
//!
//! Single source of truth for numeric limits and default paths.

use static_assertions::const_assert;

/// Maximum number of LED channels on one controller.
pub const MAX_CHANNELS: usize = 16;

/// Highest usable GPIO number on the target board (ESP8266: GPIO0–GPIO16).
pub const MAX_PIN: u8 = 16;

/// GPIO6–GPIO11 are wired to the SPI flash and cannot drive LEDs.
pub const FLASH_PIN_FIRST: u8 = 6;
/// Last flash-bus pin (inclusive).
pub const FLASH_PIN_LAST: u8 = 11;

/// PWM range of the output driver (`analogWrite` full scale).
pub const PWM_RANGE: u16 = 1023;

/// Full-scale value of a numeric brightness payload.
pub const BRIGHTNESS_MAX: u8 = 255;

/// Suffix appended to a state topic to obtain its command topic.
pub const COMMAND_SUFFIX: &str = "/set";

/// Default MQTT broker port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;

const_assert!(MAX_CHANNELS > 0);
const_assert!(FLASH_PIN_FIRST <= FLASH_PIN_LAST);
const_assert!(FLASH_PIN_LAST <= MAX_PIN);
const_assert!(PWM_RANGE > 0);
const_assert!(DEFAULT_BROKER_PORT > 0);

/// Returns true if `pin` is one of the SPI flash pins.
#[inline]
pub const fn is_flash_pin(pin: u8) -> bool {
    pin >= FLASH_PIN_FIRST && pin <= FLASH_PIN_LAST
}
