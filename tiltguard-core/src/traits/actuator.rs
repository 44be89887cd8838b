//! Actuator output trait

/// Binary actuator (vibration motor, buzzer, LED)
///
/// Implementations control the output line directly or via a driver
/// transistor.
pub trait Actuator {
    /// Engage or disengage the actuator
    fn set_engaged(&mut self, engaged: bool);

    /// Check if the actuator is currently engaged
    fn is_engaged(&self) -> bool;
}
