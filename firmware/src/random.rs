use esp_hal::rng::Rng;

use power_stand::domain::ports::RandomSource;

/// Hardware random number generator
pub struct HardwareRng(Rng);

impl HardwareRng {
    pub fn new() -> Self {
        Self(Rng::new())
    }

    /// Seed for the network stack
    pub fn seed(&mut self) -> u64 {
        u64::from(self.0.random()) << 32 | u64::from(self.0.random())
    }
}

impl RandomSource for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }
}
