//! Config store on the `config` flash partition

use esp_storage::FlashStorage;

use power_stand::infrastructure::services::FlashConfigStore;

/// Base address of the `config` partition, see `partitions.csv`
pub const CONFIG_PARTITION_OFFSET: u32 = 0x31_0000;

pub type EspConfigStore<'a> = FlashConfigStore<FlashStorage<'a>>;

pub fn config_store(flash: FlashStorage<'_>) -> EspConfigStore<'_> {
    FlashConfigStore::new(flash, CONFIG_PARTITION_OFFSET)
}
