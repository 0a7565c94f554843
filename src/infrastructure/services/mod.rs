mod clock;
mod flash_store;
mod light_state;
mod status_board;

pub use clock::{
    DateString, PLACEHOLDER_DATE, PLACEHOLDER_TIME, TimeString, WallClock, format_unix,
};
pub use flash_store::{FLASH_BLOCK_SIZE, FLASH_STORE_SIZE, FlashConfigStore, MAX_CONFIG_SIZE};
pub use light_state::{CancelToken, SharedLightState};
pub use status_board::{DISCONNECTED, STATUS_LINE_SIZE, StatusBoard, StatusLine, StatusLines};
