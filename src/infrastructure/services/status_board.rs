use core::cell::RefCell;
use core::fmt::Write;
use core::net::Ipv4Addr;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::String;

/// Status line buffer size, fits a dotted IPv4 address
pub const STATUS_LINE_SIZE: usize = 16;

pub type StatusLine = String<STATUS_LINE_SIZE>;

/// Text shown while the link is down
pub const DISCONNECTED: &str = "Disconnected";

/// Lines rendered by the display task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLines {
    /// Label of the running effect
    pub label: StatusLine,
    /// IP address or [`DISCONNECTED`]
    pub network: StatusLine,
}

/// Display text shared between the tasks that produce it
pub struct StatusBoard {
    lines: Mutex<CriticalSectionRawMutex, RefCell<StatusLines>>,
}

impl StatusBoard {
    pub const fn new() -> Self {
        Self {
            lines: Mutex::new(RefCell::new(StatusLines {
                label: String::new(),
                network: String::new(),
            })),
        }
    }

    pub fn set_label(&self, label: &str) {
        self.lines.lock(|cell| {
            let mut lines = cell.borrow_mut();
            lines.label.clear();
            let _ = lines.label.push_str(label);
        });
    }

    /// Show the address, or [`DISCONNECTED`] for `None`
    pub fn set_network(&self, address: Option<Ipv4Addr>) {
        self.lines.lock(|cell| {
            let mut lines = cell.borrow_mut();
            lines.network.clear();
            match address {
                Some(address) => {
                    let _ = write!(lines.network, "{}", address);
                }
                None => {
                    let _ = lines.network.push_str(DISCONNECTED);
                }
            }
        });
    }

    pub fn lines(&self) -> StatusLines {
        self.lines.lock(|cell| cell.borrow().clone())
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
