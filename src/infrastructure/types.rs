use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

/// Broker client shared by the tasks that talk to the broker.
///
/// The lock is held for one client call at a time.
pub type SharedBroker<B> = Mutex<CriticalSectionRawMutex, B>;
