// Adapters layer: concrete implementations of the domain ports (browser, clock).

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod sleeper;
pub mod webdriver;
