// console logging; a no-op outside the browser so the core stays testable

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
    Error,
}

#[cfg(target_arch = "wasm32")]
pub fn write_log(level: Level, msg: &str) {
    let line = format!("[candidatos] {msg}");
    match level {
        Level::Debug => web_sys::console::log_1(&line.into()),
        Level::Warn => web_sys::console::warn_1(&line.into()),
        Level::Error => web_sys::console::error_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_log(_level: Level, _msg: &str) {}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::write_log($crate::log::Level::Debug, &format!($($arg)*))
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::write_log($crate::log::Level::Warn, &format!($($arg)*))
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::write_log($crate::log::Level::Error, &format!($($arg)*))
    };
}
