/// Macro to return early with a generic error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Generic(format!($($arg)*)))
    };
}

/// Return early with an `Unsupported` error; used at capability boundaries
#[macro_export]
macro_rules! unsupported {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Unsupported(format!($($arg)*)))
    };
}
