#[cfg(not(test))]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(test)]
macro_rules! debug {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}

#[cfg(not(test))]
macro_rules! trace {
    ($($arg:tt)*) => {
        log::trace!($($arg)*)
    };
}

#[cfg(test)]
macro_rules! trace {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}
