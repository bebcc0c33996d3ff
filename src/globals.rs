//! Per-thread state shared by the writers.
//!
//! The only mutable state here is the diagnostics channel. Error kinds are
//! always returned to the caller, this channel merely reports them.

use std::{cell::RefCell, io::Write};

use const_format::concatcp;

use crate::error::generic_error_default;

pub type GenericError = for<'a> fn(Option<&mut (dyn Write + 'static)>, &str);

/// Version of this crate in `major.minor.patch` form.
pub const VERSION_STRING: &str = concatcp!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR"),
    ".",
    env!("CARGO_PKG_VERSION_PATCH")
);

pub struct XmlGlobalState {
    pub(crate) generic_error: GenericError,
    pub(crate) generic_error_context: Option<Box<dyn Write>>,
}

impl XmlGlobalState {
    fn new() -> Self {
        Self {
            generic_error: generic_error_default,
            generic_error_context: None,
        }
    }
}

thread_local! {
    pub static GLOBAL_STATE: RefCell<XmlGlobalState> = RefCell::new(XmlGlobalState::new());
}

/// Set new generic error function and generic error context.
///
/// If `func` is `None`, set `generic_error_default`.
/// If `context` is `None`, current context is clear and no context is set.
pub fn set_generic_error(func: Option<GenericError>, context: Option<impl Write + 'static>) {
    GLOBAL_STATE.with_borrow_mut(|state| {
        state.generic_error = func.unwrap_or(generic_error_default);
        state.generic_error_context = context.map(|context| {
            let boxed: Box<dyn Write + 'static> = Box::new(context);
            boxed
        });
    });
}

/// Forward `msg` to the current generic error handler.
#[doc(hidden)]
pub fn __generic_error(msg: &str) {
    GLOBAL_STATE.with_borrow_mut(|state| {
        let func = state.generic_error;
        func(state.generic_error_context.as_deref_mut(), msg);
    });
}

/// Format a message and send it through the generic error channel.
#[macro_export]
macro_rules! generic_error {
    ($($arg:tt)*) => {
        $crate::globals::__generic_error(&format!($($arg)*))
    };
}
