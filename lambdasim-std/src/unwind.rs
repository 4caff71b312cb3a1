//! Panic frame recording for handler calls.
//!
//! By the time `catch_unwind` hands back a payload the panicking frames are
//! gone. A process-wide panic hook, chained in front of the existing one,
//! records the frames at the panic site, but only on a thread that is
//! currently polling a handler.

use futures::FutureExt;
use lambdasim_core::{FunctionError, capture_frames};
use std::{
    any::Any,
    cell::{Cell, RefCell},
    future::{Future, poll_fn},
    panic::{self, AssertUnwindSafe},
    pin::pin,
    sync::Once,
};

thread_local! {
    static ARMED: Cell<usize> = const { Cell::new(0) };
    static FRAMES: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if ARMED.with(Cell::get) > 0 {
                FRAMES.with(|frames| *frames.borrow_mut() = capture_frames());
            }
            previous(info);
        }));
    });
}

/// Decrements the armed depth even if the poll itself unwinds.
struct Armed;

impl Armed {
    fn arm() -> Self {
        ARMED.with(|depth| depth.set(depth.get() + 1));
        Armed
    }
}

impl Drop for Armed {
    fn drop(&mut self) {
        ARMED.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Await `future`, turning a panic into a [`FunctionError`] whose frames
/// start at the panic site.
pub(crate) async fn catch_panic<F: Future>(future: F) -> Result<F::Output, FunctionError> {
    install();
    let mut call = pin!(AssertUnwindSafe(future).catch_unwind());

    poll_fn(|cx| {
        let _armed = Armed::arm();
        call.as_mut().poll(cx).map(|result| result.map_err(panic_error))
    })
    .await
}

fn panic_error(payload: Box<dyn Any + Send>) -> FunctionError {
    let frames = FRAMES.with(|frames| frames.borrow_mut().take());
    FunctionError::from_panic(payload).with_frames(frames.unwrap_or_default())
}
