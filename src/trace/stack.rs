//! Per-thread call stack.
//!
//! Instrumented functions push a frame when entered and pop it when the
//! returned [`FrameGuard`] drops. Frames must be pushed and popped without an
//! `.await` in between, so the stack of the current thread is always the
//! stack of the code running on it.

use super::frame::{DISPLAY_FN, StackFrame};
use super::value::{Arguments, short_type_name};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::panic::Location;

thread_local! {
    static CALL_STACK: RefCell<Vec<StackFrame>> = const { RefCell::new(Vec::new()) };
}

/// Pops its frame on drop.
///
/// Not `Send`: the frame lives on the stack of the thread that pushed it.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        CALL_STACK.with(|stack| {
            // Guards drop in reverse order, except when one is leaked or moved.
            stack.borrow_mut().truncate(self.depth - 1);
        });
    }
}

/// Pushes `frame` onto the current thread's stack.
pub fn push(frame: StackFrame) -> FrameGuard {
    let depth = CALL_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(frame);
        stack.len()
    });
    FrameGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// Enters `function` without recording arguments. The frame location is the
/// caller's location.
#[track_caller]
pub fn enter(function: impl Into<String>) -> FrameGuard {
    let location = Location::caller();
    push(StackFrame::new(function).with_location(location.file(), location.line()))
}

/// Enters `function` and records its arguments.
#[track_caller]
pub fn enter_with_args(function: impl Into<String>, args: Arguments) -> FrameGuard {
    let location = Location::caller();
    push(
        StackFrame::new(function)
            .with_location(location.file(), location.line())
            .with_args(args),
    )
}

/// Enters the `Display::fmt` of `T`. Signals raised while this frame is on
/// the stack cannot propagate out of `fmt`.
#[track_caller]
pub fn enter_display<T: ?Sized>() -> FrameGuard {
    let location = Location::caller();
    push(
        StackFrame::new(DISPLAY_FN)
            .with_class(short_type_name::<T>())
            .with_location(location.file(), location.line()),
    )
}

/// Snapshot of the current thread's stack, innermost frame first.
pub fn capture() -> Vec<StackFrame> {
    CALL_STACK.with(|stack| stack.borrow().iter().rev().cloned().collect())
}

/// Number of frames on the current thread's stack.
pub fn depth() -> usize {
    CALL_STACK.with(|stack| stack.borrow().len())
}
