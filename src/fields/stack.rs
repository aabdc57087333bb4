//! Eager call-stack capture for `stack` fields

use std::panic::Location;

/// Upper bound on the frames kept in a stack field
pub const MAX_STACK_FRAMES: usize = 32;

/// Capture the current call stack, starting at `caller`.
///
/// Frame zero always comes from `caller`, so it reflects the call site even
/// when the binary carries no debug info. The frames above it are resolved
/// through the `backtrace` crate and need line tables: a build without
/// debuginfo (the default release profile) gets frame zero only.
pub(crate) fn capture_frames(caller: &Location<'_>) -> Vec<String> {
    let mut frames = Vec::with_capacity(8);
    frames.push(format_frame(caller.file(), caller.line()));

    let mut past_caller = false;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() >= MAX_STACK_FRAMES {
                return;
            }
            let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                return;
            };
            let file = file.to_string_lossy();

            if past_caller {
                frames.push(format_frame(&file, line));
            } else if line == caller.line() && same_file(&file, caller.file()) {
                past_caller = true;
            }
        });
        frames.len() < MAX_STACK_FRAMES
    });

    frames
}

fn format_frame(file: &str, line: u32) -> String {
    format!("{}:L{}", file, line)
}

fn same_file(resolved_path: &str, caller_path: &str) -> bool {
    let normalize = |p: &str| p.replace('\\', "/");
    let resolved_path = normalize(resolved_path);
    let caller_path = normalize(caller_path);
    resolved_path.ends_with(caller_path.trim_start_matches("./"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn capture_here() -> Vec<String> {
        capture_frames(Location::caller())
    }

    #[test]
    fn test_same_file() {
        assert!(same_file("/home/u/app/src/lib.rs", "src/lib.rs"));
        assert!(same_file("./src/lib.rs", "src/lib.rs"));
        assert!(same_file("C:\\app\\src\\lib.rs", "src/lib.rs"));
        assert!(!same_file("/home/u/app/src/main.rs", "src/lib.rs"));
    }

    #[test]
    fn test_frame_zero_is_the_caller() {
        let location = Location::caller();
        let frames = capture_frames(location);
        assert!(!frames.is_empty());
        assert!(frames.len() <= MAX_STACK_FRAMES);
        assert_eq!(frames[0], format!("{}:L{}", location.file(), location.line()));
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_frames_above_the_caller_are_resolved() {
        let frames = capture_here();
        assert!(frames.len() > 1, "{:?}", frames);
        assert!(frames.len() <= MAX_STACK_FRAMES);
        assert!(frames[0].contains("stack.rs"));
        assert!(frames[1].contains("stack.rs"), "{:?}", frames);
    }
}
